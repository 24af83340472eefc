//! Behavioral tag generation
//!
//! Tags are appended by a fixed sequence of rules. Each rule reads the overall
//! score, the sub-scores or the raw snapshot; duplicates are not removed.

use crate::types::{
    CategoryTotals, ScoreBreakdown, UsageSnapshot, WellnessTag, CATEGORY_PRODUCTIVITY,
    CATEGORY_SOCIAL,
};

/// Earliest start hour (inclusive upper bound) that marks an early riser
const EARLY_BIRD_MAX_START_HOUR: i32 = 6;

/// Derive the ordered tag list for one analysis
pub fn generate_tags(
    snapshot: &UsageSnapshot,
    overall: f64,
    scores: &ScoreBreakdown,
) -> Vec<WellnessTag> {
    let mut tags = vec![tier_tag(overall)];

    let hours = f64::from(snapshot.total_screen_time_minutes) / 60.0;
    tags.extend(volume_tag(hours));

    if scores.timing < 60.0 {
        tags.push(WellnessTag::NightOwl);
    }

    if snapshot
        .sessions
        .iter()
        .any(|s| s.start_hour <= EARLY_BIRD_MAX_START_HOUR)
    {
        tags.push(WellnessTag::EarlyBird);
    }

    tags.extend(category_tags(snapshot));

    let app_count = snapshot.apps.len();
    if app_count <= 2 {
        tags.push(WellnessTag::SingleMinded);
    } else if app_count >= 10 {
        tags.push(WellnessTag::Multitasker);
    }

    if scores.breaks >= 80.0 {
        tags.push(WellnessTag::GoodBreaks);
    } else if scores.breaks < 50.0 {
        tags.push(WellnessTag::MarathonSessions);
    }

    tags
}

/// Exactly one of the three tiers
fn tier_tag(overall: f64) -> WellnessTag {
    if overall >= 80.0 {
        WellnessTag::Balanced
    } else if overall >= 60.0 {
        WellnessTag::Moderate
    } else {
        WellnessTag::NeedsAttention
    }
}

/// Daily volume label; 3 to 8 hours gets none
fn volume_tag(hours: f64) -> Option<WellnessTag> {
    if hours > 10.0 {
        Some(WellnessTag::HeavyUser)
    } else if hours > 8.0 {
        Some(WellnessTag::Workaholic)
    } else if hours < 3.0 {
        Some(WellnessTag::LightUser)
    } else {
        None
    }
}

/// Category shares measured against total screen time, not the app sum
fn category_tags(snapshot: &UsageSnapshot) -> Vec<WellnessTag> {
    let total = snapshot.total_screen_time_minutes;
    if total == 0 {
        return Vec::new();
    }

    let totals = CategoryTotals::from_apps(&snapshot.apps);
    let share = |category: &str| totals.get(category) as f64 / f64::from(total) * 100.0;

    let mut tags = Vec::new();
    if share(CATEGORY_PRODUCTIVITY) > 50.0 {
        tags.push(WellnessTag::Focused);
    }
    if share(CATEGORY_SOCIAL) > 40.0 {
        tags.push(WellnessTag::SocialButterfly);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppUsage, Session};
    use pretty_assertions::assert_eq;

    fn neutral_scores() -> ScoreBreakdown {
        ScoreBreakdown {
            screen_time: 100.0,
            diversity: 50.0,
            timing: 50.0,
            balance: 50.0,
            breaks: 60.0,
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_tag(80.0), WellnessTag::Balanced);
        assert_eq!(tier_tag(79.8), WellnessTag::Moderate);
        assert_eq!(tier_tag(60.0), WellnessTag::Moderate);
        assert_eq!(tier_tag(59.9), WellnessTag::NeedsAttention);
        assert_eq!(tier_tag(0.0), WellnessTag::NeedsAttention);
    }

    #[test]
    fn test_volume_boundaries() {
        assert_eq!(volume_tag(10.5), Some(WellnessTag::HeavyUser));
        assert_eq!(volume_tag(10.0), Some(WellnessTag::Workaholic));
        assert_eq!(volume_tag(8.0), None);
        assert_eq!(volume_tag(3.0), None);
        assert_eq!(volume_tag(2.9), Some(WellnessTag::LightUser));
    }

    #[test]
    fn test_empty_snapshot_tags() {
        let tags = generate_tags(&UsageSnapshot::default(), 66.0, &neutral_scores());
        assert_eq!(
            tags,
            vec![
                WellnessTag::Moderate,
                WellnessTag::LightUser,
                WellnessTag::NightOwl,
                WellnessTag::SingleMinded,
            ]
        );
    }

    #[test]
    fn test_early_bird_added_once() {
        let snapshot = UsageSnapshot {
            total_screen_time_minutes: 300,
            sessions: vec![Session::new(5, 6, None), Session::new(6, 7, None)],
            ..Default::default()
        };
        let tags = generate_tags(&snapshot, 70.0, &neutral_scores());
        let count = tags.iter().filter(|t| **t == WellnessTag::EarlyBird).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_category_tags_use_total_screen_time() {
        // 200 social minutes against 400 total is 50%
        let snapshot = UsageSnapshot {
            total_screen_time_minutes: 400,
            apps: vec![
                AppUsage::new("Instagram", "social", 200),
                AppUsage::new("Docs", "productivity", 201),
            ],
            ..Default::default()
        };
        let tags = category_tags(&snapshot);
        assert_eq!(tags, vec![WellnessTag::Focused, WellnessTag::SocialButterfly]);
    }

    #[test]
    fn test_category_tags_skip_zero_total() {
        let snapshot = UsageSnapshot {
            apps: vec![AppUsage::new("Docs", "productivity", 120)],
            ..Default::default()
        };
        assert!(category_tags(&snapshot).is_empty());
    }

    #[test]
    fn test_app_count_and_break_tags() {
        let snapshot = UsageSnapshot {
            total_screen_time_minutes: 300,
            apps: (0..10)
                .map(|i| AppUsage::new(format!("app-{i}"), "other", 30))
                .collect(),
            ..Default::default()
        };
        let mut scores = neutral_scores();
        scores.timing = 100.0;
        scores.breaks = 85.0;

        let tags = generate_tags(&snapshot, 85.0, &scores);
        assert_eq!(
            tags,
            vec![
                WellnessTag::Balanced,
                WellnessTag::Multitasker,
                WellnessTag::GoodBreaks,
            ]
        );

        scores.breaks = 40.0;
        let tags = generate_tags(&snapshot, 85.0, &scores);
        assert_eq!(tags.last(), Some(&WellnessTag::MarathonSessions));
    }
}
