//! Wellness sub-scorers and aggregation
//!
//! Five independent heuristics each map part of a snapshot to a 0-100 rating,
//! and a fixed weighting combines them into the overall score.

use crate::rules::{first_match, Rule, RuleTable};
use crate::types::{
    AppUsage, CategoryTotals, ScoreBreakdown, Session, CATEGORY_PRODUCTIVITY, CATEGORY_SOCIAL,
};

/// Score used when there is nothing to evaluate
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Break score when fewer than two sessions exist
pub const NEUTRAL_BREAK_SCORE: f64 = 60.0;

/// Break score when sessions exist but none are separated by a gap
const NO_BREAKS_SCORE: f64 = 40.0;

/// Weights for screen time, diversity, timing, balance, breaks
pub const WEIGHTS: ScoreBreakdown = ScoreBreakdown {
    screen_time: 0.30,
    diversity: 0.15,
    timing: 0.25,
    balance: 0.20,
    breaks: 0.10,
};

/// Daily hours to score, inclusive upper bounds
const SCREEN_TIME_RULES: RuleTable<f64, f64> = RuleTable {
    rules: &[
        Rule { condition: |h| h <= 4.0, value: 100.0 },
        Rule { condition: |h| h <= 6.0, value: 85.0 },
        Rule { condition: |h| h <= 8.0, value: 70.0 },
        Rule { condition: |h| h <= 10.0, value: 50.0 },
        Rule { condition: |h| h <= 12.0, value: 30.0 },
    ],
    otherwise: 10.0,
};

/// App count to score; the 4-8 sweet spot is checked before the wider band
const DIVERSITY_RULES: RuleTable<usize, f64> = RuleTable {
    rules: &[
        Rule { condition: |n| (4..=8).contains(&n), value: 100.0 },
        Rule { condition: |n| (2..=10).contains(&n), value: 80.0 },
        Rule { condition: |n| n == 1, value: 40.0 },
    ],
    otherwise: 60.0,
};

/// Late-night minutes to penalty, most severe first
const LATE_NIGHT_PENALTIES: &[Rule<i64, f64>] = &[
    Rule { condition: |m| m > 120, value: 40.0 },
    Rule { condition: |m| m > 60, value: 25.0 },
    Rule { condition: |m| m > 30, value: 15.0 },
];

const EARLY_MORNING_PENALTIES: &[Rule<i64, f64>] = &[Rule { condition: |m| m > 60, value: 10.0 }];

/// Largest category share (percent) to penalty
const DOMINANT_CATEGORY_PENALTIES: &[Rule<f64, f64>] = &[
    Rule { condition: |p| p > 70.0, value: 30.0 },
    Rule { condition: |p| p > 60.0, value: 15.0 },
];

const PRODUCTIVITY_BONUSES: &[Rule<f64, f64>] = &[Rule {
    condition: |p| (30.0..=60.0).contains(&p),
    value: 10.0,
}];

const SOCIAL_PENALTIES: &[Rule<f64, f64>] = &[
    Rule { condition: |p| p > 40.0, value: 20.0 },
    Rule { condition: |p| p > 30.0, value: 10.0 },
];

/// Average break length (hours) to score. The 1-2 band sits inside the
/// 0.5-3 band and must stay first.
const BREAK_RULES: RuleTable<f64, f64> = RuleTable {
    rules: &[
        Rule { condition: |h| (1.0..=2.0).contains(&h), value: 100.0 },
        Rule { condition: |h| (0.5..=3.0).contains(&h), value: 85.0 },
        Rule { condition: |h| h < 0.5, value: 50.0 },
    ],
    otherwise: 70.0,
};

/// Compute all five sub-scores for a snapshot's parts
pub fn score_all(total_minutes: u32, apps: &[AppUsage], sessions: &[Session]) -> ScoreBreakdown {
    ScoreBreakdown {
        screen_time: score_screen_time(total_minutes),
        diversity: score_app_diversity(apps),
        timing: score_usage_timing(sessions),
        balance: score_category_balance(apps),
        breaks: score_breaks(sessions),
    }
}

/// Step function over total hours of use
pub fn score_screen_time(total_minutes: u32) -> f64 {
    let hours = f64::from(total_minutes) / 60.0;
    SCREEN_TIME_RULES.evaluate(hours)
}

/// Rewards a moderate number of distinct apps
pub fn score_app_diversity(apps: &[AppUsage]) -> f64 {
    if apps.is_empty() {
        return NEUTRAL_SCORE;
    }
    DIVERSITY_RULES.evaluate(apps.len())
}

/// Penalizes minutes spent in sessions touching the late-night or
/// early-morning windows.
///
/// A session counts toward late night when either endpoint is at or after
/// 23h or at or before 2h, and toward early morning when either endpoint is
/// within 5h-7h. One session can count toward both.
pub fn score_usage_timing(sessions: &[Session]) -> f64 {
    if sessions.is_empty() {
        return NEUTRAL_SCORE;
    }

    let mut late_night: i64 = 0;
    let mut early_morning: i64 = 0;

    for session in sessions {
        let duration = session.duration_minutes();
        if is_late_night_hour(session.start_hour) || is_late_night_hour(session.end_hour) {
            late_night = late_night.saturating_add(duration);
        }
        if is_early_morning_hour(session.start_hour) || is_early_morning_hour(session.end_hour) {
            early_morning = early_morning.saturating_add(duration);
        }
    }

    let penalty = first_match(LATE_NIGHT_PENALTIES, late_night).unwrap_or(0.0)
        + first_match(EARLY_MORNING_PENALTIES, early_morning).unwrap_or(0.0);

    (100.0 - penalty).max(0.0)
}

fn is_late_night_hour(hour: i32) -> bool {
    hour >= 23 || hour <= 2
}

fn is_early_morning_hour(hour: i32) -> bool {
    (5..=7).contains(&hour)
}

/// Penalizes a single dominant category or heavy social use, and rewards a
/// moderate productivity share
pub fn score_category_balance(apps: &[AppUsage]) -> f64 {
    if apps.is_empty() {
        return NEUTRAL_SCORE;
    }

    let totals = CategoryTotals::from_apps(apps);
    let total = totals.total();
    if total == 0 {
        return NEUTRAL_SCORE;
    }

    let share = |minutes: u64| minutes as f64 / total as f64 * 100.0;
    let dominant = totals
        .iter()
        .map(|(_, minutes)| share(minutes))
        .fold(0.0_f64, f64::max);
    let productivity = share(totals.get(CATEGORY_PRODUCTIVITY));
    let social = share(totals.get(CATEGORY_SOCIAL));

    let score = 100.0 - first_match(DOMINANT_CATEGORY_PENALTIES, dominant).unwrap_or(0.0)
        + first_match(PRODUCTIVITY_BONUSES, productivity).unwrap_or(0.0)
        - first_match(SOCIAL_PENALTIES, social).unwrap_or(0.0);

    score.clamp(0.0, 100.0)
}

/// Rates the average positive gap between consecutive sessions
pub fn score_breaks(sessions: &[Session]) -> f64 {
    if sessions.len() <= 1 {
        return NEUTRAL_BREAK_SCORE;
    }

    let gaps = break_gaps(sessions);
    if gaps.is_empty() {
        return NO_BREAKS_SCORE;
    }

    let average = gaps.iter().map(|&g| g as f64).sum::<f64>() / gaps.len() as f64;
    BREAK_RULES.evaluate(average)
}

/// Positive gaps (hours) between sessions ordered by start hour.
/// Overlapping and back-to-back pairs are dropped.
fn break_gaps(sessions: &[Session]) -> Vec<i64> {
    let mut ordered = sessions.to_vec();
    ordered.sort_by_key(|s| s.start_hour);

    ordered
        .windows(2)
        .map(|pair| i64::from(pair[1].start_hour) - i64::from(pair[0].end_hour))
        .filter(|&gap| gap > 0)
        .collect()
}

/// Weighted combination of the five sub-scores
pub fn overall_score(scores: &ScoreBreakdown) -> f64 {
    scores.screen_time * WEIGHTS.screen_time
        + scores.diversity * WEIGHTS.diversity
        + scores.timing * WEIGHTS.timing
        + scores.balance * WEIGHTS.balance
        + scores.breaks * WEIGHTS.breaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apps(categories: &[(&str, u32)]) -> Vec<AppUsage> {
        categories
            .iter()
            .enumerate()
            .map(|(i, (cat, minutes))| AppUsage::new(format!("app-{i}"), *cat, *minutes))
            .collect()
    }

    fn sessions(spans: &[(i32, i32)]) -> Vec<Session> {
        spans
            .iter()
            .map(|&(start, end)| Session::new(start, end, None))
            .collect()
    }

    #[test]
    fn test_screen_time_steps() {
        assert_eq!(score_screen_time(0), 100.0);
        assert_eq!(score_screen_time(240), 100.0);
        assert_eq!(score_screen_time(241), 85.0);
        assert_eq!(score_screen_time(360), 85.0);
        assert_eq!(score_screen_time(480), 70.0);
        assert_eq!(score_screen_time(540), 50.0);
        assert_eq!(score_screen_time(720), 30.0);
        assert_eq!(score_screen_time(721), 10.0);
    }

    #[test]
    fn test_screen_time_never_increases() {
        let mut previous = score_screen_time(0);
        for minutes in (0..=1_000).step_by(7) {
            let score = score_screen_time(minutes);
            assert!(score <= previous, "score rose at {minutes} minutes");
            previous = score;
        }
    }

    #[test]
    fn test_app_diversity_bands() {
        assert_eq!(score_app_diversity(&[]), NEUTRAL_SCORE);
        assert_eq!(score_app_diversity(&apps(&[("social", 10)])), 40.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 2])), 80.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 3])), 80.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 4])), 100.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 8])), 100.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 9])), 80.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 10])), 80.0);
        assert_eq!(score_app_diversity(&apps(&[("social", 10); 11])), 60.0);
    }

    #[test]
    fn test_timing_neutral_without_sessions() {
        assert_eq!(score_usage_timing(&[]), NEUTRAL_SCORE);
    }

    #[test]
    fn test_timing_late_night_ladder() {
        // 9-12 is daytime; no penalty
        assert_eq!(score_usage_timing(&sessions(&[(9, 12)])), 100.0);
        // End hour 23 qualifies; 60 minutes is > 30 but not > 60
        assert_eq!(score_usage_timing(&[Session::new(22, 23, Some(60))]), 85.0);
        assert_eq!(score_usage_timing(&[Session::new(22, 23, Some(61))]), 75.0);
        assert_eq!(score_usage_timing(&[Session::new(0, 3, None)]), 60.0);
        assert_eq!(score_usage_timing(&[Session::new(22, 23, Some(30))]), 100.0);
    }

    #[test]
    fn test_timing_penalties_stack() {
        // 1-6 touches both windows: 300 minutes late night and early morning
        assert_eq!(score_usage_timing(&sessions(&[(1, 6)])), 50.0);
        // Early morning only
        assert_eq!(score_usage_timing(&sessions(&[(6, 8)])), 90.0);
    }

    #[test]
    fn test_timing_accepts_negative_durations() {
        // 23 -> 1 derives -1320 minutes; nothing exceeds the thresholds
        assert_eq!(score_usage_timing(&sessions(&[(23, 1)])), 100.0);
    }

    #[test]
    fn test_balance_neutral_cases() {
        assert_eq!(score_category_balance(&[]), NEUTRAL_SCORE);
        assert_eq!(score_category_balance(&apps(&[("social", 0), ("other", 0)])), NEUTRAL_SCORE);
    }

    #[test]
    fn test_balance_adjustments_combine() {
        // productivity 40%, social 35%, entertainment 25%: +10 bonus, -10 social
        let mixed = apps(&[("productivity", 40), ("social", 35), ("entertainment", 25)]);
        assert_eq!(score_category_balance(&mixed), 100.0);

        // social 100%: -30 dominant, -20 social
        assert_eq!(score_category_balance(&apps(&[("social", 90)])), 50.0);

        // social 65%, productivity 35%: -15 dominant, +10 bonus, -20 social
        let skewed = apps(&[("social", 65), ("productivity", 35)]);
        assert_eq!(score_category_balance(&skewed), 75.0);
    }

    #[test]
    fn test_balance_unknown_category_counts_as_generic() {
        // gaming 75% dominates; no productivity or social adjustments
        let gaming = apps(&[("gaming", 75), ("entertainment", 25)]);
        assert_eq!(score_category_balance(&gaming), 70.0);
    }

    #[test]
    fn test_breaks_neutral_and_no_gap() {
        assert_eq!(score_breaks(&[]), NEUTRAL_BREAK_SCORE);
        assert_eq!(score_breaks(&sessions(&[(9, 12)])), NEUTRAL_BREAK_SCORE);
        // Back-to-back and overlapping sessions give no breaks
        assert_eq!(score_breaks(&sessions(&[(9, 12), (12, 14), (13, 15)])), 40.0);
    }

    #[test]
    fn test_breaks_average_bands() {
        assert_eq!(score_breaks(&sessions(&[(9, 10), (11, 12)])), 100.0);
        assert_eq!(score_breaks(&sessions(&[(9, 10), (12, 13)])), 100.0);
        assert_eq!(score_breaks(&sessions(&[(9, 10), (13, 14)])), 85.0);
        assert_eq!(score_breaks(&sessions(&[(8, 9), (13, 14)])), 70.0);
    }

    #[test]
    fn test_breaks_sorts_by_start_hour() {
        let unordered = sessions(&[(14, 18), (9, 12), (22, 23)]);
        // gaps 2 and 4, average 3
        assert_eq!(score_breaks(&unordered), 85.0);
    }

    #[test]
    fn test_breaks_with_extreme_hours() {
        // gap of i32::MAX - i32::MIN hours lands in the widest band
        let extreme = sessions(&[(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)]);
        assert_eq!(score_breaks(&extreme), 70.0);
    }

    #[test]
    fn test_timing_saturates_huge_durations() {
        let huge = vec![
            Session::new(23, 1, Some(i64::MAX)),
            Session::new(0, 1, Some(i64::MAX)),
        ];
        assert_eq!(score_usage_timing(&huge), 60.0);
    }

    #[test]
    fn test_break_rules_below_half_hour() {
        assert_eq!(BREAK_RULES.evaluate(0.25), 50.0);
        assert_eq!(BREAK_RULES.evaluate(0.5), 85.0);
        assert_eq!(BREAK_RULES.evaluate(3.5), 70.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = WEIGHTS.entries().iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_score_weighting() {
        let scores = ScoreBreakdown {
            screen_time: 70.0,
            diversity: 100.0,
            timing: 85.0,
            balance: 70.0,
            breaks: 85.0,
        };
        assert!((overall_score(&scores) - 79.75).abs() < 1e-9);
    }
}
