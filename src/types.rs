//! Core data types for Screen Wellness
//!
//! The input side is a single day's [`UsageSnapshot`]; the output side is the
//! [`AnalysisResult`] produced by the scoring engine. Every input field is
//! optional on the wire and defaulted here, once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category label for productive work apps
pub const CATEGORY_PRODUCTIVITY: &str = "productivity";

/// Category label for social apps
pub const CATEGORY_SOCIAL: &str = "social";

/// Category label for entertainment apps
pub const CATEGORY_ENTERTAINMENT: &str = "entertainment";

/// Category assigned when an app record carries none
pub const CATEGORY_OTHER: &str = "other";

/// One day of device usage submitted for analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Calendar day the snapshot covers (not used for scoring)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Total minutes of device use for the day
    #[serde(default)]
    pub total_screen_time_minutes: u32,
    /// Per-app usage records
    #[serde(default)]
    pub apps: Vec<AppUsage>,
    /// Usage sessions, in any order
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// Usage of a single app over the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUsage {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Free-text category; unrecognized values only count as a generic bucket
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub minutes: u32,
}

fn default_app_name() -> String {
    "Unknown".to_string()
}

fn default_category() -> String {
    CATEGORY_OTHER.to_string()
}

impl AppUsage {
    pub fn new(name: impl Into<String>, category: impl Into<String>, minutes: u32) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            minutes,
        }
    }
}

/// A contiguous usage session expressed in hours of the day.
///
/// Hours are not range-checked; out-of-range values flow through the
/// arithmetic as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub start_hour: i32,
    #[serde(default)]
    pub end_hour: i32,
    /// Explicit duration; derived from the hour span when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
}

impl Session {
    pub fn new(start_hour: i32, end_hour: i32, minutes: Option<i64>) -> Self {
        Self {
            start_hour,
            end_hour,
            minutes,
        }
    }

    /// Session length in minutes. May be zero or negative when `end_hour`
    /// precedes `start_hour` and no explicit duration was given.
    pub fn duration_minutes(&self) -> i64 {
        self.minutes.unwrap_or_else(|| self.span_hours() * 60)
    }

    /// Raw hour span `end_hour - start_hour`, widened so any pair of hours fits
    pub fn span_hours(&self) -> i64 {
        i64::from(self.end_hour) - i64::from(self.start_hour)
    }
}

/// Per-category minute totals in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, u64)>,
}

impl CategoryTotals {
    /// Sum app minutes by category
    pub fn from_apps(apps: &[AppUsage]) -> Self {
        let mut entries: Vec<(String, u64)> = Vec::new();
        for app in apps {
            match entries.iter_mut().find(|(cat, _)| *cat == app.category) {
                Some((_, minutes)) => *minutes += u64::from(app.minutes),
                None => entries.push((app.category.clone(), u64::from(app.minutes))),
            }
        }
        Self { entries }
    }

    /// Minutes recorded for `category`, 0 if it never appeared
    pub fn get(&self, category: &str) -> u64 {
        self.entries
            .iter()
            .find(|(cat, _)| cat == category)
            .map(|(_, minutes)| *minutes)
            .unwrap_or(0)
    }

    /// Sum over all categories
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, minutes)| minutes).sum()
    }

    /// The category with the most minutes. Ties go to the category seen first.
    pub fn dominant(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (cat, minutes) in &self.entries {
            if best.map_or(true, |(_, m)| *minutes > m) {
                best = Some((cat.as_str(), *minutes));
            }
        }
        best
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(cat, minutes)| (cat.as_str(), *minutes))
    }
}

/// Behavioral label attached to an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WellnessTag {
    Balanced,
    Moderate,
    NeedsAttention,
    HeavyUser,
    Workaholic,
    LightUser,
    NightOwl,
    EarlyBird,
    Focused,
    SocialButterfly,
    SingleMinded,
    Multitasker,
    GoodBreaks,
    MarathonSessions,
}

impl WellnessTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            WellnessTag::Balanced => "balanced",
            WellnessTag::Moderate => "moderate",
            WellnessTag::NeedsAttention => "needs-attention",
            WellnessTag::HeavyUser => "heavy-user",
            WellnessTag::Workaholic => "workaholic",
            WellnessTag::LightUser => "light-user",
            WellnessTag::NightOwl => "night-owl",
            WellnessTag::EarlyBird => "early-bird",
            WellnessTag::Focused => "focused",
            WellnessTag::SocialButterfly => "social-butterfly",
            WellnessTag::SingleMinded => "single-minded",
            WellnessTag::Multitasker => "multitasker",
            WellnessTag::GoodBreaks => "good-breaks",
            WellnessTag::MarathonSessions => "marathon-sessions",
        }
    }

    /// Whether this tag is one of the three overall tiers
    pub fn is_tier(&self) -> bool {
        matches!(
            self,
            WellnessTag::Balanced | WellnessTag::Moderate | WellnessTag::NeedsAttention
        )
    }
}

impl std::fmt::Display for WellnessTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five sub-scores, each in 0-100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub screen_time: f64,
    pub diversity: f64,
    pub timing: f64,
    pub balance: f64,
    pub breaks: f64,
}

impl ScoreBreakdown {
    /// Copy with every sub-score rounded to one decimal
    pub fn rounded(&self) -> Self {
        Self {
            screen_time: round_one_decimal(self.screen_time),
            diversity: round_one_decimal(self.diversity),
            timing: round_one_decimal(self.timing),
            balance: round_one_decimal(self.balance),
            breaks: round_one_decimal(self.breaks),
        }
    }

    /// (wire name, value) pairs in reporting order
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("screen_time", self.screen_time),
            ("diversity", self.diversity),
            ("timing", self.timing),
            ("balance", self.balance),
            ("breaks", self.breaks),
        ]
    }
}

/// Summary figures echoed alongside the scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageMetrics {
    pub total_screen_time_hours: f64,
    pub app_count: usize,
    pub session_count: usize,
}

/// Output of one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub breakdown: ScoreBreakdown,
    pub tags: Vec<WellnessTag>,
    pub patterns: Vec<String>,
    pub metrics: UsageMetrics,
}

impl AnalysisResult {
    pub fn has_tag(&self, tag: WellnessTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Analysis merged with a natural-language insight, as returned over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub llm_insight: String,
}

/// Round to one decimal place.
///
/// Goes through float formatting, which rounds the exact binary value with
/// ties to even, so `93.25` becomes `93.2`.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_defaults_from_empty_object() {
        let snapshot: UsageSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, UsageSnapshot::default());
    }

    #[test]
    fn test_app_and_session_field_defaults() {
        let json = r#"{
            "apps": [{}],
            "sessions": [{"start_hour": 9}]
        }"#;
        let snapshot: UsageSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.apps[0], AppUsage::new("Unknown", "other", 0));
        assert_eq!(snapshot.sessions[0], Session::new(9, 0, None));
    }

    #[test]
    fn test_unknown_fields_ignored_and_date_parsed() {
        let json = r#"{"date": "2025-11-28", "device": "pixel", "total_screen_time_minutes": 30}"#;
        let snapshot: UsageSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.date, NaiveDate::from_ymd_opt(2025, 11, 28));
        assert_eq!(snapshot.total_screen_time_minutes, 30);
    }

    #[test]
    fn test_session_duration() {
        assert_eq!(Session::new(9, 12, Some(150)).duration_minutes(), 150);
        assert_eq!(Session::new(9, 12, None).duration_minutes(), 180);
        // Reversed spans are accepted and go negative
        assert_eq!(Session::new(23, 1, None).duration_minutes(), -1320);
    }

    #[test]
    fn test_session_span_does_not_overflow() {
        let session = Session::new(i32::MIN, i32::MAX, None);
        assert_eq!(session.span_hours(), 4_294_967_295);
        assert_eq!(session.duration_minutes(), 4_294_967_295 * 60);
    }

    #[test]
    fn test_category_totals_preserve_first_seen_order() {
        let apps = vec![
            AppUsage::new("Docs", "productivity", 60),
            AppUsage::new("Instagram", "social", 60),
            AppUsage::new("Sheets", "productivity", 30),
            AppUsage::new("TikTok", "social", 30),
        ];
        let totals = CategoryTotals::from_apps(&apps);

        assert_eq!(totals.get("productivity"), 90);
        assert_eq!(totals.get("social"), 90);
        assert_eq!(totals.get("gaming"), 0);
        assert_eq!(totals.total(), 180);
        // Tie resolves to the first category seen
        assert_eq!(totals.dominant(), Some(("productivity", 90)));
    }

    #[test]
    fn test_tag_wire_names() {
        let tags = vec![WellnessTag::NeedsAttention, WellnessTag::SocialButterfly];
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["needs-attention","social-butterfly"]"#);
        for tag in tags {
            assert_eq!(serde_json::to_value(tag).unwrap(), tag.as_str());
        }
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(79.75), 79.8);
        assert_eq!(round_one_decimal(66.0), 66.0);
        assert_eq!(round_one_decimal(8.333), 8.3);
    }

    #[test]
    fn test_round_one_decimal_ties_to_even() {
        assert_eq!(round_one_decimal(93.25), 93.2);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(70.75), 70.8);
        assert_eq!(round_one_decimal(-2.25), -2.2);
    }

    #[test]
    fn test_insight_response_flattens_analysis() {
        let response = InsightResponse {
            analysis: AnalysisResult {
                overall_score: 66.0,
                breakdown: ScoreBreakdown {
                    screen_time: 100.0,
                    diversity: 50.0,
                    timing: 50.0,
                    balance: 50.0,
                    breaks: 60.0,
                },
                tags: vec![WellnessTag::Moderate],
                patterns: vec![],
                metrics: UsageMetrics {
                    total_screen_time_hours: 0.0,
                    app_count: 0,
                    session_count: 0,
                },
            },
            llm_insight: "ok".to_string(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["overall_score"], 66.0);
        assert_eq!(value["breakdown"]["breaks"], 60.0);
        assert_eq!(value["llm_insight"], "ok");

        let back: InsightResponse = serde_json::from_value(value).unwrap();
        assert_eq!(back, response);
    }
}
