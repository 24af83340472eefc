//! Wellness analysis orchestration
//!
//! This module provides the public API for scoring a usage snapshot.
//! Pipeline: Snapshot → Sub-scores → Overall score → Tags → Patterns → Result

use crate::error::WellnessError;
use crate::patterns::detect_patterns;
use crate::scoring::{overall_score, score_all};
use crate::tags::generate_tags;
use crate::types::{round_one_decimal, AnalysisResult, UsageMetrics, UsageSnapshot};

/// Highest score any rating can reach
pub const MAX_SCORE: f64 = 100.0;

/// Rule-based scoring engine.
///
/// Holds no state besides the score ceiling, so one analyzer can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct WellnessAnalyzer {
    max_score: f64,
}

impl Default for WellnessAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl WellnessAnalyzer {
    pub fn new() -> Self {
        Self {
            max_score: MAX_SCORE,
        }
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// Score one day of usage
    pub fn analyze(&self, snapshot: &UsageSnapshot) -> AnalysisResult {
        // Stage 1: Independent sub-scores
        let raw = score_all(
            snapshot.total_screen_time_minutes,
            &snapshot.apps,
            &snapshot.sessions,
        );

        // Stage 2: Weighted overall score
        let overall = overall_score(&raw).clamp(0.0, self.max_score);

        // Stage 3: Tags from scores and raw data
        let tags = generate_tags(snapshot, overall, &raw);

        // Stage 4: Patterns from raw data only
        let patterns = detect_patterns(snapshot);

        tracing::debug!(
            overall,
            screen_time = raw.screen_time,
            diversity = raw.diversity,
            timing = raw.timing,
            balance = raw.balance,
            breaks = raw.breaks,
            tags = tags.len(),
            patterns = patterns.len(),
            "analyzed usage snapshot"
        );

        AnalysisResult {
            overall_score: round_one_decimal(overall),
            breakdown: raw.rounded(),
            tags,
            patterns,
            metrics: UsageMetrics {
                total_screen_time_hours: round_one_decimal(
                    f64::from(snapshot.total_screen_time_minutes) / 60.0,
                ),
                app_count: snapshot.apps.len(),
                session_count: snapshot.sessions.len(),
            },
        }
    }

    /// Parse, score and serialize in one call
    pub fn analyze_json(&self, snapshot_json: &str) -> Result<String, WellnessError> {
        let snapshot = parse_snapshot(snapshot_json)?;
        let result = self.analyze(&snapshot);
        serde_json::to_string(&result).map_err(WellnessError::JsonError)
    }
}

/// Parse a usage snapshot from JSON
pub fn parse_snapshot(json: &str) -> Result<UsageSnapshot, WellnessError> {
    if json.trim().is_empty() {
        return Err(WellnessError::EmptyInput);
    }
    serde_json::from_str(json).map_err(|e| WellnessError::ParseError(e.to_string()))
}

/// Score a snapshot JSON string with a default analyzer (stateless, one-shot).
///
/// # Example
/// ```
/// let result = screen_wellness::analyze_json(r#"{"total_screen_time_minutes": 120}"#).unwrap();
/// assert!(result.contains("overall_score"));
/// ```
pub fn analyze_json(snapshot_json: &str) -> Result<String, WellnessError> {
    WellnessAnalyzer::new().analyze_json(snapshot_json)
}
