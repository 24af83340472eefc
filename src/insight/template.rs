//! Local template insight generator

use crate::error::InsightError;
use crate::insight::InsightGenerator;
use crate::types::{AnalysisResult, UsageSnapshot, WellnessTag};

/// Builds an insight from fixed sentences keyed on score, tags and breakdown
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateInsightGenerator;

impl TemplateInsightGenerator {
    /// Opening line, first matching observation, first matching recommendation
    pub fn render(&self, result: &AnalysisResult) -> String {
        let score = result.overall_score;
        let hours = result.metrics.total_screen_time_hours;

        let mut parts = vec![opening(score)];

        if let Some(observation) = observations(result, hours).into_iter().next() {
            parts.push(format!("{observation}."));
        }
        if let Some(recommendation) = recommendations(result, hours).into_iter().next() {
            parts.push(format!("Recommendation: {recommendation}."));
        }

        parts.join(" ")
    }
}

impl InsightGenerator for TemplateInsightGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _snapshot: &UsageSnapshot,
    ) -> Result<String, InsightError> {
        Ok(self.render(result))
    }
}

fn opening(score: f64) -> String {
    if score >= 80.0 {
        format!("Your wellness score of {score:.1}/100 reflects strong digital habits.")
    } else if score >= 60.0 {
        format!(
            "Your wellness score of {score:.1}/100 indicates generally balanced usage with areas to refine."
        )
    } else {
        format!("Your wellness score of {score:.1}/100 suggests several patterns worth addressing.")
    }
}

fn observations(result: &AnalysisResult, hours: f64) -> Vec<String> {
    let mut observations = Vec::new();

    if result.has_tag(WellnessTag::NightOwl) {
        observations.push("Late-night screen time may be affecting sleep quality".to_string());
    }
    if result.has_tag(WellnessTag::Workaholic) || result.has_tag(WellnessTag::HeavyUser) {
        observations.push(format!(
            "Your daily usage of {hours:.1} hours may benefit from clearer boundaries"
        ));
    }
    if result.has_tag(WellnessTag::MarathonSessions) {
        observations.push("Long sessions without breaks can contribute to fatigue".to_string());
    }
    if result.has_tag(WellnessTag::SocialButterfly) {
        observations.push("High social media usage was detected".to_string());
    }
    if result.has_tag(WellnessTag::Balanced) {
        observations.push("Your overall app usage balance is healthy".to_string());
    }

    observations
}

/// Only offered below a score of 70
fn recommendations(result: &AnalysisResult, hours: f64) -> Vec<&'static str> {
    let mut recommendations = Vec::new();
    if result.overall_score >= 70.0 {
        return recommendations;
    }

    if result.breakdown.timing < 60.0 {
        recommendations.push("Try reducing screen exposure one hour before bedtime");
    }
    if result.breakdown.breaks < 60.0 {
        recommendations.push("Use the 20-20-20 rule to reduce eye strain");
    }
    if hours > 8.0 {
        recommendations.push("Consider setting daily screen time limits");
    }

    recommendations
}
