//! Natural-language insight generation
//!
//! Turns an [`AnalysisResult`] into a short coaching message. The networked
//! generator calls an OpenAI-compatible chat endpoint; the template generator
//! builds the sentence locally. [`InsightService`] picks one from
//! configuration and always falls back to the template.

mod openai;
mod template;

pub use openai::{build_prompt, OpenAiInsightGenerator, SYSTEM_PROMPT};
pub use template::TemplateInsightGenerator;

use crate::config::InsightConfig;
use crate::error::InsightError;
use crate::types::{AnalysisResult, UsageSnapshot};

/// Capability to describe an analysis in prose
pub trait InsightGenerator: Send + Sync {
    /// Short identifier used in logs and diagnostics
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        result: &AnalysisResult,
        snapshot: &UsageSnapshot,
    ) -> Result<String, InsightError>;
}

/// Generator selection with guaranteed local fallback
pub struct InsightService {
    primary: Option<Box<dyn InsightGenerator>>,
    fallback: TemplateInsightGenerator,
}

impl Default for InsightService {
    fn default() -> Self {
        Self::template_only()
    }
}

impl InsightService {
    /// Use the networked generator when configured, the template otherwise
    pub fn from_config(config: &InsightConfig) -> Self {
        if !config.networked_available() {
            tracing::info!("insight service using local template");
            return Self::template_only();
        }

        match OpenAiInsightGenerator::from_config(config) {
            Ok(generator) => {
                tracing::info!(model = %config.model, "insight service using networked generator");
                Self::with_primary(Box::new(generator))
            }
            Err(e) => {
                tracing::warn!(error = %e, "networked insights unavailable, using local template");
                Self::template_only()
            }
        }
    }

    pub fn template_only() -> Self {
        Self {
            primary: None,
            fallback: TemplateInsightGenerator,
        }
    }

    pub fn with_primary(primary: Box<dyn InsightGenerator>) -> Self {
        Self {
            primary: Some(primary),
            fallback: TemplateInsightGenerator,
        }
    }

    /// Name of the generator tried first
    pub fn backend_name(&self) -> &'static str {
        self.primary
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.fallback.name())
    }

    /// Produce an insight. Failures of the primary generator are logged and
    /// answered by the template.
    pub fn generate(&self, result: &AnalysisResult, snapshot: &UsageSnapshot) -> String {
        if let Some(primary) = &self.primary {
            match primary.generate(result, snapshot) {
                Ok(text) => return text,
                Err(e) => {
                    tracing::warn!(generator = primary.name(), error = %e, "insight generation failed, falling back to template");
                }
            }
        }
        self.fallback.render(result)
    }
}
