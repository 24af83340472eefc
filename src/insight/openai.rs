//! Networked insight generator for OpenAI-compatible chat endpoints
//!
//! Uses ureq (sync HTTP); callers on an async runtime should run it on a
//! blocking worker.

use crate::config::InsightConfig;
use crate::error::InsightError;
use crate::insight::InsightGenerator;
use crate::types::{AnalysisResult, UsageSnapshot};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coaching instructions sent as the system message
pub const SYSTEM_PROMPT: &str = "You are a digital wellness coach providing personalized, concise insights \
about screen time and app usage. Keep responses to 3-4 sentences with one clear recommendation.";

/// Chat-completions client that phrases an analysis as a coaching note
pub struct OpenAiInsightGenerator {
    config: InsightConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl OpenAiInsightGenerator {
    pub fn new(config: InsightConfig, api_key: impl Into<String>) -> Self {
        let agent = make_agent(Duration::from_secs(config.timeout_secs));
        Self {
            config,
            api_key: api_key.into(),
            agent,
        }
    }

    /// Build from configuration; fails when no API key is set
    pub fn from_config(config: &InsightConfig) -> Result<Self, InsightError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| InsightError::MissingApiKey("OPENAI_API_KEY".to_string()))?;
        Ok(Self::new(config.clone(), api_key))
    }

    fn request_body(&self, prompt: String) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }
}

impl InsightGenerator for OpenAiInsightGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _snapshot: &UsageSnapshot,
    ) -> Result<String, InsightError> {
        let body = self.request_body(build_prompt(result));

        let response = self
            .agent
            .post(&self.config.base_url)
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(InsightError::ApiError { status, message });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| InsightError::ParseError(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| InsightError::ParseError("No response choices".to_string()))
    }
}

/// Render the user prompt for one analysis
pub fn build_prompt(result: &AnalysisResult) -> String {
    let tags = result
        .tags
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let patterns = if result.patterns.is_empty() {
        "None".to_string()
    } else {
        result.patterns.join("; ")
    };
    let b = &result.breakdown;

    format!(
        "Analyze this digital wellness data and provide a concise, personalized insight.

Overall Wellness Score: {score:.1}/100
Screen Time: {hours:.1} hours
Behavioral Tags: {tags}
Patterns Detected: {patterns}

Score Breakdown:
- Screen Time: {screen_time:.1}/100
- App Diversity: {diversity:.1}/100
- Usage Timing: {timing:.1}/100
- Category Balance: {balance:.1}/100
- Break Patterns: {breaks:.1}/100

Provide a 3-4 sentence insight that:
1. Acknowledges their current wellness level
2. Highlights the most important behavioral pattern
3. Offers one specific, actionable recommendation",
        score = result.overall_score,
        hours = result.metrics.total_screen_time_hours,
        screen_time = b.screen_time,
        diversity = b.diversity,
        timing = b.timing,
        balance = b.balance,
        breaks = b.breaks,
    )
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
