//! Screen Wellness - Rule-based scoring engine for daily device usage
//!
//! Turns one day of screen-time telemetry into a wellness score through a
//! deterministic pipeline: five sub-scores → weighted overall score →
//! behavioral tags → usage patterns.
//!
//! ## Modules
//!
//! - **Analyzer**: the scoring engine (`analyzer`, `scoring`, `tags`, `patterns`)
//! - **Insight**: optional natural-language summary of a result, networked or local
//! - **Server** (feature `server`): HTTP endpoint wrapping analyzer and insight

pub mod analyzer;
pub mod config;
pub mod encoder;
pub mod error;
pub mod insight;
pub mod patterns;
pub mod rules;
pub mod scoring;
pub mod tags;
pub mod types;

#[cfg(feature = "server")]
pub mod server;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use analyzer::{analyze_json, parse_snapshot, WellnessAnalyzer};
pub use encoder::{WellnessReport, WellnessReportEncoder};
pub use error::{InsightError, WellnessError};
pub use insight::{InsightGenerator, InsightService};
pub use types::{
    AnalysisResult, AppUsage, InsightResponse, ScoreBreakdown, Session, UsageMetrics,
    UsageSnapshot, WellnessTag,
};

/// Library version embedded in all reports
pub const WELLNESS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "screen-wellness";
