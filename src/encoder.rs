//! Wellness report encoder
//!
//! Wraps an analysis in a report envelope carrying producer and provenance
//! metadata, for callers that store or forward results.

use crate::error::WellnessError;
use crate::types::{AnalysisResult, UsageSnapshot};
use crate::{PRODUCER_NAME, WELLNESS_VERSION};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Provenance of the analyzed snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProvenance {
    /// Day the snapshot covers, when the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_date: Option<NaiveDate>,
    pub computed_at_utc: String,
}

/// Analysis plus envelope metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

/// Report encoder
pub struct WellnessReportEncoder {
    instance_id: String,
}

impl Default for WellnessReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl WellnessReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap an analysis in a report
    pub fn encode(
        &self,
        snapshot: &UsageSnapshot,
        analysis: AnalysisResult,
        insight: Option<String>,
    ) -> WellnessReport {
        WellnessReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: WELLNESS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ReportProvenance {
                snapshot_date: snapshot.date,
                computed_at_utc: Utc::now().to_rfc3339(),
            },
            analysis,
            insight,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        snapshot: &UsageSnapshot,
        analysis: AnalysisResult,
        insight: Option<String>,
    ) -> Result<String, WellnessError> {
        let report = self.encode(snapshot, analysis, insight);
        serde_json::to_string_pretty(&report).map_err(WellnessError::JsonError)
    }
}
