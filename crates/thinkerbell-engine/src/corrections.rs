//! User-correction sink
//!
//! Accepts "this sentence should have been category X" feedback from the
//! caller. The engine's only obligation is to accept and acknowledge;
//! persistence and model retraining happen elsewhere, if at all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thinkerbell_core::{Category, Result};
use tracing::info;

/// A single user correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correction {
    /// The sentence that was classified
    pub sentence: String,

    /// The category the user says it belongs to
    pub correct_category: Category,

    /// Optional free-text rationale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Acknowledgement of an accepted correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionAck {
    pub accepted: bool,
    pub message: String,
}

/// Sink for user corrections
#[async_trait]
pub trait CorrectionSink: Send + Sync {
    /// Accept a correction and acknowledge it
    async fn submit(&self, correction: Correction) -> Result<CorrectionAck>;
}

/// A sink that records corrections to the log and acknowledges them
#[derive(Debug, Default)]
pub struct LoggingCorrectionSink;

#[async_trait]
impl CorrectionSink for LoggingCorrectionSink {
    async fn submit(&self, correction: Correction) -> Result<CorrectionAck> {
        info!(
            category = %correction.correct_category,
            reason = correction.reason.as_deref().unwrap_or("none"),
            sentence = %correction.sentence,
            "user correction received"
        );

        Ok(CorrectionAck {
            accepted: true,
            message: format!(
                "correction recorded: sentence reclassified as {}",
                correction.correct_category
            ),
        })
    }
}
