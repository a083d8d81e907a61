//! Remote scoring provider adapter
//!
//! Optional external scorer consulted before the local one. A single POST per
//! sentence, no retries: a deadline miss surfaces as `Error::Timeout` and any
//! other network error, non-success status, or malformed payload as
//! `Error::Provider`; the router recovers from either by re-scoring locally.
//! Remote failures never reach the caller as user-facing errors.

use crate::scorer::{CategoryScores, Classification, ScoreMethod, Scorer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thinkerbell_core::{Category, Error, RemoteConfig, Result};

/// Request body sent to the provider
#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    sentence: &'a str,
}

/// Expected provider response shape. Any deviation is a provider failure.
#[derive(Debug, Deserialize)]
struct ScoreResponse {
    predicted_category: String,
    confidence: f32,
    #[serde(default)]
    all_similarities: HashMap<String, f32>,
    #[serde(default)]
    reasoning: String,
}

/// Response shape of the provider's explanation endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteExplanation {
    pub sentence: String,
    pub category: String,
    pub confidence: f32,
    pub explanation: String,
}

/// HTTP adapter for the remote scoring provider
pub struct RemoteScorer {
    name: String,
    client: reqwest::Client,
    classify_url: String,
    explain_url: String,
}

impl RemoteScorer {
    /// Build an adapter from configuration. The per-request timeout lives on
    /// the client, so every call inherits it.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::config(format!("failed to build provider client: {e}")))?;

        let base = config.endpoint.trim_end_matches('/');
        Ok(Self {
            name: "remote-provider".to_string(),
            client,
            classify_url: format!("{base}/classify"),
            explain_url: format!("{base}/explain"),
        })
    }

    /// Ask the provider why a sentence classifies the way it does
    pub async fn explain(&self, sentence: &str) -> Result<RemoteExplanation> {
        let response = self
            .client
            .post(&self.explain_url)
            .json(&ScoreRequest { sentence })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::provider(format!("explain request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::provider(format!(
                "explain returned status {}",
                response.status()
            )));
        }

        response
            .json::<RemoteExplanation>()
            .await
            .map_err(|e| Error::provider(format!("malformed explain payload: {e}")))
    }

    fn into_classification(response: ScoreResponse) -> Result<Classification> {
        let category = Category::from_label(&response.predicted_category).ok_or_else(|| {
            Error::provider(format!(
                "unknown predicted category {:?}",
                response.predicted_category
            ))
        })?;

        if !(0.0..=1.0).contains(&response.confidence) {
            return Err(Error::provider(format!(
                "confidence {} outside [0, 1]",
                response.confidence
            )));
        }

        let mut scores = CategoryScores::default();
        for (label, similarity) in &response.all_similarities {
            if let Some(c) = Category::from_label(label) {
                scores.add(c, *similarity);
            }
        }

        Ok(Classification {
            category,
            confidence: response.confidence,
            scores,
            method: ScoreMethod::Remote,
            explanation: if response.reasoning.is_empty() {
                format!("classified as {category} by remote provider")
            } else {
                response.reasoning
            },
        })
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    async fn score(&self, sentence: &str) -> Result<Classification> {
        let response = self
            .client
            .post(&self.classify_url)
            .json(&ScoreRequest { sentence })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::provider(format!("request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(Error::provider(format!(
                "provider returned status {}",
                response.status()
            )));
        }

        let payload = response
            .json::<ScoreResponse>()
            .await
            .map_err(|e| Error::provider(format!("malformed provider payload: {e}")))?;

        Self::into_classification(payload)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
