//! Content routing
//!
//! Applies the scorer across a whole document: segment, filter, score each
//! sentence (remote provider first when configured, local otherwise), bucket
//! by assigned category, sort buckets by confidence, and derive analytics.
//! Each call owns its input and output; there is no shared mutable state
//! between calls.

use crate::anchors::AnchorModel;
use crate::remote::RemoteScorer;
use crate::scorer::{Classification, LocalScorer, ScoreMethod, Scorer};
use crate::segmenter::segment;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thinkerbell_core::{Category, EngineConfig, Result};
use tracing::{debug, warn};

/// One routed sentence inside a bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedItem {
    pub text: String,
    pub confidence: f32,
    pub explanation: String,
    pub method: ScoreMethod,
}

/// Count and share of one category in the distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub count: usize,
    /// Share of processed sentences, one decimal place
    pub percentage: f64,
}

/// Counts of classifications by confidence band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceLevels {
    /// confidence > 0.7
    pub high: usize,
    /// 0.4 < confidence <= 0.7
    pub medium: usize,
    /// confidence <= 0.4
    pub low: usize,
}

/// Aggregate view over one routing call, derived purely from the buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub distribution: BTreeMap<Category, CategoryShare>,
    pub average_confidence_per_category: BTreeMap<Category, f32>,
    /// `None` when no sentence survived filtering: the explicit
    /// no-content condition, never a division by zero.
    pub dominant_category: Option<Category>,
    pub confidence_levels: ConfidenceLevels,
}

impl Analytics {
    /// Whether any sentence was classified at all
    pub fn has_content(&self) -> bool {
        self.dominant_category.is_some()
    }
}

/// Which scoring backend produced a document's classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMethod {
    /// Every sentence was scored locally
    Local,
    /// At least one sentence was scored by the remote provider
    Hybrid,
}

/// Per-call bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingMetadata {
    /// Sentences produced by the segmenter
    pub total_sentences: usize,
    /// Sentences that survived the length filter and were scored
    pub processed_sentences: usize,
    /// Mean confidence over all processed sentences
    pub average_confidence: f32,
    pub backend_method: BackendMethod,
}

/// Result of routing one document. Immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedContent {
    /// All four categories are always present, empty buckets included
    pub buckets: BTreeMap<Category, Vec<RoutedItem>>,
    pub analytics: Analytics,
    pub metadata: RoutingMetadata,
}

/// The routing engine: one local scorer, an optional remote one, and the
/// configuration they were built from.
pub struct Router {
    config: EngineConfig,
    local: LocalScorer,
    remote: Option<Arc<dyn Scorer>>,
}

impl Router {
    /// Build a router. Fatal on malformed configuration or anchor data — the
    /// engine cannot score without a complete table.
    pub fn new(model: &AnchorModel, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let local = LocalScorer::new(model, config.confidence_threshold)?;
        let remote = match &config.remote {
            Some(remote_config) => {
                Some(Arc::new(RemoteScorer::new(remote_config)?) as Arc<dyn Scorer>)
            }
            None => None,
        };

        Ok(Self {
            config,
            local,
            remote,
        })
    }

    /// Replace the remote scorer with an arbitrary implementation.
    /// Used for injecting providers (and test doubles) behind the trait.
    pub fn with_remote_scorer(mut self, remote: Arc<dyn Scorer>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Route a document with the configured confidence threshold
    pub async fn route(&self, document: &str) -> Result<RoutedContent> {
        self.route_with_threshold(document, None).await
    }

    /// Route a document, optionally overriding the confidence threshold for
    /// this call only.
    pub async fn route_with_threshold(
        &self,
        document: &str,
        threshold: Option<f32>,
    ) -> Result<RoutedContent> {
        let threshold = threshold.unwrap_or(self.config.confidence_threshold);

        let candidates = segment(document);
        let total_sentences = candidates.len();
        let sentences: Vec<String> = candidates
            .into_iter()
            .filter(|s| s.chars().count() >= self.config.min_sentence_len)
            .collect();

        // Remote scoring is the only suspending step; score all sentences
        // concurrently while keeping results in document order.
        let classifications: Vec<Classification> = join_all(
            sentences
                .iter()
                .map(|sentence| self.score_sentence(sentence, threshold)),
        )
        .await;

        let backend_method = if classifications
            .iter()
            .any(|c| c.method == ScoreMethod::Remote)
        {
            BackendMethod::Hybrid
        } else {
            BackendMethod::Local
        };

        let mut buckets: BTreeMap<Category, Vec<RoutedItem>> = Category::ALL
            .iter()
            .map(|&category| (category, Vec::new()))
            .collect();

        for (sentence, classification) in sentences.iter().zip(&classifications) {
            buckets
                .entry(classification.category)
                .or_default()
                .push(RoutedItem {
                    text: sentence.clone(),
                    confidence: classification.confidence,
                    explanation: classification.explanation.clone(),
                    method: classification.method,
                });
        }

        // Stable sort: equal confidences keep document order.
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        }

        let analytics = compute_analytics(&buckets);

        let processed_sentences = sentences.len();
        let average_confidence = if processed_sentences == 0 {
            0.0
        } else {
            classifications.iter().map(|c| c.confidence).sum::<f32>()
                / processed_sentences as f32
        };

        debug!(
            total_sentences,
            processed_sentences,
            ?backend_method,
            "routed document"
        );

        Ok(RoutedContent {
            buckets,
            analytics,
            metadata: RoutingMetadata {
                total_sentences,
                processed_sentences,
                average_confidence,
                backend_method,
            },
        })
    }

    /// Score one sentence: remote first when configured, local on any
    /// remote failure. The downgrade is silent apart from the log line and
    /// the per-item `method` field.
    async fn score_sentence(&self, sentence: &str, threshold: f32) -> Classification {
        if let Some(remote) = &self.remote {
            match remote.score(sentence).await {
                Ok(mut classification) => {
                    // The threshold law applies to remote results too.
                    if classification.confidence <= threshold {
                        classification.category = Category::Hunch;
                    }
                    return classification;
                }
                Err(e) => {
                    warn!(scorer = remote.name(), error = %e, "remote scoring failed, falling back to local");
                }
            }
        }
        self.local.score_with_threshold(sentence, threshold)
    }
}

fn compute_analytics(buckets: &BTreeMap<Category, Vec<RoutedItem>>) -> Analytics {
    let processed: usize = buckets.values().map(Vec::len).sum();

    let mut distribution = BTreeMap::new();
    let mut average_confidence_per_category = BTreeMap::new();
    let mut confidence_levels = ConfidenceLevels::default();

    for category in Category::ALL {
        let items = &buckets[&category];
        let count = items.len();

        let percentage = if processed == 0 {
            0.0
        } else {
            round_one_decimal(count as f64 / processed as f64 * 100.0)
        };
        distribution.insert(category, CategoryShare { count, percentage });

        let average = if count == 0 {
            0.0
        } else {
            items.iter().map(|i| i.confidence).sum::<f32>() / count as f32
        };
        average_confidence_per_category.insert(category, average);

        for item in items {
            if item.confidence > 0.7 {
                confidence_levels.high += 1;
            } else if item.confidence > 0.4 {
                confidence_levels.medium += 1;
            } else {
                confidence_levels.low += 1;
            }
        }
    }

    let dominant_category = if processed == 0 {
        None
    } else {
        // Strict comparison keeps the earliest category on ties.
        let mut dominant = Category::Hunch;
        for &category in &Category::ALL {
            if buckets[&category].len() > buckets[&dominant].len() {
                dominant = category;
            }
        }
        Some(dominant)
    };

    Analytics {
        distribution,
        average_confidence_per_category,
        dominant_category,
        confidence_levels,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
