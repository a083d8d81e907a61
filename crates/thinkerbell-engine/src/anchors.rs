//! Category anchor model
//!
//! The static per-category profiles (keywords, phrase patterns, contextual
//! indicators, weights) that are the local scorer's sole source of
//! classification knowledge. The model is read-only at runtime; updating the
//! detection signal for a category means editing this table or loading a
//! YAML override, never touching scorer code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thinkerbell_core::{Category, Error, Result};

/// Relative weights for the three signal classes of a profile.
///
/// Phrase patterns and contextual indicators are stronger evidence than an
/// isolated keyword, so `pattern` and `contextual` exceed `keyword` in the
/// default table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnchorWeights {
    pub keyword: f32,
    pub pattern: f32,
    pub contextual: f32,
}

/// Detection profile for a single category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorProfile {
    /// Human-readable description, surfaced in content suggestions
    pub description: String,

    /// Single words matched on word boundaries, case-insensitive
    pub keywords: Vec<String>,

    /// Multi-word phrases matched as substrings
    pub patterns: Vec<String>,

    /// Secondary words that nudge the score without being primary signals
    pub contextual_indicators: Vec<String>,

    /// Signal weights
    pub weights: AnchorWeights,
}

/// The complete anchor table: exactly one profile per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorModel {
    profiles: BTreeMap<Category, AnchorProfile>,
}

impl AnchorModel {
    /// Build a model from explicit profiles, validating completeness.
    pub fn new(profiles: BTreeMap<Category, AnchorProfile>) -> Result<Self> {
        let model = Self { profiles };
        model.validate()?;
        Ok(model)
    }

    /// Load a model override from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let model: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("failed to parse anchor model: {e}")))?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model override from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Get the profile for a category. The constructor guarantees presence.
    pub fn profile(&self, category: Category) -> &AnchorProfile {
        &self.profiles[&category]
    }

    /// The engine cannot score without a complete, well-formed table, so a
    /// missing category or non-positive weight is fatal at startup.
    fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let profile = self.profiles.get(&category).ok_or_else(|| {
                Error::config(format!("anchor model is missing a profile for {category}"))
            })?;

            let w = profile.weights;
            if w.keyword <= 0.0 || w.pattern <= 0.0 || w.contextual <= 0.0 {
                return Err(Error::config(format!(
                    "anchor weights for {category} must be positive, got \
                     keyword={}, pattern={}, contextual={}",
                    w.keyword, w.pattern, w.contextual
                )));
            }
        }
        Ok(())
    }
}

impl Default for AnchorModel {
    fn default() -> Self {
        let weights = AnchorWeights {
            keyword: 1.0,
            pattern: 2.5,
            contextual: 1.5,
        };

        let mut profiles = BTreeMap::new();

        profiles.insert(
            Category::Hunch,
            AnchorProfile {
                description: "A clever suspicion, intuitive idea, or hypothesis — playful \
                              speculation without concrete proof yet."
                    .to_string(),
                keywords: words(&[
                    "guess", "intuition", "feeling", "suspect", "theory", "wonder", "might",
                    "think", "hunch", "believe", "sense",
                ]),
                patterns: words(&[
                    "i think",
                    "i believe",
                    "i suspect",
                    "my gut",
                    "i have a feeling",
                    "what if",
                ]),
                contextual_indicators: words(&["maybe", "perhaps", "possibly", "probably", "seems"]),
                weights,
            },
        );

        profiles.insert(
            Category::Wisdom,
            AnchorProfile {
                description: "Strategic insight backed by data, research, or experience — \
                              evidence-based knowledge and proven learnings."
                    .to_string(),
                keywords: words(&[
                    "research", "data", "studies", "evidence", "analysis", "statistics", "shows",
                    "proves", "study", "insight", "found",
                ]),
                patterns: words(&[
                    "research shows",
                    "data indicates",
                    "studies show",
                    "according to",
                    "evidence suggests",
                    "proven to",
                ]),
                contextual_indicators: words(&["percent", "survey", "report", "findings", "trend"]),
                weights,
            },
        );

        profiles.insert(
            Category::Nudge,
            AnchorProfile {
                description: "A recommended action, behavioral suggestion, or next step — a \
                              gentle push toward a desired behavior or decision."
                    .to_string(),
                keywords: words(&[
                    "should",
                    "recommend",
                    "suggest",
                    "action",
                    "try",
                    "implement",
                    "do",
                    "start",
                    "need",
                    "must",
                    "consider",
                ]),
                patterns: words(&[
                    "we should",
                    "we need to",
                    "next steps",
                    "call to action",
                    "i recommend",
                ]),
                contextual_indicators: words(&["focus", "prioritize", "shift", "pivot", "adopt"]),
                weights,
            },
        );

        profiles.insert(
            Category::Spell,
            AnchorProfile {
                description: "A magical creative flourish, surprising execution, or innovative \
                              idea — an unexpected solution that feels almost magical."
                    .to_string(),
                keywords: words(&[
                    "magical",
                    "surprising",
                    "creative",
                    "innovative",
                    "extraordinary",
                    "imagine",
                    "picture",
                    "bold",
                    "unexpected",
                    "whimsical",
                ]),
                patterns: words(&[
                    "imagine if",
                    "picture this",
                    "what about",
                    "out of the box",
                    "blue sky",
                ]),
                contextual_indicators: words(&["delight", "playful", "daring", "vivid", "dreamy"]),
                weights,
            },
        );

        // Validation cannot fail for the built-in table.
        Self { profiles }
    }
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
