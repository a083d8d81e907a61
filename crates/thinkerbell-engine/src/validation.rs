//! Balance validation and content suggestions
//!
//! Inspects bucket population after routing: flags empty categories and
//! lopsided distributions, and proposes prompts for the gaps. Derived purely
//! from bucket counts; no independent state.

use crate::anchors::AnchorModel;
use crate::router::{CategoryShare, RoutedContent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thinkerbell_core::Category;

/// A bucket larger than this multiple of the smallest bucket is considered
/// unbalanced (once there is enough content to judge).
const BALANCE_RATIO: usize = 3;

/// Minimum total items before the balance rule applies
const BALANCE_MIN_TOTAL: usize = 4;

/// Outcome of balance validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub distribution: BTreeMap<Category, CategoryShare>,
}

/// Check bucket population for missing categories and skewed distributions.
/// `valid` holds exactly when no warning was emitted.
pub fn validate(routed: &RoutedContent) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    let counts: Vec<usize> = Category::ALL
        .iter()
        .map(|category| routed.buckets[category].len())
        .collect();
    let total: usize = counts.iter().sum();

    for category in Category::ALL {
        if routed.buckets[&category].is_empty() {
            warnings.push(format!("no content routed to {category}"));
            recommendations.push(format!(
                "add at least one {category} to round out the brief"
            ));
        }
    }

    let max_count = counts.iter().copied().max().unwrap_or(0);
    let min_count = counts.iter().copied().min().unwrap_or(0);
    if total > BALANCE_MIN_TOTAL && max_count > BALANCE_RATIO * min_count {
        warnings.push(format!(
            "unbalanced distribution: largest bucket has {max_count} items, smallest has {min_count}"
        ));
        recommendations.push(
            "spread content more evenly across categories for a balanced brief".to_string(),
        );
    }

    ValidationResult {
        valid: warnings.is_empty(),
        warnings,
        recommendations,
        distribution: routed.analytics.distribution.clone(),
    }
}

/// Generate prompt strings for every empty category, built around the
/// category's anchor description. Populated categories get no suggestions.
pub fn suggest(routed: &RoutedContent, model: &AnchorModel) -> BTreeMap<Category, Vec<String>> {
    let mut suggestions = BTreeMap::new();

    for category in Category::ALL {
        if !routed.buckets[&category].is_empty() {
            continue;
        }

        let description = &model.profile(category).description;
        suggestions.insert(
            category,
            vec![
                format!("This brief has no {category} yet. {description}"),
                format!(
                    "Try drafting one sentence that reads as a {category} and run it through again."
                ),
                prompt_for(category).to_string(),
            ],
        );
    }

    suggestions
}

fn prompt_for(category: Category) -> &'static str {
    match category {
        Category::Hunch => "What do you suspect is true about this audience, even without proof?",
        Category::Wisdom => "What data point or research finding backs this thinking?",
        Category::Nudge => "What is the one action you want the reader to take next?",
        Category::Spell => "What unexpected, almost magical execution would make this memorable?",
    }
}
