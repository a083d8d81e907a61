//! Scorer trait and the local heuristic scorer
//!
//! The local scorer is the engine's core decision logic: a weighted additive
//! score per category from the anchor model (word-boundary keyword counts,
//! phrase-pattern presence, contextual indicators) plus a handful of
//! structural heuristics, normalized into a confidence and an assigned
//! category. It is a pure function over the static anchor table: same
//! sentence in, same classification out.

use crate::anchors::{AnchorModel, AnchorWeights};
use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thinkerbell_core::{Category, Error, Result};

/// How a classification was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMethod {
    /// Scored by the local heuristic scorer
    Local,
    /// Scored by the remote provider
    Remote,
    /// No category signal at all; defaulted to Hunch
    Fallback,
}

/// Raw per-category scores, always carried in canonical order
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub hunch: f32,
    pub wisdom: f32,
    pub nudge: f32,
    pub spell: f32,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f32 {
        match category {
            Category::Hunch => self.hunch,
            Category::Wisdom => self.wisdom,
            Category::Nudge => self.nudge,
            Category::Spell => self.spell,
        }
    }

    pub fn add(&mut self, category: Category, amount: f32) {
        match category {
            Category::Hunch => self.hunch += amount,
            Category::Wisdom => self.wisdom += amount,
            Category::Nudge => self.nudge += amount,
            Category::Spell => self.spell += amount,
        }
    }

    /// Sum over all categories
    pub fn total(&self) -> f32 {
        Category::ALL.iter().map(|&c| self.get(c)).sum()
    }

    /// Highest single score
    pub fn max(&self) -> f32 {
        Category::ALL
            .iter()
            .map(|&c| self.get(c))
            .fold(0.0_f32, f32::max)
    }

    /// Argmax with ties broken by canonical category order
    pub fn best_category(&self) -> Category {
        let mut best = Category::Hunch;
        for &category in &Category::ALL {
            if self.get(category) > self.get(best) {
                best = category;
            }
        }
        best
    }
}

/// Result of scoring one sentence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Assigned category (after threshold and fallback policy)
    pub category: Category,

    /// Normalized confidence in [0, 1]
    pub confidence: f32,

    /// Raw per-category scores
    pub scores: CategoryScores,

    /// How this classification was produced
    pub method: ScoreMethod,

    /// Human-readable "why this category" summary
    pub explanation: String,
}

/// Trait for all scorers
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Classify the given sentence
    async fn score(&self, sentence: &str) -> Result<Classification>;

    /// Get the scorer name
    fn name(&self) -> &str;
}

/// Confidence reported when no category signal matched at all
pub const FALLBACK_CONFIDENCE: f32 = 0.2;

const IMPERATIVE_LEAD_INS: [&str; 7] =
    ["let's", "we need", "we should", "should", "must", "try", "focus"];

const CREATIVE_MARKERS: [&str; 5] =
    ["imagine", "picture", "creative", "magical", "extraordinary"];

/// Compiled matchers for one category
struct CategoryMatchers {
    category: Category,
    /// (keyword, word-boundary matcher) pairs, for per-keyword counting
    keywords: Vec<(String, Regex)>,
    patterns: AhoCorasick,
    pattern_strs: Vec<String>,
    contextual: AhoCorasick,
    weights: AnchorWeights,
}

/// The local heuristic scorer.
///
/// Total over any string: empty or unclassifiable input resolves to the
/// default-to-Hunch fallback, never an error.
pub struct LocalScorer {
    name: String,
    matchers: Vec<CategoryMatchers>,
    statistics: Regex,
    confidence_threshold: f32,
}

impl LocalScorer {
    /// Create a scorer over the given anchor model
    pub fn new(model: &AnchorModel, confidence_threshold: f32) -> Result<Self> {
        let mut matchers = Vec::with_capacity(Category::COUNT);

        for category in Category::ALL {
            let profile = model.profile(category);

            let keywords = profile
                .keywords
                .iter()
                .map(|kw| {
                    let kw = kw.to_lowercase();
                    let re = Regex::new(&format!(r"\b{}\b", regex::escape(&kw))).map_err(|e| {
                        Error::scorer(format!("bad keyword matcher for {kw:?}: {e}"))
                    })?;
                    Ok((kw, re))
                })
                .collect::<Result<Vec<_>>>()?;

            let pattern_strs: Vec<String> =
                profile.patterns.iter().map(|p| p.to_lowercase()).collect();
            let contextual_strs: Vec<String> = profile
                .contextual_indicators
                .iter()
                .map(|c| c.to_lowercase())
                .collect();

            matchers.push(CategoryMatchers {
                category,
                keywords,
                patterns: build_matcher(&pattern_strs)?,
                pattern_strs,
                contextual: build_matcher(&contextual_strs)?,
                weights: profile.weights,
            });
        }

        // Percentages, decimal numbers, or explicit statistical vocabulary.
        let statistics = Regex::new(r"\d+%|\d+\.\d+|\bstatistics\b|\bmetrics\b")
            .map_err(|e| Error::scorer(format!("bad statistics matcher: {e}")))?;

        Ok(Self {
            name: "local-anchor".to_string(),
            matchers,
            statistics,
            confidence_threshold,
        })
    }

    /// Score a sentence synchronously. The async trait method delegates here;
    /// the local path never suspends.
    pub fn score_sync(&self, sentence: &str) -> Classification {
        self.score_with_threshold(sentence, self.confidence_threshold)
    }

    /// Score with an explicit threshold override
    pub fn score_with_threshold(&self, sentence: &str, threshold: f32) -> Classification {
        let lowered = sentence.to_lowercase();

        let mut scores = CategoryScores::default();
        let mut matched_keywords: Vec<Vec<String>> = vec![Vec::new(); Category::COUNT];
        let mut matched_patterns: Vec<Vec<String>> = vec![Vec::new(); Category::COUNT];

        for m in &self.matchers {
            let idx = m.category.index();

            // Keyword pass: word-boundary occurrence counts, plus a flat
            // bonus when the sentence opens with the keyword.
            for (keyword, re) in &m.keywords {
                let mut count = 0usize;
                let mut starts_sentence = false;
                for found in re.find_iter(&lowered) {
                    count += 1;
                    if found.start() == 0 {
                        starts_sentence = true;
                    }
                }
                if count > 0 {
                    scores.add(m.category, count as f32 * m.weights.keyword);
                    matched_keywords[idx].push(keyword.clone());
                }
                if starts_sentence {
                    scores.add(m.category, 0.5);
                }
            }

            // Pattern pass: each phrase counts once, however often it occurs.
            // Overlapping iteration so a phrase nested inside a longer one
            // still registers.
            let present: BTreeSet<usize> = m
                .patterns
                .find_overlapping_iter(&lowered)
                .map(|found| found.pattern().as_usize())
                .collect();
            for &pattern_idx in &present {
                scores.add(m.category, m.weights.pattern);
                matched_patterns[idx].push(m.pattern_strs[pattern_idx].clone());
            }

            // Contextual pass: presence only, once per indicator.
            let present: BTreeSet<usize> = m
                .contextual
                .find_overlapping_iter(&lowered)
                .map(|found| found.pattern().as_usize())
                .collect();
            scores.add(m.category, present.len() as f32 * m.weights.contextual);
        }

        // Structural heuristics.
        if lowered.contains('?') {
            scores.add(Category::Hunch, 1.0);
        }
        if lowered.contains('.') || lowered.contains('!') {
            scores.add(Category::Wisdom, 0.5);
            scores.add(Category::Nudge, 0.5);
        }
        if self.statistics.is_match(&lowered) {
            scores.add(Category::Wisdom, 1.5);
        }
        if IMPERATIVE_LEAD_INS.iter().any(|l| opens_with_word(&lowered, l)) {
            scores.add(Category::Nudge, 1.0);
        }
        if CREATIVE_MARKERS.iter().any(|mk| lowered.contains(mk)) {
            scores.add(Category::Spell, 1.0);
        }

        let max_score = scores.max();
        if max_score == 0.0 {
            return Classification {
                category: Category::Hunch,
                confidence: FALLBACK_CONFIDENCE,
                scores,
                method: ScoreMethod::Fallback,
                explanation: "no category signals detected; defaulted to Hunch".to_string(),
            };
        }

        let best = scores.best_category();
        let confidence = (max_score / (scores.total() + 1.0)).min(1.0);
        let category = if confidence > threshold {
            best
        } else {
            Category::Hunch
        };

        let explanation = explain(
            category,
            best,
            confidence,
            &matched_keywords[best.index()],
            &matched_patterns[best.index()],
        );

        Classification {
            category,
            confidence,
            scores,
            method: ScoreMethod::Local,
            explanation,
        }
    }
}

/// True when `sentence` opens with `lead_in` as a whole word, so "must we"
/// qualifies but "musty" does not.
fn opens_with_word(sentence: &str, lead_in: &str) -> bool {
    match sentence.strip_prefix(lead_in) {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

fn build_matcher(patterns: &[String]) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .map_err(|e| Error::scorer(format!("failed to build anchor matcher: {e}")))
}

fn explain(
    assigned: Category,
    best: Category,
    confidence: f32,
    keywords: &[String],
    patterns: &[String],
) -> String {
    let mut parts = Vec::new();
    if !keywords.is_empty() {
        parts.push(format!("keywords: {}", keywords.join(", ")));
    }
    if !patterns.is_empty() {
        parts.push(format!("patterns: {}", patterns.join(", ")));
    }
    let signals = if parts.is_empty() {
        "structural signals only".to_string()
    } else {
        parts.join("; ")
    };

    if assigned == best {
        format!(
            "classified as {assigned} with {:.0}% confidence ({signals})",
            confidence * 100.0
        )
    } else {
        format!(
            "low confidence ({:.0}%) for best match {best}; defaulted to {assigned} ({signals})",
            confidence * 100.0
        )
    }
}

#[async_trait]
impl Scorer for LocalScorer {
    async fn score(&self, sentence: &str) -> Result<Classification> {
        Ok(self.score_sync(sentence))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LocalScorer {
        LocalScorer::new(&AnchorModel::default(), 0.3).unwrap()
    }

    #[test]
    fn keyword_match_drives_category() {
        let result = scorer().score_sync("I suspect our audience wants more authenticity");
        assert_eq!(result.category, Category::Hunch);
        assert_eq!(result.method, ScoreMethod::Local);
        assert!(result.explanation.contains("suspect"));
    }

    #[test]
    fn statistics_boost_wisdom() {
        let result = scorer().score_sync("Research shows 68% of millennials prefer this");
        assert_eq!(result.category, Category::Wisdom);
        assert!(result.scores.wisdom > result.scores.hunch);
        assert!(result.explanation.contains("research shows"));
    }

    #[test]
    fn imperative_lead_in_boosts_nudge() {
        let result = scorer().score_sync("We should pivot messaging to highlight eco practices");
        assert_eq!(result.category, Category::Nudge);
    }

    #[test]
    fn creative_markers_boost_spell() {
        let result = scorer().score_sync("Imagine a shoppable AR sustainability tracker");
        assert_eq!(result.category, Category::Spell);
    }

    #[test]
    fn question_mark_boosts_hunch() {
        let base = scorer().score_sync("could this work for the campaign");
        let question = scorer().score_sync("could this work for the campaign?");
        assert!(question.scores.hunch > base.scores.hunch);
    }

    #[test]
    fn zero_signal_falls_back_to_hunch() {
        let result = scorer().score_sync("zzz qqq www xyzzy");
        assert_eq!(result.category, Category::Hunch);
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
        assert_eq!(result.method, ScoreMethod::Fallback);
    }

    #[test]
    fn low_confidence_is_forced_to_hunch() {
        // A threshold of 1.0 can never be exceeded since max/(total+1) < 1.
        let strict = LocalScorer::new(&AnchorModel::default(), 1.0).unwrap();
        let result = strict.score_sync("Research shows 68% of millennials prefer this");
        assert_eq!(result.category, Category::Hunch);
        assert_eq!(result.method, ScoreMethod::Local);
        assert!(result.explanation.contains("defaulted to Hunch"));
    }

    #[test]
    fn keyword_counts_accumulate() {
        let once = scorer().score_sync("the data is clear");
        let twice = scorer().score_sync("the data and more data");
        assert!(twice.scores.wisdom > once.scores.wisdom);
    }

    #[test]
    fn leading_keyword_gets_start_bonus() {
        let leading = scorer().score_sync("research backs the claim here");
        let embedded = scorer().score_sync("the claim here has research");
        assert!(leading.scores.wisdom > embedded.scores.wisdom);
    }

    #[test]
    fn whole_word_matching_ignores_substrings() {
        // "do" must not match inside "anecdote" or "dough".
        let result = scorer().score_sync("an anecdote about dough rising overnight");
        assert_eq!(result.scores.nudge, 0.0);
    }

    #[test]
    fn lead_in_requires_a_word_boundary() {
        let s = scorer();
        // "musty" and "trying" must not trip the "must"/"try" lead-ins.
        assert_eq!(
            s.score_sync("musty storage rooms smell like cardboard").scores.nudge,
            0.0
        );
        assert_eq!(s.score_sync("trying times for the whole team").scores.nudge, 0.0);
        assert!(s.score_sync("try a tighter headline").scores.nudge > 0.0);
    }

    #[test]
    fn nested_patterns_each_register() {
        use std::collections::BTreeMap;

        let default = AnchorModel::default();
        let mut profiles: BTreeMap<_, _> = Category::ALL
            .iter()
            .map(|&c| (c, default.profile(c).clone()))
            .collect();
        profiles.get_mut(&Category::Wisdom).unwrap().patterns = vec![
            "data shows".to_string(),
            "the data shows clearly".to_string(),
        ];
        let model = AnchorModel::new(profiles).unwrap();
        let pattern_weight = model.profile(Category::Wisdom).weights.pattern;

        let s = LocalScorer::new(&model, 0.3).unwrap();
        let result = s.score_sync("the data shows clearly");
        // Both phrases are present, so both contribute their weight even
        // though one is contained in the other's span.
        assert!(result.scores.wisdom >= 2.0 * pattern_weight);
    }

    #[test]
    fn pattern_counts_once_despite_repeats() {
        let once = scorer().score_sync("research shows the gap clearly");
        let twice = scorer().score_sync("research shows and research shows the gap");
        // The phrase adds its weight once; only the extra keyword hits differ.
        let pattern_weight = AnchorModel::default().profile(Category::Wisdom).weights.pattern;
        assert!(twice.scores.wisdom - once.scores.wisdom < pattern_weight);
    }

    #[test]
    fn confidence_is_normalized() {
        let result =
            scorer().score_sync("Research shows data and statistics prove the evidence. 42%");
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    }

    #[test]
    fn scoring_is_idempotent() {
        let s = scorer();
        let sentence = "We should try a bolder creative direction, maybe?";
        let a = s.score_sync(sentence);
        let b = s.score_sync(sentence);
        assert_eq!(a.category, b.category);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.explanation, b.explanation);
    }

    #[tokio::test]
    async fn async_trait_delegates_to_sync_path() {
        let s = scorer();
        let via_trait = s.score("imagine a magical brand moment").await.unwrap();
        let via_sync = s.score_sync("imagine a magical brand moment");
        assert_eq!(via_trait.category, via_sync.category);
        assert_eq!(via_trait.confidence, via_sync.confidence);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_over_any_string(sentence in ".{0,200}") {
                let result = scorer().score_sync(&sentence);
                prop_assert!((0.0..=1.0).contains(&result.confidence));
                prop_assert!(Category::ALL.contains(&result.category));
            }

            #[test]
            fn deterministic_over_any_string(sentence in ".{0,120}") {
                let s = scorer();
                let a = s.score_sync(&sentence);
                let b = s.score_sync(&sentence);
                prop_assert_eq!(a.category, b.category);
                prop_assert_eq!(a.confidence, b.confidence);
            }
        }
    }
}
