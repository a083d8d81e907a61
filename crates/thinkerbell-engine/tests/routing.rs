//! End-to-end routing behavior, including remote-provider fallback

use async_trait::async_trait;
use std::sync::Arc;
use thinkerbell_engine::prelude::*;
use thinkerbell_engine::{BackendMethod, CategoryScores};

const BRIEF: &str = "I suspect our audience wants more authenticity. \
    Research shows 68% of millennials prefer sustainable brands. \
    We should pivot messaging to highlight eco practices. \
    Imagine a shoppable AR sustainability tracker.";

fn local_router() -> Router {
    Router::new(&AnchorModel::default(), EngineConfig::default()).unwrap()
}

/// A remote provider that is always unreachable
struct FailingScorer;

#[async_trait]
impl Scorer for FailingScorer {
    async fn score(&self, _sentence: &str) -> Result<Classification> {
        Err(Error::provider("connection refused"))
    }

    fn name(&self) -> &str {
        "failing-remote"
    }
}

/// A remote provider that always misses its deadline
struct TimedOutScorer;

#[async_trait]
impl Scorer for TimedOutScorer {
    async fn score(&self, _sentence: &str) -> Result<Classification> {
        Err(Error::Timeout)
    }

    fn name(&self) -> &str {
        "timed-out-remote"
    }
}

/// A remote provider that always answers with a fixed classification
struct FixedScorer {
    category: Category,
    confidence: f32,
}

#[async_trait]
impl Scorer for FixedScorer {
    async fn score(&self, _sentence: &str) -> Result<Classification> {
        Ok(Classification {
            category: self.category,
            confidence: self.confidence,
            scores: CategoryScores::default(),
            method: ScoreMethod::Remote,
            explanation: "fixed remote answer".to_string(),
        })
    }

    fn name(&self) -> &str {
        "fixed-remote"
    }
}

/// A remote provider that only answers for sentences mentioning research
struct FlakyScorer;

#[async_trait]
impl Scorer for FlakyScorer {
    async fn score(&self, sentence: &str) -> Result<Classification> {
        if sentence.to_lowercase().contains("research") {
            Ok(Classification {
                category: Category::Wisdom,
                confidence: 0.9,
                scores: CategoryScores::default(),
                method: ScoreMethod::Remote,
                explanation: "remote similarity match".to_string(),
            })
        } else {
            Err(Error::provider("model overloaded"))
        }
    }

    fn name(&self) -> &str {
        "flaky-remote"
    }
}

#[tokio::test]
async fn brief_routes_into_all_four_categories() {
    let routed = local_router().route(BRIEF).await.unwrap();

    assert_eq!(routed.metadata.processed_sentences, 4);
    for category in Category::ALL {
        assert_eq!(
            routed.buckets[&category].len(),
            1,
            "expected exactly one sentence in {category}"
        );
    }

    assert!(routed.buckets[&Category::Hunch][0].text.contains("suspect"));
    assert!(routed.buckets[&Category::Wisdom][0].text.contains("68%"));
    assert!(routed.buckets[&Category::Nudge][0].text.contains("pivot"));
    assert!(routed.buckets[&Category::Spell][0].text.contains("Imagine"));

    // Four-way count tie: dominant resolves to the canonical first category.
    assert_eq!(routed.analytics.dominant_category, Some(Category::Hunch));

    let levels = routed.analytics.confidence_levels;
    assert_eq!(levels.high + levels.medium + levels.low, 4);

    let validation = validate(&routed);
    assert!(validation.valid);
}

#[tokio::test]
async fn failing_remote_is_equivalent_to_no_remote() {
    let local_only = local_router().route(BRIEF).await.unwrap();
    let with_failing_remote = local_router()
        .with_remote_scorer(Arc::new(FailingScorer))
        .route(BRIEF)
        .await
        .unwrap();

    assert_eq!(
        with_failing_remote.metadata.backend_method,
        BackendMethod::Local
    );

    for category in Category::ALL {
        let a = &local_only.buckets[&category];
        let b = &with_failing_remote.buckets[&category];
        assert_eq!(a.len(), b.len(), "bucket size differs for {category}");
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.text, y.text);
            assert_eq!(x.confidence, y.confidence);
            assert_ne!(y.method, ScoreMethod::Remote);
        }
    }
}

#[tokio::test]
async fn remote_timeouts_fall_back_locally() {
    let routed = local_router()
        .with_remote_scorer(Arc::new(TimedOutScorer))
        .route(BRIEF)
        .await
        .unwrap();

    assert_eq!(routed.metadata.backend_method, BackendMethod::Local);
    assert_eq!(routed.metadata.processed_sentences, 4);
    for bucket in routed.buckets.values() {
        for item in bucket {
            assert_ne!(item.method, ScoreMethod::Remote);
        }
    }
}

#[tokio::test]
async fn remote_answers_mark_backend_hybrid() {
    let routed = local_router()
        .with_remote_scorer(Arc::new(FixedScorer {
            category: Category::Spell,
            confidence: 0.9,
        }))
        .route(BRIEF)
        .await
        .unwrap();

    assert_eq!(routed.metadata.backend_method, BackendMethod::Hybrid);
    assert_eq!(routed.buckets[&Category::Spell].len(), 4);
    for item in &routed.buckets[&Category::Spell] {
        assert_eq!(item.method, ScoreMethod::Remote);
    }
}

#[tokio::test]
async fn partial_remote_failures_fall_back_per_sentence() {
    let routed = local_router()
        .with_remote_scorer(Arc::new(FlakyScorer))
        .route(BRIEF)
        .await
        .unwrap();

    assert_eq!(routed.metadata.backend_method, BackendMethod::Hybrid);

    // The research sentence was answered remotely; the rest locally.
    let wisdom = &routed.buckets[&Category::Wisdom];
    assert_eq!(wisdom.len(), 1);
    assert_eq!(wisdom[0].method, ScoreMethod::Remote);

    for category in [Category::Hunch, Category::Nudge, Category::Spell] {
        for item in &routed.buckets[&category] {
            assert_ne!(item.method, ScoreMethod::Remote);
        }
    }
}

#[tokio::test]
async fn low_confidence_remote_answers_default_to_hunch() {
    let routed = local_router()
        .with_remote_scorer(Arc::new(FixedScorer {
            category: Category::Spell,
            confidence: 0.2,
        }))
        .route(BRIEF)
        .await
        .unwrap();

    // 0.2 is at or below the default threshold, so every sentence lands in
    // Hunch even though the provider said Spell.
    assert_eq!(routed.buckets[&Category::Hunch].len(), 4);
    assert_eq!(routed.buckets[&Category::Spell].len(), 0);
}

#[tokio::test]
async fn unclassifiable_text_lands_in_hunch_with_fallback_confidence() {
    let routed = local_router()
        .route("qwerty zxcvb asdfgh uiop jklmn")
        .await
        .unwrap();

    let hunch = &routed.buckets[&Category::Hunch];
    assert_eq!(hunch.len(), 1);
    assert_eq!(hunch[0].confidence, 0.2);
    assert_eq!(hunch[0].method, ScoreMethod::Fallback);
}

#[tokio::test]
async fn trailing_question_mark_boosts_hunch_through_routing() {
    let routed = local_router()
        .route("Could this be the answer to our brand problem?")
        .await
        .unwrap();

    // The final question mark survives segmentation, so the question
    // heuristic fires and beats the no-signal fallback.
    let hunch = &routed.buckets[&Category::Hunch];
    assert_eq!(hunch.len(), 1);
    assert_eq!(hunch[0].method, ScoreMethod::Local);
    assert!(hunch[0].confidence > 0.2);
}

#[tokio::test]
async fn routed_content_serializes_for_external_collaborators() {
    let routed = local_router().route(BRIEF).await.unwrap();
    let json = serde_json::to_value(&routed).unwrap();

    // Buckets must be keyed by the four fixed category names, each item
    // carrying at least text and confidence.
    let buckets = json.get("buckets").unwrap().as_object().unwrap();
    for name in ["Hunch", "Wisdom", "Nudge", "Spell"] {
        let bucket = buckets.get(name).unwrap().as_array().unwrap();
        for item in bucket {
            assert!(item.get("text").is_some());
            assert!(item.get("confidence").is_some());
        }
    }
}
