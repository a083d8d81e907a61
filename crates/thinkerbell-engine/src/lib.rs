//! Thinkerbell Engine
//!
//! Heuristic semantic classification and content routing: free-text briefs
//! are segmented into sentences, each sentence is scored against the four
//! Thinkerbell categories (Hunch, Wisdom, Nudge, Spell), and the results are
//! bucketed, ranked by confidence, and checked for balance.
//!
//! The local scorer is a pure function over a static anchor table and never
//! suspends. An optional remote scoring provider can be consulted first;
//! any remote failure silently downgrades that sentence to local scoring.

pub mod anchors;
pub mod corrections;
pub mod preview;
pub mod remote;
pub mod router;
pub mod scorer;
pub mod segmenter;
pub mod validation;

pub use anchors::{AnchorModel, AnchorProfile, AnchorWeights};
pub use corrections::{Correction, CorrectionAck, CorrectionSink, LoggingCorrectionSink};
pub use preview::{PreviewCache, PreviewService, DEFAULT_PREVIEW_CAPACITY};
pub use remote::{RemoteExplanation, RemoteScorer};
pub use router::{
    Analytics, BackendMethod, CategoryShare, ConfidenceLevels, RoutedContent, RoutedItem, Router,
    RoutingMetadata,
};
pub use scorer::{CategoryScores, Classification, LocalScorer, ScoreMethod, Scorer};
pub use segmenter::segment;
pub use validation::{suggest, validate, ValidationResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::anchors::AnchorModel;
    pub use crate::router::{RoutedContent, Router};
    pub use crate::scorer::{Classification, LocalScorer, ScoreMethod, Scorer};
    pub use crate::validation::{suggest, validate};
    pub use thinkerbell_core::{Category, EngineConfig, Error, Result};
}
