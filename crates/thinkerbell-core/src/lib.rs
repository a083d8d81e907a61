//! Thinkerbell Core
//!
//! Shared types for the Thinkerbell semantic classification engine.
//!
//! This crate provides:
//! - The fixed `Category` set (Hunch, Wisdom, Nudge, Spell)
//! - Error types and result handling
//! - Engine configuration with validated, documented defaults

pub mod category;
pub mod config;
pub mod error;

pub use category::Category;
pub use config::{EngineConfig, RemoteConfig};
pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::category::Category;
    pub use crate::config::{EngineConfig, RemoteConfig};
    pub use crate::error::{Error, Result};
}
