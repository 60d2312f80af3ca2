//! Subscription intelligence engine: usage analysis, segmentation, tier
//! recommendations, churn risk, personalized offers, and dynamic pricing
//! for a two-tier subscription product.
//!
//! The crate is a pure analysis library. All persistence goes through the
//! [`store::IntelligenceStore`] trait; callers inject an implementation and
//! drive everything through [`analysis::IntelligenceOrchestrator`].

pub mod analysis;
pub mod config;
pub mod domain;
pub mod errors;
pub mod store;

pub use analysis::IntelligenceOrchestrator;
pub use config::{AppConfig, ConfigError, EngineConfig, LoadOptions};
pub use errors::{EngineError, StoreError};
pub use store::IntelligenceStore;
