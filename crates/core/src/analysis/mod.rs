pub mod churn;
pub mod offers;
pub mod optimization;
pub mod orchestrator;
pub mod pricing;
pub mod recommendation;
pub mod segmentation;
pub mod usage;

pub use churn::ChurnRiskAssessor;
pub use offers::OfferGenerator;
pub use optimization::OptimizationAdvisor;
pub use orchestrator::IntelligenceOrchestrator;
pub use pricing::DynamicPricingEngine;
pub use recommendation::RecommendationEngine;
pub use segmentation::SegmentClassifier;
pub use usage::UsagePatternAnalyzer;
