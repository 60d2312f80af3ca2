//! Single public entry point. Loads the account snapshot once, runs the
//! prerequisite analysis and segmentation steps, then fans the branches
//! out concurrently and assembles the report.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::analysis::churn::ChurnRiskAssessor;
use crate::analysis::offers::OfferGenerator;
use crate::analysis::optimization::OptimizationAdvisor;
use crate::analysis::pricing::DynamicPricingEngine;
use crate::analysis::recommendation::RecommendationEngine;
use crate::analysis::segmentation::SegmentClassifier;
use crate::analysis::usage::UsagePatternAnalyzer;
use crate::config::EngineConfig;
use crate::domain::account::{AccountSnapshot, UserId};
use crate::domain::churn::{ChurnRiskAssessment, RiskLevel};
use crate::domain::pricing::DynamicPricing;
use crate::domain::report::SubscriptionIntelligence;
use crate::errors::EngineError;
use crate::store::IntelligenceStore;

pub struct IntelligenceOrchestrator {
    store: Arc<dyn IntelligenceStore>,
    analyzer: UsagePatternAnalyzer,
    classifier: SegmentClassifier,
    recommendations: RecommendationEngine,
    churn: ChurnRiskAssessor,
    offers: OfferGenerator,
    advisor: OptimizationAdvisor,
    pricing: DynamicPricingEngine,
}

impl IntelligenceOrchestrator {
    pub fn new(store: Arc<dyn IntelligenceStore>, config: EngineConfig) -> Self {
        Self {
            store,
            analyzer: UsagePatternAnalyzer::new(config.analyzer),
            classifier: SegmentClassifier::new(config.segmentation),
            recommendations: RecommendationEngine::new(config.pricing.clone()),
            churn: ChurnRiskAssessor::new(config.pricing.clone()),
            offers: OfferGenerator::new(config.pricing.clone()),
            advisor: OptimizationAdvisor::new(config.pricing.clone()),
            pricing: DynamicPricingEngine::new(config.pricing),
        }
    }

    /// Builds the full report for one account. Only an unresolvable
    /// account fails; a failed branch degrades to its neutral value and is
    /// logged, so the report stays complete but conservative.
    pub async fn generate_intelligence(
        &self,
        user_id: &UserId,
    ) -> Result<SubscriptionIntelligence, EngineError> {
        let snapshot = self.resolve_snapshot(user_id).await?;
        let history = self.store.load_usage_history(user_id).await?;
        let activity = self.store.load_activity(user_id).await?;
        let now = Utc::now();

        let patterns = Arc::new(self.analyzer.analyze(&snapshot, &history, &activity));
        let primary = self
            .classifier
            .classify(snapshot.account_age_days(now), patterns.usage_signal());
        debug!(
            event_name = "intelligence.analysis.complete",
            user_id = %user_id,
            segment = primary.as_str(),
            usage_signal = patterns.usage_signal(),
            "prerequisite analysis finished"
        );

        let snapshot = Arc::new(snapshot);
        let recommendation_task = tokio::spawn({
            let engine = self.recommendations.clone();
            let snapshot = Arc::clone(&snapshot);
            let patterns = Arc::clone(&patterns);
            async move { engine.evaluate(&snapshot, &patterns, primary, now) }
        });
        let churn_task = tokio::spawn({
            let assessor = self.churn.clone();
            let patterns = Arc::clone(&patterns);
            async move { assessor.assess(&patterns) }
        });
        let offer_task = tokio::spawn({
            let generator = self.offers.clone();
            let assessor = self.churn.clone();
            let classifier = self.classifier.clone();
            let snapshot = Arc::clone(&snapshot);
            let patterns = Arc::clone(&patterns);
            async move {
                // Offer rules target the effective segment: the primary
                // label with the at-risk overlay derived from the same
                // churn evidence the sibling branch reports.
                let risk = assessor.assess(&patterns).risk_level;
                let effective = classifier.overlay_risk(primary, risk);
                generator.evaluate(&snapshot, &patterns, effective, now)
            }
        });
        let optimization_task = tokio::spawn({
            let advisor = self.advisor.clone();
            let snapshot = Arc::clone(&snapshot);
            let patterns = Arc::clone(&patterns);
            async move { advisor.evaluate(&snapshot, &patterns) }
        });

        let (recommendations, churn, offers, optimizations) =
            tokio::join!(recommendation_task, churn_task, offer_task, optimization_task);

        let recommendations = recommendations.unwrap_or_else(|error| {
            warn!(event_name = "intelligence.branch.failed", branch = "recommendation", %error);
            Vec::new()
        });
        let churn_risk = churn.unwrap_or_else(|error| {
            warn!(event_name = "intelligence.branch.failed", branch = "churn", %error);
            neutral_assessment()
        });
        let personalized_offers = offers.unwrap_or_else(|error| {
            warn!(event_name = "intelligence.branch.failed", branch = "offers", %error);
            Vec::new()
        });
        let optimization_suggestions = optimizations.unwrap_or_else(|error| {
            warn!(event_name = "intelligence.branch.failed", branch = "optimization", %error);
            Vec::new()
        });

        let usage_patterns = Arc::try_unwrap(patterns).unwrap_or_else(|arc| (*arc).clone());
        Ok(SubscriptionIntelligence {
            user_id: *user_id,
            current_tier: snapshot.tier,
            segment: primary.profile(),
            usage_patterns,
            recommendations,
            churn_risk,
            personalized_offers,
            optimization_suggestions,
        })
    }

    /// Prices the account from the snapshot alone; no history required.
    pub async fn generate_dynamic_pricing(
        &self,
        user_id: &UserId,
    ) -> Result<DynamicPricing, EngineError> {
        let snapshot = self.resolve_snapshot(user_id).await?;
        let now = Utc::now();
        let segment = self
            .classifier
            .classify(snapshot.account_age_days(now), snapshot.counters.total());
        debug!(
            event_name = "intelligence.pricing.segmented",
            user_id = %user_id,
            segment = segment.as_str(),
            "pricing segment resolved"
        );
        Ok(self.pricing.price(*user_id, segment, now))
    }

    async fn resolve_snapshot(&self, user_id: &UserId) -> Result<AccountSnapshot, EngineError> {
        self.store
            .load_snapshot(user_id)
            .await?
            .ok_or(EngineError::NotFound { user_id: *user_id })
    }
}

/// Conservative fallback when the churn branch itself fails.
fn neutral_assessment() -> ChurnRiskAssessment {
    ChurnRiskAssessment {
        risk_level: RiskLevel::Low,
        score: 0.0,
        factors: Vec::new(),
        retention_actions: Vec::new(),
        time_to_churn_days: None,
        confidence: 0,
    }
}
