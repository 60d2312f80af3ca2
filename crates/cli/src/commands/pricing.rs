use std::sync::Arc;

use tierwise_core::{EngineError, IntelligenceOrchestrator};
use tierwise_db::SqliteIntelligenceStore;

use crate::commands::{block_on_store, parse_user, CommandResult};

/// Emits the segment-adjusted pricing quote as pretty JSON on stdout.
pub fn run(user: &str) -> CommandResult {
    let user_id = match parse_user("pricing", user) {
        Ok(user_id) => user_id,
        Err(result) => return result,
    };

    let result = block_on_store(move |pool, config| async move {
        let engine = IntelligenceOrchestrator::new(
            Arc::new(SqliteIntelligenceStore::new(pool)),
            config.engine,
        );
        let pricing = engine.generate_dynamic_pricing(&user_id).await.map_err(|error| {
            let class = match error {
                EngineError::NotFound { .. } => "not_found",
                EngineError::Store(_) => "store",
            };
            (class, error.to_string(), 6u8)
        })?;
        serde_json::to_string_pretty(&pricing)
            .map_err(|error| ("serialization", error.to_string(), 7u8))
    });

    match result {
        Ok(pricing_json) => CommandResult { exit_code: 0, output: pricing_json },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("pricing", error_class, message, exit_code)
        }
    }
}
