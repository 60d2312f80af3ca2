use std::sync::Arc;

use tierwise_core::{EngineError, IntelligenceOrchestrator};
use tierwise_db::SqliteIntelligenceStore;

use crate::commands::{block_on_store, parse_user, CommandResult};

/// Emits the full intelligence report as pretty JSON on stdout.
pub fn run(user: &str) -> CommandResult {
    let user_id = match parse_user("analyze", user) {
        Ok(user_id) => user_id,
        Err(result) => return result,
    };

    let result = block_on_store(move |pool, config| async move {
        let engine = IntelligenceOrchestrator::new(
            Arc::new(SqliteIntelligenceStore::new(pool)),
            config.engine,
        );
        let report = engine.generate_intelligence(&user_id).await.map_err(|error| {
            let class = match error {
                EngineError::NotFound { .. } => "not_found",
                EngineError::Store(_) => "store",
            };
            (class, error.to_string(), 6u8)
        })?;
        serde_json::to_string_pretty(&report)
            .map_err(|error| ("serialization", error.to_string(), 7u8))
    });

    match result {
        Ok(report_json) => CommandResult { exit_code: 0, output: report_json },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("analyze", error_class, message, exit_code)
        }
    }
}
