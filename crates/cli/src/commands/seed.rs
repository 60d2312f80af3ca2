use chrono::Utc;

use tierwise_db::{fixtures, migrations};

use crate::commands::{block_on_store, CommandResult};

pub fn run() -> CommandResult {
    let result = block_on_store(|pool, _config| async move {
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let summary = fixtures::load(&pool, Utc::now())
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let lines: Vec<String> = summary
            .accounts
            .iter()
            .map(|(label, user_id)| format!("  - {label}: {user_id}"))
            .collect();
        Ok(format!("seeded {} demo accounts:\n{}", summary.accounts.len(), lines.join("\n")))
    });

    match result {
        Ok(message) => CommandResult::success("seed", message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}
