use tierwise_db::migrations;

use crate::commands::{block_on_store, CommandResult};

pub fn run() -> CommandResult {
    let result = block_on_store(|pool, _config| async move {
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        Ok("applied pending migrations".to_string())
    });

    match result {
        Ok(message) => CommandResult::success("migrate", message),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
