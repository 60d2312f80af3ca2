pub mod analyze;
pub mod config;
pub mod migrate;
pub mod pricing;
pub mod seed;

use std::future::Future;

use serde::Serialize;

use tierwise_core::config::{AppConfig, LoadOptions};
use tierwise_db::{connect, DbPool};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) type CommandError = (&'static str, String, u8);

/// Shared command plumbing: load config, stand up a current-thread runtime,
/// open the pool, run the task, and close the pool before returning.
pub(crate) fn block_on_store<Fut>(
    task: impl FnOnce(DbPool, AppConfig) -> Fut,
) -> Result<String, CommandError>
where
    Fut: Future<Output = Result<String, CommandError>>,
{
    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| ("config_validation", format!("configuration issue: {error}"), 2u8))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| {
            ("runtime_init", format!("failed to initialize async runtime: {error}"), 3u8)
        })?;

    runtime.block_on(async {
        let pool = connect(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        let output = task(pool.clone(), config).await;
        pool.close().await;
        output
    })
}

pub(crate) fn parse_user(command: &str, raw: &str) -> Result<tierwise_core::domain::account::UserId, CommandResult> {
    uuid::Uuid::parse_str(raw)
        .map(tierwise_core::domain::account::UserId)
        .map_err(|error| {
            CommandResult::failure(
                command,
                "invalid_user_id",
                format!("`{raw}` is not a valid account UUID: {error}"),
                2,
            )
        })
}
