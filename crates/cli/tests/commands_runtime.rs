use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;

use tierwise_cli::commands::{analyze, migrate, pricing, seed};
use tierwise_db::fixtures;

#[test]
fn migrate_returns_success_against_memory_database() {
    with_env(&[("TIERWISE_DATABASE_URL", "sqlite::memory:".to_string())], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn seed_reports_the_three_demo_accounts() {
    let dir = tempfile::tempdir().expect("tempdir");
    with_env(&[("TIERWISE_DATABASE_URL", file_url(&dir, "seed.db"))], || {
        let result = seed::run();
        assert_eq!(result.exit_code, 0, "expected successful seed run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().expect("message");
        assert!(message.contains("fresh-free"));
        assert!(message.contains("heavy-free"));
        assert!(message.contains("dormant-pro"));
    });
}

#[test]
fn analyze_emits_a_report_for_a_seeded_account() {
    let dir = tempfile::tempdir().expect("tempdir");
    with_env(&[("TIERWISE_DATABASE_URL", file_url(&dir, "analyze.db"))], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = analyze::run(&fixtures::HEAVY_FREE_USER.to_string());
        assert_eq!(result.exit_code, 0, "expected report output: {}", result.output);

        let report = parse_payload(&result.output);
        assert_eq!(report["current_tier"], "free");
        assert!(report["recommendations"].as_array().is_some());
        assert!(report["churn_risk"]["risk_level"].is_string());
    });
}

#[test]
fn analyze_rejects_a_malformed_user_id() {
    with_env(&[("TIERWISE_DATABASE_URL", "sqlite::memory:".to_string())], || {
        let result = analyze::run("not-a-uuid");
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_user_id");
    });
}

#[test]
fn analyze_reports_not_found_for_an_unseeded_account() {
    let dir = tempfile::tempdir().expect("tempdir");
    with_env(&[("TIERWISE_DATABASE_URL", file_url(&dir, "missing.db"))], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = analyze::run("11111111-2222-3333-4444-555555555555");
        assert_eq!(result.exit_code, 6);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "not_found");
    });
}

#[test]
fn pricing_emits_an_adjusted_quote_for_a_seeded_account() {
    let dir = tempfile::tempdir().expect("tempdir");
    with_env(&[("TIERWISE_DATABASE_URL", file_url(&dir, "pricing.db"))], || {
        assert_eq!(seed::run().exit_code, 0);

        let result = pricing::run(&fixtures::FRESH_FREE_USER.to_string());
        assert_eq!(result.exit_code, 0, "expected pricing output: {}", result.output);

        let quote = parse_payload(&result.output);
        assert_eq!(quote["segment"], "new_user");
        assert_eq!(quote["adjusted_price"], "20.30");
    });
}

fn file_url(dir: &tempfile::TempDir, name: &str) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join(name).display())
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output must be JSON")
}

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn with_env(vars: &[(&str, String)], body: impl FnOnce()) {
    let _guard = env_lock().lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let saved: Vec<(&str, Option<String>)> =
        vars.iter().map(|(key, _)| (*key, env::var(key).ok())).collect();
    for (key, value) in vars {
        env::set_var(key, value);
    }

    body();

    for (key, previous) in saved {
        match previous {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
