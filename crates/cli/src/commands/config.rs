use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tierwise_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let mut push = |key: &str, value: String, env_key: Option<&str>| {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    };

    push("database.url", config.database.url.clone(), Some("TIERWISE_DATABASE_URL"));
    push("database.max_connections", config.database.max_connections.to_string(), None);
    push("database.timeout_secs", config.database.timeout_secs.to_string(), None);

    push("logging.level", config.logging.level.clone(), Some("TIERWISE_LOG_LEVEL"));
    push("logging.format", format!("{:?}", config.logging.format), None);

    let analyzer = &config.engine.analyzer;
    push("engine.analyzer.trend_up_ratio", analyzer.trend_up_ratio.to_string(), None);
    push("engine.analyzer.trend_down_ratio", analyzer.trend_down_ratio.to_string(), None);
    push("engine.analyzer.growth_projection", analyzer.growth_projection.to_string(), None);
    push("engine.analyzer.decline_projection", analyzer.decline_projection.to_string(), None);

    let segmentation = &config.engine.segmentation;
    push(
        "engine.segmentation.new_user_age_days",
        segmentation.new_user_age_days.to_string(),
        None,
    );
    push(
        "engine.segmentation.power_user_usage_signal",
        segmentation.power_user_usage_signal.to_string(),
        None,
    );

    let pricing = &config.engine.pricing;
    push("engine.pricing.pro_monthly_price", pricing.pro_monthly_price.to_string(), None);
    push("engine.pricing.pro_yearly_price", pricing.pro_yearly_price.to_string(), None);
    push("engine.pricing.retention_price", pricing.retention_price.to_string(), None);

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("TIERWISE_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let root = PathBuf::from(DEFAULT_CONFIG_FILE);
    if root.exists() {
        return Some(root);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[engine.pricing]\npro_monthly_price = \"49.00\"\n".parse().unwrap();
        assert!(contains_path(&doc, "engine.pricing.pro_monthly_price"));
        assert!(!contains_path(&doc, "engine.pricing.retention_price"));
        assert!(!contains_path(&doc, "database.url"));
    }

    #[test]
    fn render_line_formats_key_value_and_source() {
        let line = render_line("logging.level", "info", "default".to_string());
        assert_eq!(line, "- logging.level = info (source: default)");
    }
}
