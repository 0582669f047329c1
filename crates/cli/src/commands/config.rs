use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use roomdesk_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in effective_values(&config) {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

type ConfigEntry = (&'static str, String, &'static [&'static str]);

fn entry(key: &'static str, value: String, env_keys: &'static [&'static str]) -> ConfigEntry {
    (key, value, env_keys)
}

fn effective_values(config: &AppConfig) -> Vec<ConfigEntry> {
    vec![
        entry("database.url", config.database.url.clone(), &["ROOMDESK_DATABASE_URL"]),
        entry(
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["ROOMDESK_DATABASE_MAX_CONNECTIONS"],
        ),
        entry(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["ROOMDESK_DATABASE_TIMEOUT_SECS"],
        ),
        entry(
            "server.bind_address",
            config.server.bind_address.clone(),
            &["ROOMDESK_SERVER_BIND_ADDRESS"],
        ),
        entry("server.port", config.server.port.to_string(), &["ROOMDESK_SERVER_PORT"]),
        entry(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["ROOMDESK_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        entry(
            "availability.default_days_to_search",
            config.availability.default_days_to_search.to_string(),
            &["ROOMDESK_AVAILABILITY_DEFAULT_DAYS_TO_SEARCH"],
        ),
        entry(
            "availability.max_suggestions",
            config.availability.max_suggestions.to_string(),
            &["ROOMDESK_AVAILABILITY_MAX_SUGGESTIONS"],
        ),
        entry(
            "logging.level",
            config.logging.level.clone(),
            &["ROOMDESK_LOGGING_LEVEL", "ROOMDESK_LOG_LEVEL"],
        ),
        entry(
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["ROOMDESK_LOGGING_FORMAT", "ROOMDESK_LOG_FORMAT"],
        ),
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    ["roomdesk.toml", "config/roomdesk.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
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
