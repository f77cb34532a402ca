//! Configuration loader for chatgate.
//!
//! Reads an optional `config.toml` and deserializes it into [`ProxyConfig`],
//! then applies `CHATGATE_*` environment overrides. Falls back to defaults
//! when the file is missing or malformed.

use std::path::Path;

use chatgate_types::config::ProxyConfig;

pub const ENV_BACKEND_URL: &str = "CHATGATE_BACKEND_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "CHATGATE_REQUEST_TIMEOUT_SECS";
pub const ENV_SESSION_CREATE_TIMEOUT: &str = "CHATGATE_SESSION_CREATE_TIMEOUT_SECS";
pub const ENV_HEALTH_TIMEOUT: &str = "CHATGATE_HEALTH_TIMEOUT_SECS";
pub const ENV_SESSION_TTL: &str = "CHATGATE_SESSION_TTL_SECS";
pub const ENV_CLEANUP_INTERVAL: &str = "CHATGATE_CLEANUP_INTERVAL_SECS";
pub const ENV_ENVIRONMENT: &str = "CHATGATE_ENVIRONMENT";

/// Load configuration from `path` (if any) plus the process environment.
///
/// - No path, or the file does not exist: defaults.
/// - The file exists but fails to read or parse: logs a warning, defaults.
/// - Zero durations from the file are reset to their defaults.
/// - Environment overrides are applied last either way.
pub async fn load_proxy_config(path: Option<&Path>) -> ProxyConfig {
    let config = match path {
        Some(path) => validate_durations(read_config_file(path).await),
        None => ProxyConfig::default(),
    };
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Reset every zero duration to its default, with a warning.
///
/// A zero timeout fails every call and a zero cleanup interval cannot be
/// scheduled, so neither is ever passed on.
pub fn validate_durations(mut config: ProxyConfig) -> ProxyConfig {
    let defaults = ProxyConfig::default();
    let fields = [
        ("request_timeout_secs", &mut config.request_timeout_secs, defaults.request_timeout_secs),
        (
            "session_create_timeout_secs",
            &mut config.session_create_timeout_secs,
            defaults.session_create_timeout_secs,
        ),
        ("health_timeout_secs", &mut config.health_timeout_secs, defaults.health_timeout_secs),
        ("session_ttl_secs", &mut config.session_ttl_secs, defaults.session_ttl_secs),
        (
            "cleanup_interval_secs",
            &mut config.cleanup_interval_secs,
            defaults.cleanup_interval_secs,
        ),
    ];
    for (key, value, default) in fields {
        if *value == 0 {
            warn_zero(key, default);
            *value = default;
        }
    }
    config
}

fn warn_zero(key: &str, kept: u64) {
    tracing::warn!("{key} must be greater than zero, using {kept}");
}

async fn read_config_file(path: &Path) -> ProxyConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ProxyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ProxyConfig::default();
        }
    };

    match toml::from_str::<ProxyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            ProxyConfig::default()
        }
    }
}

/// Apply overrides looked up through `lookup` (normally `std::env::var`).
///
/// Unparsable and zero durations are ignored with a warning; the previous
/// value stays in effect.
pub fn apply_env_overrides<F>(mut config: ProxyConfig, lookup: F) -> ProxyConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        config.backend_url = url.trim().to_string();
    }
    if let Some(env) = lookup(ENV_ENVIRONMENT).filter(|v| !v.trim().is_empty()) {
        config.environment = env.trim().to_string();
    }

    override_secs(&lookup, ENV_REQUEST_TIMEOUT, &mut config.request_timeout_secs);
    override_secs(
        &lookup,
        ENV_SESSION_CREATE_TIMEOUT,
        &mut config.session_create_timeout_secs,
    );
    override_secs(&lookup, ENV_HEALTH_TIMEOUT, &mut config.health_timeout_secs);
    override_secs(&lookup, ENV_SESSION_TTL, &mut config.session_ttl_secs);
    override_secs(&lookup, ENV_CLEANUP_INTERVAL, &mut config.cleanup_interval_secs);

    let trimmed = config.backend_url.trim_end_matches('/').len();
    config.backend_url.truncate(trimmed);
    validate_durations(config)
}

fn override_secs<F>(lookup: &F, key: &str, target: &mut u64)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => warn_zero(key, *target),
        Ok(secs) => *target = secs,
        Err(err) => tracing::warn!("Ignoring {key}={raw:?}: {err}"),
    }
}
