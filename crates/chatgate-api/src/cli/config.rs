//! Print the effective configuration.

use anyhow::Result;
use console::style;

use chatgate_types::config::ProxyConfig;

use crate::http::handlers::config::ConfigView;

pub fn show_config(config: &ProxyConfig, json: bool) -> Result<()> {
    let view = ConfigView::from_config(config);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let row = |key: &str, value: String| {
        println!("  {:<28} {}", style(key).dim(), value);
    };

    println!();
    println!("  {} chatgate v{}", style("⚙").bold(), view.version);
    println!();
    row("environment", view.environment.clone());
    row("backend_url", style(&view.backend_url).cyan().to_string());
    row("request_timeout_secs", view.request_timeout_secs.to_string());
    row(
        "session_create_timeout_secs",
        view.session_create_timeout_secs.to_string(),
    );
    row("health_timeout_secs", view.health_timeout_secs.to_string());
    row("session_ttl_secs", view.session_ttl_secs.to_string());
    row("cleanup_interval_secs", view.cleanup_interval_secs.to_string());
    println!();
    Ok(())
}
