//! One-shot downstream health check.

use anyhow::{Result, bail};
use console::style;

use chatgate_core::proxy::handler::HealthStatus;

use crate::state::AppState;

/// Probe the downstream and print the report.
///
/// Fails (non-zero exit) when the downstream is unreachable.
pub async fn check_health(state: &AppState, json: bool) -> Result<()> {
    let report = state.proxy.health().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let (mark, label) = match report.status {
            HealthStatus::Healthy => (style("✓").green(), style("healthy").green()),
            HealthStatus::Degraded => (style("!").yellow(), style("degraded").yellow()),
            HealthStatus::Unhealthy => (style("✗").red(), style("unhealthy").red()),
        };

        println!();
        println!("  {mark} Backend {} is {label}", style(&report.backend_url).cyan());
        if let Some(kind) = report.error_kind {
            println!("    {} {}", style("kind:").dim(), kind);
        }
        if let Some(detail) = &report.detail {
            println!("    {} {}", style("detail:").dim(), detail);
        }
        println!();
    }

    if report.status == HealthStatus::Unhealthy {
        bail!("backend {} is unreachable", report.backend_url);
    }
    Ok(())
}
