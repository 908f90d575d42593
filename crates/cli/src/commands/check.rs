//! `mockauth check`: validate the configuration without serving it.

use std::collections::HashSet;

use mockauth_config::ServiceConfig;
use mockauth_telemetry::Logger;

use crate::{Exit, Options, bootstrap};

pub async fn run(options: &Options, logger: &Logger) -> Result<Exit, Box<dyn std::error::Error>> {
    let path = bootstrap::config_path(options.config_file.as_deref(), logger).await;
    let config = ServiceConfig::load_from(&path)?;

    let mut accepted = 0;
    let mut seen = HashSet::new();
    for (index, endpoint) in config.endpoints.iter().enumerate() {
        match endpoint.validate() {
            Ok(spec) => {
                accepted += 1;
                let note = if seen.insert((spec.method, spec.path.clone())) {
                    ""
                } else {
                    "  (replaces an earlier entry)"
                };
                logger
                    .info([format!(
                        "   accepted  #{index:<3} {:<7} {:<28} {}{note}",
                        spec.method, spec.path, spec.behavior
                    )
                    .into()])
                    .await;
            }
            Err(e) => {
                logger
                    .warning([format!("   skipped   #{index:<3} {e}").into()])
                    .await;
            }
        }
    }

    let port = config.listening_port_or(options.listening_port);
    let hours = config.token_expiry_hours_or(options.token_expiry_hours);
    logger
        .info([format!(
            "{accepted} of {} endpoints accepted; port {port}; token expiry {hours} h",
            config.endpoints.len()
        )
        .into()])
        .await;

    Ok(Exit::Success)
}
