//! `mockauth init`: write the configuration template.

use mockauth_config::write_template;
use mockauth_telemetry::Logger;

use crate::{Exit, Options, bootstrap};

pub async fn run(options: &Options, logger: &Logger) -> Result<Exit, Box<dyn std::error::Error>> {
    let path = bootstrap::config_path(options.config_file.as_deref(), logger).await;

    if write_template(&path)? {
        logger
            .info([
                "Wrote configuration template to ".into(),
                path.display().to_string().into(),
            ])
            .await;
    } else {
        logger
            .warning([
                "Config file already exists, leaving it untouched:  ".into(),
                path.display().to_string().into(),
            ])
            .await;
    }

    Ok(Exit::Success)
}
