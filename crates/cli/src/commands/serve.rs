//! `mockauth serve`: compile the configured endpoints and serve them.

use std::sync::Arc;

use mockauth_config::{ServiceConfig, write_template};
use mockauth_gateway::{CompileContext, EndpointRouter, bind, endpoint_table, register_all, serve};
use mockauth_telemetry::{Logger, fs};
use mockauth_tokens::SigningSecret;

use crate::{Exit, Options, bootstrap};

pub async fn run(
    options: &Options,
    logger: &Arc<Logger>,
    secret: Arc<SigningSecret>,
) -> Result<Exit, Box<dyn std::error::Error>> {
    let path = bootstrap::config_path(options.config_file.as_deref(), logger).await;

    if !fs::is_file(&path).await {
        logger
            .warning([
                "Config file not found.  Copying config template to ".into(),
                path.display().to_string().into(),
            ])
            .await;
        write_template(&path)?;
    }
    logger
        .info(["Config file:  ".into(), path.display().to_string().into()])
        .await;

    let config = ServiceConfig::load_from(&path)?;
    let port = config.listening_port_or(options.listening_port);
    let ctx = CompileContext {
        default_expiry_hours: config.token_expiry_hours_or(options.token_expiry_hours),
        default_payload: config.default_payload.clone(),
        secret,
        logger: Arc::clone(logger),
    };

    let mut registrar = EndpointRouter::new();
    register_all(&config.endpoints, &ctx, &mut registrar).await;
    if registrar.is_empty() {
        logger
            .warning(["No endpoints configured; every request will get 404".into()])
            .await;
    }

    let listener = bind(port).await?;
    let table = endpoint_table(registrar.endpoints(), port);
    logger
        .info(["Listening on endpoints:  ".into(), format!("\n{table}\n").into()])
        .await;

    match serve(listener, registrar.into_router()).await {
        Ok(()) => Ok(Exit::Success),
        Err(e) => {
            logger
                .error(["Error from HTTP server:  ".into(), e.to_string().into()])
                .await;
            Ok(Exit::SomeOtherError)
        }
    }
}
