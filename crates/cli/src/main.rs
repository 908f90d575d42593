//! mockauth CLI: the main entry point.
//!
//! Commands:
//! - `serve`  (default) Compile the configured endpoints and serve them
//! - `init`   Write the configuration template
//! - `check`  Validate the configuration and report every endpoint

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Arg, ArgAction, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use mockauth_security::SecretRegistry;
use mockauth_telemetry::{LogArg, Logger, LoggerConfig};
use mockauth_tokens::SigningSecret;

mod bootstrap;
mod commands;

/// Process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    SomeOtherError = 2,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "mockauth",
    about = "mockauth: a configurable mock JWT credential service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,
}

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct Options {
    /// Also write the log to this file (a fresh file per run)
    #[arg(short = 'l', long, env = "LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase console verbosity (-V verbose, -VV debug)
    #[arg(short = 'V', long, action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// YAML configuration file [default: ./config.yml]
    #[arg(short = 'c', long, env = "CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Port to listen on when the configuration does not set one
    #[arg(
        short = 'p',
        long,
        env = "LISTENING_PORT",
        default_value_t = 80,
        value_parser = clap::value_parser!(u16).range(1..),
        global = true
    )]
    pub listening_port: u16,

    /// Secret used to sign and verify tokens
    #[arg(short = 's', long, env = "TOKEN_SECRET", hide_env_values = true, global = true)]
    pub token_secret: Option<String>,

    /// Token lifetime in hours when the configuration does not set one
    #[arg(
        short = 'e',
        long,
        env = "TOKEN_EXPIRY_HOURS",
        default_value_t = mockauth_tokens::DEFAULT_TOKEN_EXPIRY_HOURS,
        value_parser = bootstrap::parse_positive_hours,
        global = true
    )]
    pub token_expiry_hours: f64,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Commands {
    /// Compile the configured endpoints and serve them (default)
    Serve,

    /// Write the configuration template unless a file already exists
    Init,

    /// Validate the configuration and report each endpoint
    Check,
}

fn parse_cli() -> Cli {
    // `-V` is verbosity here, so the version flag moves to `-v`.
    let command = Cli::command().disable_version_flag(true).arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    );
    let matches = command.get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = parse_cli();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let secrets = Arc::new(SecretRegistry::new());
    let logger = Arc::new(Logger::new(LoggerConfig::default(), Arc::clone(&secrets)));

    // The secret is registered before anything else can log.
    let (raw_secret, secret_defaulted) = bootstrap::resolve_secret(cli.options.token_secret.clone());
    let secret = match SigningSecret::new(&raw_secret, &secrets) {
        Ok(secret) => Arc::new(secret),
        Err(e) => return fatal(&logger, &e).await,
    };

    let verbosity = bootstrap::effective_verbosity(
        cli.options.verbosity,
        std::env::var("VERBOSITY").ok().as_deref(),
    );
    if let Err(e) = bootstrap::init_logging(&logger, verbosity, cli.options.log_file.as_deref()).await {
        return fatal(&logger, &e).await;
    }

    logger.verbose(["Logging initialized".into()]).await;
    logger
        .debug(["CLI arguments:  ".into(), LogArg::debug(&cli)])
        .await;
    if secret_defaulted {
        logger
            .warning(["Token secret not specified, using the built-in development secret".into()])
            .await;
    }

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(&cli.options, &logger, secret).await,
        Commands::Init => commands::init::run(&cli.options, &logger).await,
        Commands::Check => commands::check::run(&cli.options, &logger).await,
    };

    match result {
        Ok(exit) => exit.into(),
        Err(e) => fatal(&logger, e.as_ref()).await,
    }
}

async fn fatal(logger: &Logger, error: &(dyn std::error::Error + 'static)) -> ExitCode {
    logger
        .fatal(["Fatal error:  ".into(), error.to_string().into()])
        .await;
    Exit::GeneralError.into()
}
