use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use genstream::{GenStreamConfig, GenStreamModule, LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "genstream-server",
    version,
    about = "Relays chunked generation output as framed server-sent events"
)]
struct Args {
    /// YAML configuration file. `GENSTREAM_*` environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding `server.bind`.
    #[arg(long)]
    bind: Option<String>,

    /// Log output format, overriding `logging.format`.
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl Args {
    fn into_config(self) -> Result<GenStreamConfig> {
        let mut config = GenStreamConfig::load(self.config.as_deref()).with_context(|| {
            match &self.config {
                Some(path) => format!("load configuration from {}", path.display()),
                None => "load configuration".to_owned(),
            }
        })?;
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format.into();
        }
        Ok(config)
    }
}

/// `RUST_LOG` wins over `logging.level` when set.
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("invalid logging.level '{}'", config.level))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config.logging)?;

    let app = GenStreamModule::from_config(&config)
        .context("build relay")?
        .router()
        .context("build router")?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("bind {}", config.server.bind))?;
    info!(
        bind = %config.server.bind,
        upstream = %config.upstream.url,
        model = %config.upstream.model,
        deadline_secs = config.relay.deadline_secs,
        "genstream relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")
}
