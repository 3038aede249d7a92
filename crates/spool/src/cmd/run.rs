//! Run command - ingest the stream until interrupted

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use spool_config::{Compression, Config, OutputConfig, SourceConfig};
use spool_pipeline::{BackoffPolicy, SessionConfig, ShutdownFlag, StreamSession, SystemClock};
use spool_sinks::{OutputRotator, RotatorConfig};
use spool_sources::{HttpStreamConfig, HttpStreamSource};

use crate::logging;

/// Run the ingestion loop
pub async fn run(config_path: Option<PathBuf>, log_level: Option<&str>) -> Result<()> {
    let (path, config) = super::load_config(config_path.as_deref())?;

    let level = logging::resolve_level(log_level, Some(&config.log));
    logging::init(level, &config.log)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        config = %path.display(),
        url = %config.source.url,
        output = %config.output.path.display(),
        "spool starting"
    );

    if let Err(e) = run_session(&config).await {
        error!(error = %e, "spool stopped");
        return Err(e);
    }

    info!("spool shutdown complete");
    Ok(())
}

async fn run_session(config: &Config) -> Result<()> {
    let source = HttpStreamSource::new(http_config(&config.source))
        .context("failed to build HTTP client")?;
    let rotator = OutputRotator::new(rotator_config(&config.output));

    let shutdown = ShutdownFlag::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let session = StreamSession::new(
        source,
        rotator,
        SystemClock,
        shutdown,
        session_config(config),
    );

    let summary = session.run().await?;
    info!(
        records = summary.records,
        connections = summary.connections,
        rotations = summary.rotations,
        "ingestion finished"
    );
    Ok(())
}

/// Set the shutdown flag on SIGINT or SIGTERM
async fn watch_signals(shutdown: ShutdownFlag) {
    wait_for_shutdown().await;
    info!("shutdown signal received, finishing current record");
    shutdown.trigger();
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn http_config(source: &SourceConfig) -> HttpStreamConfig {
    let mut http = HttpStreamConfig::new(source.url.clone())
        .with_connect_timeout(source.connect_timeout)
        .with_stall_timeout(source.stall_timeout)
        .with_max_line_bytes(source.max_line_bytes);
    if let Some(token) = &source.bearer_token {
        http = http.with_bearer_token(token.clone());
    }
    http.user_agent = source.user_agent.clone();
    http
}

fn rotator_config(output: &OutputConfig) -> RotatorConfig {
    let mut rotator = RotatorConfig::new(output.path.clone())
        .with_records_per_file(output.records_per_file)
        .with_compression(output.compression == Compression::Lz4);
    rotator.buffer_size = output.buffer_size;
    rotator
}

fn session_config(config: &Config) -> SessionConfig {
    let reconnect = &config.reconnect;
    SessionConfig {
        backoff: BackoffPolicy {
            delay_base: reconnect.delay_base,
            delay_mult: reconnect.delay_mult,
            delay_max: reconnect.delay_max,
            ok_duration: reconnect.connect_ok_duration,
        },
        connect_limit: reconnect.connect_limit,
        connect_limit_interval: reconnect.connect_limit_interval,
        seconds_per_heartbeat: config.heartbeat.seconds_per_heartbeat,
        keywords_file: config.source.keywords_file.clone(),
        ..SessionConfig::default()
    }
}

#[cfg(test)]
#[path = "run_test.rs"]
mod run_test;
