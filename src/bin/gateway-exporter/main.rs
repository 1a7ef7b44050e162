mod args;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use gateway_rates::{
    config::{Configuration, SinkConfig},
    scheduler::Supervisor,
    sink::{InfluxSink, MetricsSink, PostgresSink},
    upnp::UpnpRegistry,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    if args.dump {
        let yaml = Configuration::default()
            .to_yaml()
            .context("failed to serialize default configuration")?;
        print!("{yaml}");
        return Ok(());
    }

    info!(version = env!("CARGO_PKG_VERSION"), "starting gateway exporter");

    let config = Configuration::load(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config.display()))?;

    let sink: Arc<dyn MetricsSink> = match &config.sink {
        SinkConfig::Influx(influx) => {
            let sink = InfluxSink::new(influx).context("failed to create InfluxDB sink")?;
            info!(url = %sink.write_url(), "writing to InfluxDB");
            Arc::new(sink)
        }
        SinkConfig::Postgres(postgres) => {
            let sink = PostgresSink::connect(postgres)
                .await
                .context("failed to connect to database")?;
            info!("writing to PostgreSQL");
            Arc::new(sink)
        }
    };

    let registry =
        UpnpRegistry::new(&config.discovery).context("failed to create device registry")?;

    Supervisor::new(Arc::new(registry), sink, config.collection)
        .run(shutdown_signal())
        .await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for interrupt: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received interrupt"),
        () = terminate => info!("received SIGTERM"),
    }
}
