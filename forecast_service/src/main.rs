//! # forecast_service
//!
//! Serves the forecast API, or runs a single forecast from a CSV file.

use anyhow::Context;
use clap::Parser;
use forecast_service::config::{Cli, Command, PredictArgs, ServeArgs};
use forecast_service::{router, AppState};
use fx_forecast::{DataLoader, ForecastDispatcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Fitting runs on the blocking pool, so one async worker is enough
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forecast_service=info,fx_forecast=info,tower_http=info".into()
            }),
        )
        .init();

    match Cli::parse().into_command() {
        Command::Serve(args) => serve(args).await,
        Command::Predict(args) => predict(args),
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let dispatcher = ForecastDispatcher::new(args.max_horizon)?;
    let app = router(AppState::new(dispatcher));

    let addr = args
        .socket_addr()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        "forecast_service v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn predict(args: PredictArgs) -> anyhow::Result<()> {
    let data = DataLoader::from_csv(&args.csv)
        .with_context(|| format!("failed to load {}", args.csv.display()))?;
    let strategy = args.algorithm.parse()?;

    let dispatcher = ForecastDispatcher::new(args.max_horizon)?;
    let result = dispatcher.forecast_series(&data, strategy, args.days)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
