//! Command-line and environment configuration.
//!
//! Every server option can come from a flag or an environment variable;
//! a `.env` file in the working directory is loaded before parsing.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FORECAST_HOST` | `0.0.0.0` |
//! | `FORECAST_PORT` | `5000` |
//! | `FORECAST_MAX_HORIZON` | `365` |

use clap::{Args, Parser, Subcommand};
use fx_forecast::{DEFAULT_HORIZON, DEFAULT_MAX_HORIZON};
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Exchange-rate forecasting service
#[derive(Debug, Parser)]
#[command(name = "forecast_service", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The chosen command, serving with environment settings when none is given
    pub fn into_command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Serve(ServeArgs::parse_from(["serve"])))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Forecast a CSV price history and print the result as JSON
    Predict(PredictArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "FORECAST_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "FORECAST_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Largest accepted `forecast_days`
    #[arg(long, env = "FORECAST_MAX_HORIZON", default_value_t = DEFAULT_MAX_HORIZON)]
    pub max_horizon: usize,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// CSV file with `date,close` columns
    #[arg(long)]
    pub csv: PathBuf,

    /// Strategy name or legacy alias
    #[arg(long, default_value = "seasonal-decomposition")]
    pub algorithm: String,

    /// Days to forecast
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    pub days: usize,

    #[arg(long, env = "FORECAST_MAX_HORIZON", default_value_t = DEFAULT_MAX_HORIZON)]
    pub max_horizon: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_arguments() {
        let cli = Cli::parse_from([
            "forecast_service",
            "predict",
            "--csv",
            "eurusd.csv",
            "--algorithm",
            "garch",
            "--days",
            "10",
        ]);

        match cli.into_command() {
            Command::Predict(args) => {
                assert_eq!(args.csv, PathBuf::from("eurusd.csv"));
                assert_eq!(args.algorithm, "garch");
                assert_eq!(args.days, 10);
            }
            other => panic!("expected predict, got {:?}", other),
        }
    }

    #[test]
    fn test_serve_address() {
        let cli = Cli::parse_from([
            "forecast_service",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "8081",
        ]);

        match cli.into_command() {
            Command::Serve(args) => {
                assert_eq!(args.socket_addr().unwrap().to_string(), "127.0.0.1:8081");
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
