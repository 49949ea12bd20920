//! # forecast_service
//!
//! HTTP API over the [`fx_forecast`] dispatcher.
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/forecast` | POST | Forecast a price history with one strategy |
//! | `/algorithms` | GET | Strategy catalog |
//! | `/health` | GET | Liveness and compiled-in strategies |

use axum::routing::{get, post};
use axum::Router;
use fx_forecast::ForecastDispatcher;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;

pub use crate::error::{ApiError, ErrorBody};

/// Application state shared across handlers
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub dispatcher: ForecastDispatcher,
}

impl AppState {
    pub fn new(dispatcher: ForecastDispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Build the router with permissive CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/forecast", post(routes::forecast))
        .route("/algorithms", get(routes::algorithms))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
