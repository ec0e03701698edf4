//! # Cadence
//!
//! A small web application for posting short phrases into time-bounded
//! buckets ("frequencies"). Each frequency has a lifetime after which it is
//! completed, and a cadence on which its latest phrase is blanked if nothing
//! new arrives. A background sweep applies both rules on a fixed period,
//! concurrently with user writes.

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod events;
pub mod service;
pub mod sweep;

pub use error::{Error, Result};

use events::EventBus;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, shared with the sweeper
    pub db: SqlitePool,
    /// Event bus, shared with the sweeper and the service layer
    pub events: Arc<EventBus>,
}

impl AppState {
    pub fn new(db: SqlitePool, events: Arc<EventBus>) -> Self {
        Self { db, events }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(api::pages::home))
        .route("/static/app.js", get(api::pages::app_js))
        .route("/frequency/new", get(api::pages::new_frequency))
        .route("/phrase/new", get(api::pages::new_phrase))
        .route("/about", get(api::pages::about))
        .route("/login", get(api::pages::login))
        // GET-based mutations (query-string parameters, redirect on success)
        .route("/frequency/create", get(api::frequencies::create_frequency))
        .route("/phrase/create", get(api::frequencies::create_phrase))
        // JSON + event APIs
        .route("/api/frequencies", get(api::frequencies::list_frequencies))
        .route("/api/events", get(api::sse::event_stream))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
