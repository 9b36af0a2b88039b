// src/lib.rs

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use config::Settings;
use db::CommissionSource;

pub struct AppState<S> {
    pub source: Arc<S>,
    pub settings: Arc<Settings>,
}

impl<S> AppState<S> {
    pub fn new(source: S, settings: Arc<Settings>) -> Self {
        AppState { source: Arc::new(source), settings }
    }
}

// manual impl: S itself need not be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState { source: Arc::clone(&self.source), settings: Arc::clone(&self.settings) }
    }
}

/// Builds the full router: dashboard pages, JSON API, health and static assets.
pub fn app<S: CommissionSource>(state: AppState<S>) -> Router {
    let static_dir = state.settings.static_dir.clone();

    // Very permissive CORS (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/commission-data", get(routes::api::commission_data::<S>))
        .route("/api/commission-summary", get(routes::api::commission_summary::<S>))
        .layer(CatchPanicLayer::custom(routes::panic_envelope));

    Router::new()
        // pages
        .route(routes::pages::HOME.path, get(routes::pages::home))
        .route(routes::pages::TRENDS.path, get(routes::pages::trends))
        .route(routes::pages::GROSS_COMMISSION.path, get(routes::pages::gross_commission))
        .route(routes::pages::NET_COMMISSION.path, get(routes::pages::net_commission))
        // health
        .route("/health", get(routes::health::health::<S>))
        .merge(api)
        .nest_service("/static", ServeDir::new(static_dir))
        // state & middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
