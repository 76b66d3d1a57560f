use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use db::Db;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::appstate::AppState;

pub mod appstate;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod service;

pub fn router(db: Db) -> Router {
    let app_state = Arc::new(AppState::new(db));

    Router::new()
        .route("/health", get(crate::handlers::health::health))
        .route(
            "/transactions",
            get(crate::handlers::transactions::list_transactions)
                .post(crate::handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/range",
            get(crate::handlers::transactions::transactions_by_range),
        )
        .route(
            "/transactions/summary",
            get(crate::handlers::transactions::summary),
        )
        .route(
            "/transactions/:id",
            put(crate::handlers::transactions::update_transaction)
                .delete(crate::handlers::transactions::delete_transaction),
        )
        .fallback(crate::handlers::path_not_found::handler_404)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(
                    crate::middleware::request_tracing::request_tracing,
                )),
        )
        .with_state(app_state)
}
