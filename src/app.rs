use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/options", get(handlers::get_options))
        .route("/api/windows", get(handlers::get_windows))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/refresh", get(handlers::get_refresh_plans))
        .route("/api/records", post(handlers::ingest_records))
        .with_state(state)
}
