use crate::dashboard::{build_dashboard, DashboardResponse};
use crate::errors::AppError;
use crate::models::{AppData, MenuOption, MergeSummary, WindowQuery, WindowsResponse};
use crate::periods::WindowChoice;
use crate::state::AppState;
use crate::storage::{ingest_batch, refresh_plans, RefreshPlans};
use crate::ui::render_index;
use crate::windows::build_windows;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::NaiveDate;
use tracing::info;

/// `days=all` asks for the all-time view.
const ALL_TIME: &str = "all";

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Html<String>, AppError> {
    let anchor = anchor_for(&state, &query);
    let choice = match query.days.as_deref() {
        None => Some(WindowChoice::default()),
        Some(raw) => parse_choice(raw)?,
    };

    let data = state.data.lock().await;
    let dashboard = build_dashboard(&data, choice, anchor)?;
    Ok(Html(render_index(&dashboard, &WindowChoice::menu())))
}

pub async fn get_options(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Json<Vec<MenuOption>> {
    let anchor = anchor_for(&state, &query);
    Json(
        WindowChoice::menu()
            .iter()
            .map(|choice| choice.to_option(anchor))
            .collect(),
    )
}

pub async fn get_windows(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowsResponse>, AppError> {
    let anchor = anchor_for(&state, &query);
    let choice = match query.days.as_deref() {
        None => WindowChoice::default(),
        Some(raw) => WindowChoice::parse(raw)?,
    };

    let data = state.data.lock().await;
    let windows = build_windows(&data.clients, choice.resolve_days(anchor), anchor)?;
    Ok(Json(WindowsResponse {
        window: choice.value(),
        label: choice.label().to_string(),
        windows,
    }))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let anchor = anchor_for(&state, &query);
    let choice = match query.days.as_deref() {
        None => None,
        Some(raw) => parse_choice(raw)?,
    };

    let data = state.data.lock().await;
    Ok(Json(build_dashboard(&data, choice, anchor)?))
}

pub async fn get_refresh_plans(State(state): State<AppState>) -> Json<RefreshPlans> {
    let today = state.config.today();
    let data = state.data.lock().await;
    Json(refresh_plans(&data, today))
}

pub async fn ingest_records(
    State(state): State<AppState>,
    Json(batch): Json<AppData>,
) -> Result<Json<MergeSummary>, AppError> {
    let mut data = state.data.lock().await;
    let summary = ingest_batch(&state.config.data_path, &mut data, batch).await?;
    info!(
        new_clients = summary.new_clients,
        new_appointments = summary.new_appointments,
        "merged record batch"
    );

    Ok(Json(summary))
}

fn parse_choice(raw: &str) -> Result<Option<WindowChoice>, AppError> {
    if raw.trim().eq_ignore_ascii_case(ALL_TIME) {
        return Ok(None);
    }
    Ok(Some(WindowChoice::parse(raw)?))
}

fn anchor_for(state: &AppState, query: &WindowQuery) -> NaiveDate {
    query.anchor.unwrap_or_else(|| state.config.today())
}
