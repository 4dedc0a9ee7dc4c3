use crate::errors::AppError;
use crate::models::{AppData, MergeSummary};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/records.json"))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(data) => {
                info!(
                    clients = data.clients.len(),
                    appointments = data.appointments.len(),
                    "loaded record cache"
                );
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Appends the records in `batch` that the cache doesn't already hold.
/// Clients are keyed by `client_id`, appointments by `id`.
pub fn merge_records(data: &mut AppData, batch: AppData) -> MergeSummary {
    let mut known_clients: HashSet<u64> = data.clients.iter().map(|c| c.client_id).collect();
    let mut known_appointments: HashSet<String> = data.appointments.iter().map(|a| a.id.clone()).collect();

    let mut summary = MergeSummary::default();
    for client in batch.clients {
        if known_clients.insert(client.client_id) {
            data.clients.push(client);
            summary.new_clients += 1;
        }
    }
    for appointment in batch.appointments {
        if known_appointments.insert(appointment.id.clone()) {
            data.appointments.push(appointment);
            summary.new_appointments += 1;
        }
    }

    summary.total_clients = data.clients.len();
    summary.total_appointments = data.appointments.len();
    summary
}

/// Merges `batch` into a copy of `data`, writes the copy, and only then
/// swaps it in, so a failed write leaves the cache as it was and a retry
/// sees the same records as new.
pub async fn ingest_batch(path: &Path, data: &mut AppData, batch: AppData) -> Result<MergeSummary, AppError> {
    let mut updated = data.clone();
    let summary = merge_records(&mut updated, batch);

    if summary.new_clients > 0 || summary.new_appointments > 0 {
        persist_data(path, &updated).await?;
        *data = updated;
    }
    Ok(summary)
}

/// What the upstream fetcher should request next for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshPlan {
    UpToDate,
    FetchSince { start: NaiveDate, end: NaiveDate },
    FullHistory { end: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshPlans {
    pub clients: RefreshPlan,
    pub appointments: RefreshPlan,
}

/// Refetches from one day before the newest cached record so late edits on
/// that day are picked up; the merge drops the overlap.
pub fn refresh_plan(newest: Option<NaiveDate>, today: NaiveDate) -> RefreshPlan {
    match newest {
        None => RefreshPlan::FullHistory { end: today },
        Some(newest) if newest >= today => RefreshPlan::UpToDate,
        Some(newest) => match newest.checked_sub_signed(Duration::days(1)) {
            Some(start) => RefreshPlan::FetchSince { start, end: today },
            None => RefreshPlan::FullHistory { end: today },
        },
    }
}

pub fn refresh_plans(data: &AppData, today: NaiveDate) -> RefreshPlans {
    let newest_client = data.clients.iter().map(|c| c.date_created).max();
    let newest_appointment = data.appointments.iter().map(|a| a.date.date()).max();
    RefreshPlans {
        clients: refresh_plan(newest_client, today),
        appointments: refresh_plan(newest_appointment, today),
    }
}
