//! Assembles the onboarding cards and appointment tabs for one window choice.

use crate::appointments::{
    practitioners, summarize_all_time, summarize_appointments, AllTimeSummary, AppointmentSummary,
};
use crate::compare::{combine, CombinedPoint};
use crate::errors::AnalyticsError;
use crate::models::AppData;
use crate::periods::WindowChoice;
use crate::windows::{build_windows, DailySeries};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct WindowSummary {
    pub value: String,
    pub label: String,
    pub metric_label: String,
    pub days: i64,
    pub show_markers: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonCard {
    pub title: String,
    /// Later window total, or 0 when neither window saw an onboarding.
    pub value: u64,
    pub delta_pct: f64,
    pub is_positive: bool,
    pub series: Vec<CombinedPoint>,
}

impl ComparisonCard {
    fn empty(title: String) -> Self {
        Self {
            title,
            value: 0,
            delta_pct: 0.0,
            is_positive: true,
            series: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentTab {
    pub name: String,
    pub practitioner_id: Option<String>,
    pub summary: AppointmentSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub anchor: NaiveDate,
    pub window: Option<WindowSummary>,
    pub onboarding: Vec<ComparisonCard>,
    pub appointments: Vec<AppointmentTab>,
    pub all_time: Option<AllTimeSummary>,
}

/// Builds the dashboard for `choice`, or the all-time view when no window
/// was picked.
pub fn build_dashboard(
    data: &AppData,
    choice: Option<WindowChoice>,
    anchor: NaiveDate,
) -> Result<DashboardResponse, AnalyticsError> {
    let Some(choice) = choice else {
        return Ok(DashboardResponse {
            anchor,
            window: None,
            onboarding: Vec::new(),
            appointments: Vec::new(),
            all_time: summarize_all_time(&data.appointments, anchor),
        });
    };

    let days = choice.resolve_days(anchor);
    let window = WindowSummary {
        value: choice.value(),
        label: choice.label().to_string(),
        metric_label: choice.metric_label().to_string(),
        days,
        show_markers: choice.show_markers(anchor),
    };

    let windows = build_windows(&data.clients, days, anchor)?;
    let doubled_days = days.saturating_mul(2);
    let doubled = build_windows(&data.clients, doubled_days, anchor)?;

    let onboarding = vec![
        comparison_card("current".to_string(), &windows.current, &windows.previous),
        comparison_card("previous".to_string(), &windows.previous, &windows.prior_previous),
        comparison_card(
            format!("Onboarded last {} days", doubled_days * 2),
            &doubled.current,
            &doubled.previous,
        ),
    ];

    Ok(DashboardResponse {
        anchor,
        window: Some(window),
        onboarding,
        appointments: appointment_tabs(data, days, anchor),
        all_time: None,
    })
}

fn comparison_card(title: String, later: &DailySeries, earlier: &DailySeries) -> ComparisonCard {
    match combine(later, earlier) {
        Ok(result) => {
            let value = if result.has_events() { result.current_total } else { 0 };
            ComparisonCard {
                title,
                value,
                delta_pct: result.delta_pct,
                is_positive: result.is_positive,
                series: result.combined,
            }
        }
        Err(err) => {
            warn!(card = %title, "showing empty card: {err}");
            ComparisonCard::empty(title)
        }
    }
}

fn appointment_tabs(data: &AppData, days: i64, anchor: NaiveDate) -> Vec<AppointmentTab> {
    let mut tabs = vec![AppointmentTab {
        name: "Total".to_string(),
        practitioner_id: None,
        summary: summarize_appointments(&data.appointments, days, anchor, None),
    }];

    for (index, id) in practitioners(&data.appointments).into_iter().enumerate() {
        tabs.push(AppointmentTab {
            name: format!("Practitioner{}", index + 1),
            summary: summarize_appointments(&data.appointments, days, anchor, Some(&id)),
            practitioner_id: Some(id),
        });
    }

    tabs
}
