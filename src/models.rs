use crate::windows::EventDate;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientRecord {
    pub client_id: u64,
    pub date_created: NaiveDate,
}

impl EventDate for ClientRecord {
    fn event_date(&self) -> NaiveDate {
        self.date_created
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    pub id: String,
    pub date: NaiveDateTime,
    pub status: String,
    #[serde(default)]
    pub cancellation_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub price: f64,
    pub service_id: String,
    pub client_id: u64,
    #[serde(default)]
    pub practitioner_id: Option<String>,
}

/// Local cache of everything fetched from the scheduling platform.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub new_clients: usize,
    pub new_appointments: usize,
    pub total_clients: usize,
    pub total_appointments: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct WindowQuery {
    pub days: Option<String>,
    pub anchor: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MenuOption {
    pub value: String,
    pub label: String,
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct WindowsResponse {
    pub window: String,
    pub label: String,
    #[serde(flatten)]
    pub windows: crate::windows::WindowSet,
}
