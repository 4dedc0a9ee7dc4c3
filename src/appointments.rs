use crate::compare::calc_delta;
use crate::models::AppointmentRecord;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Service booked for returning clients; every other service is a new appointment.
pub const FOLLOW_UP_SERVICE_ID: &str = "1efe2465-4741-48c8-8408-114818cdce74";

const CONFIRMED: &str = "Confirmed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentSummary {
    pub new_this_period: usize,
    pub new_last_period: usize,
    pub follow_ups_this_period: usize,
    pub follow_ups_last_period: usize,
    pub revenue_this_period: f64,
    pub revenue_last_period: f64,
    pub delta_new_pct: f64,
    pub delta_follow_ups_pct: f64,
    pub delta_revenue_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllTimeSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub days: i64,
    pub new_appointments: usize,
    pub follow_ups: usize,
    pub revenue: f64,
}

#[derive(Default)]
struct Tally {
    new: usize,
    follow_ups: usize,
    revenue: f64,
}

impl Tally {
    fn add(&mut self, appointment: &AppointmentRecord) {
        if appointment.service_id == FOLLOW_UP_SERVICE_ID {
            self.follow_ups += 1;
        } else {
            self.new += 1;
        }
        self.revenue += appointment.price;
    }
}

pub fn is_billable(appointment: &AppointmentRecord) -> bool {
    appointment.cancellation_date.is_none() && appointment.status == CONFIRMED
}

/// Compares confirmed appointments on or after `anchor - days` with the
/// `days` before that. Bookings later than `anchor` count toward this period.
pub fn summarize_appointments(
    appointments: &[AppointmentRecord],
    days: i64,
    anchor: NaiveDate,
    practitioner: Option<&str>,
) -> AppointmentSummary {
    let this_start = anchor - Duration::days(days);
    let last_start = anchor - Duration::days(days.saturating_mul(2));

    let mut this_period = Tally::default();
    let mut last_period = Tally::default();
    for appointment in appointments
        .iter()
        .filter(|appointment| is_billable(appointment))
        .filter(|appointment| match practitioner {
            Some(id) => appointment.practitioner_id.as_deref() == Some(id),
            None => true,
        })
    {
        let date = appointment.date.date();
        if date >= this_start {
            this_period.add(appointment);
        } else if date >= last_start {
            last_period.add(appointment);
        }
    }

    AppointmentSummary {
        new_this_period: this_period.new,
        new_last_period: last_period.new,
        follow_ups_this_period: this_period.follow_ups,
        follow_ups_last_period: last_period.follow_ups,
        revenue_this_period: this_period.revenue,
        revenue_last_period: last_period.revenue,
        delta_new_pct: calc_delta(this_period.new as f64, last_period.new as f64),
        delta_follow_ups_pct: calc_delta(this_period.follow_ups as f64, last_period.follow_ups as f64),
        delta_revenue_pct: calc_delta(this_period.revenue, last_period.revenue),
    }
}

/// Totals since the earliest cached appointment, or `None` for an empty cache.
pub fn summarize_all_time(appointments: &[AppointmentRecord], anchor: NaiveDate) -> Option<AllTimeSummary> {
    let first_date = appointments.iter().map(|a| a.date.date()).min()?;
    let last_date = appointments.iter().map(|a| a.date.date()).max()?;
    let days = (anchor - first_date).num_days().max(0);
    let summary = summarize_appointments(appointments, days, anchor, None);

    Some(AllTimeSummary {
        first_date,
        last_date,
        days,
        new_appointments: summary.new_this_period,
        follow_ups: summary.follow_ups_this_period,
        revenue: summary.revenue_this_period,
    })
}

/// Distinct practitioners in the cache, sorted.
pub fn practitioners(appointments: &[AppointmentRecord]) -> Vec<String> {
    let mut ids: Vec<String> = appointments
        .iter()
        .filter_map(|appointment| appointment.practitioner_id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn appointment(id: &str, date: &str, service_id: &str, price: f64) -> AppointmentRecord {
        AppointmentRecord {
            id: id.to_string(),
            date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M").unwrap(),
            status: CONFIRMED.to_string(),
            cancellation_date: None,
            price,
            service_id: service_id.to_string(),
            client_id: 1,
            practitioner_id: Some("dr-a".to_string()),
        }
    }

    #[test]
    fn splits_new_and_follow_up_by_period() {
        let anchor = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();
        let appointments = vec![
            appointment("1", "2026-05-30 09:00", "intake", 200.0),
            appointment("2", "2026-05-20 09:00", FOLLOW_UP_SERVICE_ID, 120.0),
            appointment("3", "2026-06-02 09:00", "intake", 200.0),
            appointment("4", "2026-04-25 09:00", "intake", 180.0),
            appointment("5", "2026-03-01 09:00", "intake", 999.0),
        ];

        let summary = summarize_appointments(&appointments, 30, anchor, None);
        assert_eq!(summary.new_this_period, 2);
        assert_eq!(summary.follow_ups_this_period, 1);
        assert_eq!(summary.new_last_period, 1);
        assert_eq!(summary.follow_ups_last_period, 0);
        assert_eq!(summary.revenue_this_period, 520.0);
        assert_eq!(summary.revenue_last_period, 180.0);
        assert_eq!(summary.delta_new_pct, 1.0);
        assert_eq!(summary.delta_follow_ups_pct, 1.0);
    }

    #[test]
    fn skips_cancelled_and_unconfirmed() {
        let anchor = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();
        let mut cancelled = appointment("1", "2026-05-30 09:00", "intake", 200.0);
        cancelled.cancellation_date = Some(cancelled.date);
        let mut pending = appointment("2", "2026-05-30 10:00", "intake", 200.0);
        pending.status = "Pending".to_string();

        let summary = summarize_appointments(&[cancelled, pending], 30, anchor, None);
        assert_eq!(summary.new_this_period, 0);
        assert_eq!(summary.revenue_this_period, 0.0);
        assert_eq!(summary.delta_revenue_pct, 0.0);
    }

    #[test]
    fn filters_by_practitioner() {
        let anchor = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();
        let mut other = appointment("2", "2026-05-29 09:00", "intake", 90.0);
        other.practitioner_id = Some("dr-b".to_string());
        let appointments = vec![appointment("1", "2026-05-30 09:00", "intake", 200.0), other];

        let summary = summarize_appointments(&appointments, 7, anchor, Some("dr-b"));
        assert_eq!(summary.new_this_period, 1);
        assert_eq!(summary.revenue_this_period, 90.0);
        assert_eq!(practitioners(&appointments), vec!["dr-a".to_string(), "dr-b".to_string()]);
    }

    #[test]
    fn all_time_covers_every_appointment() {
        let anchor = NaiveDate::from_ymd_opt(2026, 5, 31).unwrap();
        let appointments = vec![
            appointment("1", "2025-01-10 09:00", "intake", 100.0),
            appointment("2", "2026-05-30 09:00", FOLLOW_UP_SERVICE_ID, 50.0),
        ];

        let summary = summarize_all_time(&appointments, anchor).unwrap();
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(summary.new_appointments, 1);
        assert_eq!(summary.follow_ups, 1);
        assert_eq!(summary.revenue, 150.0);
        assert!(summarize_all_time(&[], anchor).is_none());
    }
}
