use crate::errors::AnalyticsError;
use crate::models::MenuOption;
use chrono::{Datelike, NaiveDate};

/// Fixed window lengths offered to the caller, in days.
pub const SUPPORTED_DAYS: [i64; 12] = [1, 7, 10, 14, 21, 30, 45, 60, 75, 90, 180, 365];

/// Windows shorter than this are plotted with per-day markers.
pub const MARKER_THRESHOLD_DAYS: i64 = 60;

pub const DEFAULT_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChoice {
    Days(i64),
    YearToDate,
}

impl Default for WindowChoice {
    fn default() -> Self {
        Self::Days(DEFAULT_DAYS)
    }
}

impl WindowChoice {
    pub fn from_days(days: i64) -> Result<Self, AnalyticsError> {
        if SUPPORTED_DAYS.contains(&days) {
            Ok(Self::Days(days))
        } else {
            Err(AnalyticsError::invalid_argument(format!(
                "unsupported window of {days} days"
            )))
        }
    }

    /// Accepts a menu value (`30`, `ytd`) or its label (`1M`, `YTD`).
    pub fn parse(raw: &str) -> Result<Self, AnalyticsError> {
        let value = raw.trim();
        if value.eq_ignore_ascii_case("ytd") {
            return Ok(Self::YearToDate);
        }
        if let Ok(days) = value.parse::<i64>() {
            return Self::from_days(days);
        }
        SUPPORTED_DAYS
            .iter()
            .find(|&&days| label_for_days(days).eq_ignore_ascii_case(value))
            .map(|&days| Self::Days(days))
            .ok_or_else(|| AnalyticsError::invalid_argument(format!("unknown window '{value}'")))
    }

    /// Menu order, with year-to-date slotted before the one-year option.
    pub fn menu() -> Vec<Self> {
        let mut choices: Vec<Self> = SUPPORTED_DAYS.iter().map(|&days| Self::Days(days)).collect();
        let year = choices.len() - 1;
        choices.insert(year, Self::YearToDate);
        choices
    }

    /// Window length in days; year-to-date counts days since January 1 and
    /// is never shorter than one day.
    pub fn resolve_days(&self, anchor: NaiveDate) -> i64 {
        match self {
            Self::Days(days) => *days,
            Self::YearToDate => i64::from(anchor.ordinal0()).max(1),
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::Days(days) => days.to_string(),
            Self::YearToDate => "ytd".to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Days(days) => label_for_days(*days),
            Self::YearToDate => "YTD",
        }
    }

    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Days(1) => "24 hours",
            other => other.label(),
        }
    }

    pub fn show_markers(&self, anchor: NaiveDate) -> bool {
        self.resolve_days(anchor) < MARKER_THRESHOLD_DAYS
    }

    pub fn to_option(&self, anchor: NaiveDate) -> MenuOption {
        MenuOption {
            value: self.value(),
            label: self.label().to_string(),
            days: self.resolve_days(anchor),
        }
    }
}

fn label_for_days(days: i64) -> &'static str {
    match days {
        1 => "1D",
        7 => "1W",
        10 => "10D",
        14 => "2W",
        21 => "3W",
        30 => "1M",
        45 => "6W",
        60 => "2M",
        75 => "10W",
        90 => "3M",
        180 => "6M",
        365 => "1Y",
        _ => "custom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_values_and_labels() {
        assert_eq!(WindowChoice::parse("30").unwrap(), WindowChoice::Days(30));
        assert_eq!(WindowChoice::parse(" 2w ").unwrap(), WindowChoice::Days(14));
        assert_eq!(WindowChoice::parse("YTD").unwrap(), WindowChoice::YearToDate);
        assert!(matches!(
            WindowChoice::parse("31"),
            Err(AnalyticsError::InvalidArgument(_))
        ));
        assert!(WindowChoice::parse("fortnight").is_err());
    }

    #[test]
    fn year_to_date_counts_from_january_first() {
        let anchor = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(WindowChoice::YearToDate.resolve_days(anchor), 59);

        let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(WindowChoice::YearToDate.resolve_days(new_year), 1);
    }

    #[test]
    fn menu_places_ytd_before_one_year() {
        let menu = WindowChoice::menu();
        assert_eq!(menu.len(), SUPPORTED_DAYS.len() + 1);
        assert_eq!(menu[menu.len() - 2], WindowChoice::YearToDate);
        assert_eq!(menu[menu.len() - 1], WindowChoice::Days(365));
    }

    #[test]
    fn labels_and_markers() {
        let anchor = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(WindowChoice::Days(1).metric_label(), "24 hours");
        assert_eq!(WindowChoice::Days(45).metric_label(), "6W");
        assert_eq!(WindowChoice::YearToDate.metric_label(), "YTD");
        assert!(WindowChoice::Days(45).show_markers(anchor));
        assert!(!WindowChoice::Days(60).show_markers(anchor));
        assert!(!WindowChoice::YearToDate.show_markers(anchor));
    }
}
