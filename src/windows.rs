use crate::errors::AnalyticsError;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Windows of more than a century are rejected before any date arithmetic.
pub const MAX_WINDOW_DAYS: i64 = 36_600;

/// Number of sub-windows a [`WindowSet`] partitions history into.
const WINDOW_COUNT: i64 = 4;

/// Anything that happened on a calendar day.
pub trait EventDate {
    fn event_date(&self) -> NaiveDate;
}

impl EventDate for NaiveDate {
    fn event_date(&self) -> NaiveDate {
        *self
    }
}

impl<T: EventDate + ?Sized> EventDate for &T {
    fn event_date(&self) -> NaiveDate {
        (**self).event_date()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: u64,
    pub cumulative: u64,
}

/// Gap-free run of days with a running total that starts at the first day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DailySeries {
    points: Vec<DailyPoint>,
}

impl DailySeries {
    /// Lays `counts` out on consecutive days from `start` and scans the
    /// running total across them.
    pub fn from_counts(start: NaiveDate, counts: &[u64]) -> Self {
        let points = counts
            .iter()
            .enumerate()
            .scan(0u64, |running, (offset, &count)| {
                *running = running.saturating_add(count);
                Some(DailyPoint {
                    date: start + Duration::days(offset as i64),
                    count,
                    cumulative: *running,
                })
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[DailyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|point| point.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|point| point.date)
    }

    /// Largest running total, 0 for an empty series.
    pub fn max_cumulative(&self) -> u64 {
        self.points
            .iter()
            .map(|point| point.cumulative)
            .max()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|point| point.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSet {
    pub days: i64,
    pub anchor: NaiveDate,
    /// Every day from `anchor - 4 * days` to `anchor` with one global running total.
    pub full: DailySeries,
    pub current: DailySeries,
    pub previous: DailySeries,
    pub prior_previous: DailySeries,
    pub prior_prior_previous: DailySeries,
}

impl WindowSet {
    /// Sub-windows ordered newest to oldest.
    pub fn windows(&self) -> [&DailySeries; 4] {
        [
            &self.current,
            &self.previous,
            &self.prior_previous,
            &self.prior_prior_previous,
        ]
    }
}

/// Partitions `events` into four back-to-back windows of `days` days ending
/// at `anchor`.
///
/// Window `k` (0 = current) counts the events of
/// `(anchor - (k + 1) * days, anchor - k * days]` and carries one extra
/// leading row for its exclusive lower boundary, so every window has
/// `days + 1` rows and its running total starts from zero. Events outside
/// `[anchor - 4 * days, anchor]` are ignored.
pub fn build_windows<E: EventDate>(
    events: &[E],
    days: i64,
    anchor: NaiveDate,
) -> Result<WindowSet, AnalyticsError> {
    if days < 1 {
        return Err(AnalyticsError::invalid_argument(format!(
            "window length must be at least 1 day, got {days}"
        )));
    }
    if days > MAX_WINDOW_DAYS {
        return Err(AnalyticsError::invalid_argument(format!(
            "window length must be at most {MAX_WINDOW_DAYS} days, got {days}"
        )));
    }

    let span = days * WINDOW_COUNT;
    let start = anchor.checked_sub_signed(Duration::days(span)).ok_or_else(|| {
        AnalyticsError::invalid_argument(format!(
            "{days} day windows before {anchor} fall off the calendar"
        ))
    })?;

    // Skeleton of every day in [start, anchor] with the per-day event counts
    // left-joined onto it.
    let mut counts = vec![0u64; (span + 1) as usize];
    for event in events {
        let offset = (event.event_date() - start).num_days();
        if (0..=span).contains(&offset) {
            counts[offset as usize] += 1;
        }
    }

    let slice = |newest_first_index: i64| -> DailySeries {
        let lo = (WINDOW_COUNT - newest_first_index - 1) * days;
        let hi = lo + days;
        let mut window = counts[lo as usize..=hi as usize].to_vec();
        // The lower boundary day is counted by the next older window.
        window[0] = 0;
        DailySeries::from_counts(start + Duration::days(lo), &window)
    };

    Ok(WindowSet {
        days,
        anchor,
        full: DailySeries::from_counts(start, &counts),
        current: slice(0),
        previous: slice(1),
        prior_previous: slice(2),
        prior_prior_previous: slice(3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_well_formed(series: &DailySeries) {
        let mut running = 0;
        for (index, point) in series.points().iter().enumerate() {
            running += point.count;
            assert_eq!(point.cumulative, running, "cumulative mismatch at row {index}");
            if index > 0 {
                let prev = series.points()[index - 1].date;
                assert_eq!(point.date - prev, Duration::days(1));
            }
        }
    }

    #[test]
    fn windows_have_days_plus_one_consecutive_rows() {
        let anchor = date(2026, 3, 15);
        let events = vec![date(2026, 3, 1), date(2026, 2, 20)];
        for days in [1, 7, 30, 365] {
            let set = build_windows(&events, days, anchor).unwrap();
            for window in set.windows() {
                assert_eq!(window.len(), days as usize + 1);
                assert_well_formed(window);
            }
            assert_eq!(set.full.len(), 4 * days as usize + 1);
            assert_well_formed(&set.full);
        }
    }

    #[test]
    fn windows_are_contiguous_newest_to_oldest() {
        let anchor = date(2026, 3, 15);
        let set = build_windows::<NaiveDate>(&[], 7, anchor).unwrap();

        assert_eq!(set.current.last_date(), Some(anchor));
        assert_eq!(set.current.first_date(), Some(date(2026, 3, 8)));
        assert_eq!(set.previous.last_date(), Some(date(2026, 3, 8)));
        assert_eq!(set.previous.first_date(), Some(date(2026, 3, 1)));
        assert_eq!(set.prior_previous.first_date(), Some(date(2026, 2, 22)));
        assert_eq!(set.prior_prior_previous.first_date(), Some(date(2026, 2, 15)));
        assert_eq!(set.full.first_date(), Some(date(2026, 2, 15)));
    }

    #[test]
    fn boundary_day_counts_toward_older_window() {
        let anchor = date(2026, 3, 15);
        let boundary = date(2026, 3, 8);
        let set = build_windows(&[boundary, boundary], 7, anchor).unwrap();

        assert_eq!(set.current.points()[0].date, boundary);
        assert_eq!(set.current.points()[0].count, 0);
        assert_eq!(set.current.max_cumulative(), 0);
        assert_eq!(set.previous.points().last().unwrap().count, 2);
        assert_eq!(set.previous.max_cumulative(), 2);
    }

    #[test]
    fn cumulative_restarts_in_each_window() {
        let anchor = date(2026, 1, 31);
        let events: Vec<NaiveDate> = (0..40).map(|offset| anchor - Duration::days(offset)).collect();
        let set = build_windows(&events, 10, anchor).unwrap();

        assert_eq!(set.current.max_cumulative(), 10);
        assert_eq!(set.previous.max_cumulative(), 10);
        assert_eq!(set.prior_previous.max_cumulative(), 10);
        assert_eq!(set.prior_prior_previous.max_cumulative(), 10);
        assert_eq!(set.full.max_cumulative(), 40);
        for window in set.windows() {
            assert_eq!(window.points()[0].cumulative, 0);
            assert_well_formed(window);
        }
    }

    #[test]
    fn events_outside_range_are_ignored() {
        let anchor = date(2026, 3, 15);
        let events = vec![date(2026, 3, 16), date(2025, 1, 1), date(2026, 3, 15)];
        let set = build_windows(&events, 7, anchor).unwrap();
        assert_eq!(set.full.total(), 1);
        assert_eq!(set.current.total(), 1);
    }

    #[test]
    fn empty_events_produce_zeroed_skeleton() {
        let anchor = date(2026, 3, 15);
        let set = build_windows::<NaiveDate>(&[], 30, anchor).unwrap();
        for window in set.windows() {
            assert_eq!(window.len(), 31);
            assert!(window.points().iter().all(|p| p.count == 0 && p.cumulative == 0));
        }
    }

    #[test]
    fn build_is_repeatable() {
        let anchor = date(2026, 3, 15);
        let events = vec![date(2026, 3, 10), date(2026, 3, 2), date(2026, 2, 27)];
        let first = build_windows(&events, 5, anchor).unwrap();
        let second = build_windows(&events, 5, anchor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_positive_days() {
        let anchor = date(2026, 3, 15);
        for days in [0, -3] {
            let err = build_windows::<NaiveDate>(&[], days, anchor).unwrap_err();
            assert!(matches!(err, AnalyticsError::InvalidArgument(_)));
        }
    }

    #[test]
    fn series_from_counts_scans_running_total() {
        let series = DailySeries::from_counts(date(2026, 1, 1), &[2, 0, 3]);
        let cumulative: Vec<u64> = series.points().iter().map(|p| p.cumulative).collect();
        assert_eq!(cumulative, vec![2, 2, 5]);
        assert_eq!(series.last_date(), Some(date(2026, 1, 3)));
        assert_eq!(series.total(), 5);
    }
}
