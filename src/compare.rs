use crate::errors::AnalyticsError;
use crate::windows::DailySeries;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Previous,
    Current,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPoint {
    pub date: NaiveDate,
    pub count: u64,
    /// Running total within the point's own window.
    pub cumulative: u64,
    pub period: Period,
    pub combined_cumulative: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub combined: Vec<CombinedPoint>,
    pub current_total: u64,
    pub previous_total: u64,
    pub delta_pct: f64,
    pub is_positive: bool,
}

impl ComparisonResult {
    pub fn points_for(&self, period: Period) -> impl Iterator<Item = &CombinedPoint> {
        self.combined.iter().filter(move |point| point.period == period)
    }

    /// Whether any day across both windows recorded an event.
    pub fn has_events(&self) -> bool {
        self.combined
            .last()
            .is_some_and(|point| point.combined_cumulative > 0)
    }
}

/// Period-over-period change as a signed fraction.
///
/// A zero baseline yields 0.0 when the later value is also zero and a 1.0
/// sentinel otherwise.
pub fn calc_delta(later: f64, earlier: f64) -> f64 {
    if earlier == 0.0 {
        if later == 0.0 { 0.0 } else { 1.0 }
    } else {
        (later - earlier) / earlier
    }
}

/// Joins `earlier` and `later` into one overlay series.
///
/// The later window gets a synthetic zero row dated on the earlier window's
/// second-to-last day and the earlier window loses its final day, so the
/// two plotted lines meet end to end.
pub fn combine(later: &DailySeries, earlier: &DailySeries) -> Result<ComparisonResult, AnalyticsError> {
    let earlier_points = earlier.points();
    if earlier_points.len() < 2 {
        return Err(AnalyticsError::insufficient_data(format!(
            "earlier window needs at least 2 days, got {}",
            earlier_points.len()
        )));
    }

    let current_total = later.max_cumulative();
    let previous_total = earlier.max_cumulative();
    let delta_pct = calc_delta(current_total as f64, previous_total as f64);

    let (kept, _) = earlier_points.split_at(earlier_points.len() - 1);
    let origin = kept[kept.len() - 1].date;

    let previous_rows = kept
        .iter()
        .map(|point| (point.date, point.count, point.cumulative, Period::Previous));
    let current_rows = std::iter::once((origin, 0, 0, Period::Current)).chain(
        later
            .points()
            .iter()
            .map(|point| (point.date, point.count, point.cumulative, Period::Current)),
    );

    let combined = previous_rows
        .chain(current_rows)
        .scan(0u64, |running, (date, count, cumulative, period)| {
            *running = running.saturating_add(count);
            Some(CombinedPoint {
                date,
                count,
                cumulative,
                period,
                combined_cumulative: *running,
            })
        })
        .collect();

    Ok(ComparisonResult {
        combined,
        current_total,
        previous_total,
        delta_pct,
        is_positive: delta_pct >= 0.0,
    })
}
