use crate::compare::{CombinedPoint, Period};
use crate::dashboard::{AppointmentTab, ComparisonCard, DashboardResponse};
use crate::periods::WindowChoice;
use html_escape::encode_text;
use std::fmt::Write;

const CHART_WIDTH: f64 = 220.0;
const CHART_HEIGHT: f64 = 90.0;
const GAIN_COLOR: &str = "rgb(21, 130, 55)";
const LOSS_COLOR: &str = "rgb(255, 43, 43)";
const PREVIOUS_COLOR: &str = "lightgrey";

pub fn render_index(dashboard: &DashboardResponse, menu: &[WindowChoice]) -> String {
    let selected = dashboard.window.as_ref().map(|window| window.value.as_str());
    let show_markers = dashboard.window.as_ref().is_some_and(|window| window.show_markers);

    let heading = match &dashboard.window {
        Some(window) => format!("Onboarding Analysis <strong>{}</strong>", encode_text(&window.metric_label)),
        None => "All Time".to_string(),
    };

    INDEX_HTML
        .replace("{{ANCHOR}}", &dashboard.anchor.format("%a %b %d, %Y").to_string())
        .replace("{{MENU}}", &render_menu(menu, selected))
        .replace("{{APPOINTMENTS}}", &render_appointments(dashboard))
        .replace("{{HEADING}}", &heading)
        .replace("{{CARDS}}", &render_cards(&dashboard.onboarding, show_markers))
}

fn render_menu(menu: &[WindowChoice], selected: Option<&str>) -> String {
    let mut html = String::new();
    for choice in menu {
        let value = choice.value();
        let class = if selected == Some(value.as_str()) { "pill active" } else { "pill" };
        let _ = write!(html, r#"<a class="{class}" href="/?days={value}">{}</a>"#, choice.label());
    }
    let class = if selected.is_none() { "pill active" } else { "pill" };
    let _ = write!(html, r#"<a class="{class}" href="/?days=all">All</a>"#);
    html
}

fn render_appointments(dashboard: &DashboardResponse) -> String {
    if let Some(all_time) = &dashboard.all_time {
        return format!(
            r#"<p class="range">{} to {}</p><div class="metrics">{}{}{}</div>"#,
            all_time.first_date.format("%a %b %d, %Y"),
            all_time.last_date.format("%a %b %d, %Y"),
            metric("New appointments", &millify(all_time.new_appointments as f64, 2), None),
            metric("Follow-ups", &millify(all_time.follow_ups as f64, 2), None),
            metric("Revenue", &format!("${}", millify(all_time.revenue, 1)), None),
        );
    }

    dashboard.appointments.iter().map(render_tab).collect()
}

fn render_tab(tab: &AppointmentTab) -> String {
    let summary = &tab.summary;
    format!(
        r#"<section class="tab"><h3>{}</h3><div class="metrics">{}{}{}</div></section>"#,
        encode_text(&tab.name),
        metric(
            "New appointments",
            &millify(summary.new_this_period as f64, 2),
            Some(summary.delta_new_pct),
        ),
        metric(
            "Follow-ups",
            &millify(summary.follow_ups_this_period as f64, 2),
            Some(summary.delta_follow_ups_pct),
        ),
        metric(
            "Revenue",
            &format!("${}", millify(summary.revenue_this_period, 1)),
            Some(summary.delta_revenue_pct),
        ),
    )
}

fn render_cards(cards: &[ComparisonCard], show_markers: bool) -> String {
    cards
        .iter()
        .map(|card| {
            let chart = if card.value > 0 { render_chart(card, show_markers) } else { String::new() };
            format!(
                r#"<div class="card">{}{chart}</div>"#,
                metric(&card.title, &card.value.to_string(), Some(card.delta_pct))
            )
        })
        .collect()
}

fn metric(label: &str, value: &str, delta: Option<f64>) -> String {
    let delta = match delta {
        Some(delta) => {
            let class = if delta >= 0.0 { "delta up" } else { "delta down" };
            format!(r#"<span class="{class}">{}</span>"#, format_delta(delta))
        }
        None => String::new(),
    };
    format!(
        r#"<div class="metric"><span class="label">{}</span><span class="value">{}</span>{delta}</div>"#,
        encode_text(label),
        encode_text(value)
    )
}

/// Overlays both periods' running totals on one shared date axis.
fn render_chart(card: &ComparisonCard, show_markers: bool) -> String {
    let points = &card.series;
    let max_y = points.iter().map(|p| p.cumulative).max().unwrap_or(0).max(1) as f64;
    let step = CHART_WIDTH / (points.len().saturating_sub(1).max(1)) as f64;
    let coords = |index: usize, point: &CombinedPoint| {
        let x = index as f64 * step;
        let y = CHART_HEIGHT - point.cumulative as f64 / max_y * CHART_HEIGHT;
        (x, y)
    };

    let current_color = if card.is_positive { GAIN_COLOR } else { LOSS_COLOR };
    let mut svg = format!(
        r#"<svg class="chart" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" preserveAspectRatio="none">"#
    );
    for (period, color) in [(Period::Previous, PREVIOUS_COLOR), (Period::Current, current_color)] {
        let line: Vec<String> = points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.period == period)
            .map(|(index, point)| {
                let (x, y) = coords(index, point);
                format!("{x:.1},{y:.1}")
            })
            .collect();
        let _ = write!(
            svg,
            r#"<polyline fill="none" stroke="{color}" stroke-width="2" points="{}" />"#,
            line.join(" ")
        );
    }

    if show_markers {
        for (index, point) in points.iter().enumerate().filter(|(_, p)| p.count > 0) {
            let (x, y) = coords(index, point);
            let _ = write!(
                svg,
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="2" fill="white" stroke="grey"><title>Period Total: {} / Onboarded: {} / {}</title></circle>"#,
                point.cumulative,
                point.count,
                point.date.format("%B %d, %Y")
            );
        }
    }

    svg.push_str("</svg>");
    svg
}

pub fn format_delta(delta: f64) -> String {
    format!("{:.1}%", delta * 100.0)
}

/// Shortens large numbers: 1234 -> "1.23k".
pub fn millify(value: f64, precision: usize) -> String {
    const UNITS: [&str; 5] = ["", "k", "M", "B", "T"];
    let mut scaled = value;
    let mut unit = 0;
    while scaled.abs() >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }
    let text = format!("{scaled:.precision$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    format!("{text}{}", UNITS[unit])
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Cumulative Onboarding</title>
  <style>
    body {
      margin: 0;
      padding: 32px 18px 48px;
      font-family: "Trebuchet MS", sans-serif;
      color: #2b2a28;
      background: #f8f3e6;
    }

    .app {
      max-width: 1100px;
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .pills {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .pill {
      padding: 4px 12px;
      border-radius: 999px;
      border: 1px solid #c9c2b5;
      color: inherit;
      text-decoration: none;
    }

    .pill.active {
      background: #2f4858;
      color: white;
    }

    .metrics,
    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .metric {
      display: grid;
      gap: 4px;
    }

    .label {
      font-size: 0.85rem;
      color: #5f5c57;
    }

    .value {
      font-size: 1.8rem;
    }

    .delta.up {
      color: rgb(21, 130, 55);
    }

    .delta.down {
      color: rgb(255, 43, 43);
    }

    .chart {
      width: 220px;
      height: 90px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Performance Metrics Overview</h1>
      <p>{{ANCHOR}}</p>
    </header>
    <nav class="pills">{{MENU}}</nav>
    <section>{{APPOINTMENTS}}</section>
    <section>
      <h2>{{HEADING}}</h2>
      <div class="cards">{{CARDS}}</div>
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millify_shortens_thousands() {
        assert_eq!(millify(950.0, 2), "950");
        assert_eq!(millify(1234.0, 2), "1.23k");
        assert_eq!(millify(2_500_000.0, 1), "2.5M");
    }

    #[test]
    fn delta_renders_as_percent() {
        assert_eq!(format_delta(-0.5), "-50.0%");
        assert_eq!(format_delta(1.0), "100.0%");
    }
}
