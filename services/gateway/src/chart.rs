//! Bar chart renderer for the statistics page
//!
//! Produces a standalone SVG and embeds it in the page as a base64 data URI.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::models::StatisticsSummary;
use crate::utils::{escape_html, thousands, truncate};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 360.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_SIDE: f64 = 60.0;
const BAR_WIDTH: f64 = 160.0;

const PRODUCTION_COLOR: &str = "#2d8659";
const DEMAND_COLOR: &str = "#e74c3c";

/// One bar
#[derive(Debug, Clone, Copy)]
pub struct Bar<'a> {
    pub label: &'a str,
    pub value: f64,
    pub color: &'a str,
}

/// Render bars side by side with value labels
///
/// `threshold` draws a dashed horizontal line at that value.
#[must_use]
pub fn bar_chart_svg(title: &str, bars: &[Bar<'_>], threshold: Option<f64>) -> String {
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = HEIGHT - MARGIN_BOTTOM;
    let max = bars
        .iter()
        .map(|bar| bar.value)
        .chain(threshold)
        .fold(1.0_f64, f64::max)
        * 1.1;
    let scale = |value: f64| (value.max(0.0) / max) * plot_height;

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"##
    );
    let _ = write!(svg, r##"<rect width="100%" height="100%" fill="#f8f9fa"/>"##);
    let _ = write!(
        svg,
        r#"<text x="{}" y="30" text-anchor="middle" font-family="sans-serif" font-size="16" font-weight="bold">{}</text>"#,
        WIDTH / 2.0,
        escape_html(title)
    );
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN_SIDE}" y1="{baseline}" x2="{}" y2="{baseline}" stroke="black"/>"#,
        WIDTH - MARGIN_SIDE
    );

    let slot = (WIDTH - 2.0 * MARGIN_SIDE) / bars.len().max(1) as f64;
    for (i, bar) in bars.iter().enumerate() {
        let height = scale(bar.value);
        let x = MARGIN_SIDE + slot * i as f64 + (slot - BAR_WIDTH) / 2.0;
        let y = baseline - height;
        let center = x + BAR_WIDTH / 2.0;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{BAR_WIDTH}" height="{height:.1}" fill="{}" stroke="black" stroke-width="1.5" fill-opacity="0.8"/>"#,
            bar.color
        );
        let _ = write!(
            svg,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" font-weight="bold">{} Quintals</text>"#,
            y - 6.0,
            thousands(truncate(bar.value))
        );
        let _ = write!(
            svg,
            r#"<text x="{center:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12">{}</text>"#,
            baseline + 20.0,
            escape_html(bar.label)
        );
    }

    if let Some(threshold) = threshold {
        let y = baseline - scale(threshold);
        let _ = write!(
            svg,
            r#"<line x1="{MARGIN_SIDE}" y1="{y:.1}" x2="{}" y2="{y:.1}" stroke="red" stroke-width="2" stroke-dasharray="6,4"/>"#,
            WIDTH - MARGIN_SIDE
        );
    }

    svg.push_str("</svg>");
    svg
}

/// `data:` URI for an `<img src>`
#[must_use]
pub fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Current production vs expected demand
///
/// The demand line is drawn only while production is below demand.
#[must_use]
pub fn statistics_chart(summary: &StatisticsSummary) -> String {
    let title = format!("{} Statistics: Production vs Demand", summary.crop.display_name);
    let bars = [
        Bar {
            label: "Current Production",
            value: summary.current_production,
            color: PRODUCTION_COLOR,
        },
        Bar {
            label: "Expected Demand",
            value: summary.expected_demand,
            color: DEMAND_COLOR,
        },
    ];
    let threshold = (!summary.exceeds_demand).then_some(summary.expected_demand);
    svg_data_uri(&bar_chart_svg(&title, &bars, threshold))
}
