//! Aggregates per-customer totals for the polar-area chart.
//!
//! `ChartData` is the renderer-neutral result: one label and one value per customer. It can be
//! turned into a Chart.js `data` object with `to_chart_js`, or drawn in a terminal with
//! `render_text`.

use crate::model::{Customer, Grouping};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Write;

/// The chart title.
pub const TITLE: &str = "Total Transactions by Customer";

/// The label of the single dataset.
pub const DATASET_LABEL: &str = "Total Amount";

/// Width, in characters, of the longest bar drawn by `render_text`.
const BAR_WIDTH: usize = 40;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Formats the color as a CSS `rgba()` string.
    pub fn rgba(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha)
    }
}

/// The six colors assigned to chart segments by position. Segment `i` uses `PALETTE[i % 6]`, so
/// a customer's color depends on where it lands in the filtered list, not on who it is.
pub const PALETTE: [Rgb; 6] = [
    Rgb(255, 99, 132),
    Rgb(54, 162, 235),
    Rgb(255, 206, 86),
    Rgb(75, 192, 192),
    Rgb(153, 102, 255),
    Rgb(255, 159, 64),
];

const BACKGROUND_ALPHA: f32 = 0.2;
const BORDER_ALPHA: f32 = 1.0;

/// Labels and totals, in the order of the customer list they were built from.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ChartData {
    labels: Vec<String>,
    values: Vec<f64>,
}

/// Builds one segment per customer in `customers`, valued at the sum of that customer's group in
/// `grouping`.
pub fn aggregate(customers: &[&Customer], grouping: &Grouping) -> ChartData {
    let (labels, values) = customers
        .iter()
        .map(|c| (c.name().to_string(), grouping.total(c.id())))
        .unzip();
    ChartData { labels, values }
}

impl ChartData {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The number of segments.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The palette color of segment `index`.
    pub fn color(index: usize) -> Rgb {
        PALETTE[index % PALETTE.len()]
    }

    pub fn background_colors(&self) -> Vec<String> {
        (0..self.len())
            .map(|i| Self::color(i).rgba(BACKGROUND_ALPHA))
            .collect()
    }

    pub fn border_colors(&self) -> Vec<String> {
        (0..self.len())
            .map(|i| Self::color(i).rgba(BORDER_ALPHA))
            .collect()
    }

    /// A Chart.js `data` object for a `polarArea` chart. `NaN` totals serialize as `null`.
    pub fn to_chart_js(&self) -> Value {
        json!({
            "labels": self.labels,
            "datasets": [{
                "label": DATASET_LABEL,
                "data": self.values,
                "backgroundColor": self.background_colors(),
                "borderColor": self.border_colors(),
                "borderWidth": 1,
            }],
        })
    }

    /// Draws the chart as a titled legend with one bar per segment, scaled to the largest positive
    /// total. Negative and `NaN` totals get no bar.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        if self.is_empty() {
            let _ = writeln!(out, "(no data)");
            return out;
        }

        let label_width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = self
            .values
            .iter()
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .fold(0.0_f64, f64::max);

        for (ix, (label, value)) in self.labels.iter().zip(&self.values).enumerate() {
            let bar_len = if max > 0.0 && value.is_finite() && *value > 0.0 {
                ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "{marker} {label:<label_width$}  {bar:<bar_width$}  {amount}",
                bar_width = BAR_WIDTH,
                marker = PALETTE_MARKERS[ix % PALETTE_MARKERS.len()],
                bar = "█".repeat(bar_len),
                amount = format_total(*value),
            );
        }
        out
    }

    /// The chart as CSV with `Customer Name` and `Total Amount` columns.
    pub fn to_csv(&self) -> crate::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Customer Name", DATASET_LABEL])?;
        for (label, value) in self.labels.iter().zip(&self.values) {
            writer.write_record([label.as_str(), value.to_string().as_str()])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Terminal stand-ins for the palette, one per color position.
const PALETTE_MARKERS: [char; 6] = ['●', '■', '▲', '◆', '★', '✚'];

/// Formats a total with thousands separators and two decimals, e.g. `3,000.00`.
fn format_total(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    format_num::format_num!(",.2", value)
}
