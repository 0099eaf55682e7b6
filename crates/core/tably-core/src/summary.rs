//! Numeric column summaries
//!
//! The conventional five-number-plus-mean summary (count, mean, std, min,
//! quartiles, max) over every numeric column of a table, rendered as
//! human-readable text for the analysis prompt.

use crate::table::{format_number, Cell, Table};

/// Summary statistics for one numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Column name
    pub name: String,
    /// Number of non-null values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (NaN when count < 2)
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// First quartile, linearly interpolated
    pub q25: f64,
    /// Median
    pub median: f64,
    /// Third quartile, linearly interpolated
    pub q75: f64,
    /// Maximum
    pub max: f64,
}

/// Summarize every numeric column of the table. Nulls are excluded from all
/// statistics; non-numeric columns are skipped entirely.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .filter(|col| col.is_numeric())
        .map(|col| {
            let mut values: Vec<f64> = col
                .cells
                .iter()
                .filter_map(|c| match c {
                    Cell::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            values.sort_by(|a, b| a.total_cmp(b));
            summarize(&col.name, &values)
        })
        .collect()
}

fn summarize(name: &str, sorted: &[f64]) -> ColumnSummary {
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        f64::NAN
    };

    ColumnSummary {
        name: name.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q75: quantile(sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Linearly interpolated quantile over a sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Render the numeric summaries as human-readable text, one block per column
pub fn render_describe(table: &Table) -> String {
    let summaries = describe(table);
    if summaries.is_empty() {
        return "(no numeric columns)".to_string();
    }

    let mut out = String::new();
    for (i, s) in summaries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&s.name);
        out.push('\n');
        let stats = [
            ("count", s.count.to_string()),
            ("mean", format_stat(s.mean)),
            ("std", format_stat(s.std)),
            ("min", format_stat(s.min)),
            ("25%", format_stat(s.q25)),
            ("50%", format_stat(s.median)),
            ("75%", format_stat(s.q75)),
            ("max", format_stat(s.max)),
        ];
        for (label, value) in stats {
            out.push_str(&format!("  {:<5}  {}\n", label, value));
        }
    }
    out
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format_number(v)
    }
}
