//! CSV downloads of a screen's filtered rows.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

/// A row that can be written to a CSV download.
pub trait CsvRow {
    /// Column titles after the leading serial-number column.
    const HEADER: &'static [&'static str];

    fn csv_fields(&self) -> Vec<String>;
}

/// Quote a field when it would otherwise break the row.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let line: Vec<String> = fields.into_iter().map(|f| escape(&f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Header plus one line per row, numbered from 1.
pub fn render<T: CsvRow>(rows: &[T]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        std::iter::once("S.No".to_string()).chain(T::HEADER.iter().map(|h| h.to_string())),
    );
    for (i, row) in rows.iter().enumerate() {
        push_line(&mut out, std::iter::once((i + 1).to_string()).chain(row.csv_fields()));
    }
    out
}

/// `text/csv` attachment named `<screen>.csv`.
pub fn download<T: CsvRow>(screen: &str, rows: &[T]) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{screen}.csv\""),
            ),
        ],
        render(rows),
    )
        .into_response()
}

/// Calendar date for CSV columns, blank when unknown.
pub fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Whole numbers print without a trailing `.0`.
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
