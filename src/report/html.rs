//! HTML report rendering: two literal placeholder substitutions

use crate::worker::OutcomeRecord;
use std::fmt::Write;

pub const DATE_PLACEHOLDER: &str = "{date}";
pub const ROWS_PLACEHOLDER: &str = "{rows}";

/// Template compiled into the binary, used when no template path is configured
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.html");

/// CSS class for a status string, matched case-insensitively
pub fn status_class(status: &str) -> Option<&'static str> {
    match status.to_ascii_uppercase().as_str() {
        "OK" => Some("status-ok"),
        "FAILED" => Some("status-failed"),
        "UNDECODABLE" => Some("status-undecodable"),
        _ => None,
    }
}

/// One `<tr>` per record, in list order
pub fn render_rows(outcomes: &[OutcomeRecord]) -> String {
    let mut rows = String::new();
    for record in outcomes {
        let status = record.status.as_str();
        let saved_as = record
            .saved_as
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        // Writing to a String cannot fail
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td class='{}'>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&record.file),
            status_class(status).unwrap_or(""),
            status,
            record.size,
            escape(&saved_as),
        );
    }
    rows
}

/// Substitute `{date}` and `{rows}` in `template`
pub fn render(template: &str, date: &str, outcomes: &[OutcomeRecord]) -> String {
    template
        .replace(DATE_PLACEHOLDER, date)
        .replace(ROWS_PLACEHOLDER, &render_rows(outcomes))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
