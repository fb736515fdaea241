//! Printable HTML ledger/customer reports.
//!
//! The host opens the rendered document and triggers its print dialog; this
//! module only produces the standalone HTML.

use super::{column_labels, display_date, ExportError, ExportResult, FlatRecord};
use chrono::{NaiveDate, Utc};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

static UPPERCASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z])").expect("valid uppercase regex"));
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

const REPORT_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; text-align: center; }
table { width: 100%; border-collapse: collapse; margin-top: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; font-weight: bold; }
tr:nth-child(even) { background-color: #f9f9f9; }";

/// Titled table report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintReport {
    pub title: String,
    pub generated_on: NaiveDate,
    pub rows: Vec<FlatRecord>,
}

impl PrintReport {
    /// Creates a report stamped with today's date.
    pub fn new(title: impl Into<String>, rows: Vec<FlatRecord>) -> Self {
        Self {
            title: title.into(),
            generated_on: Utc::now().date_naive(),
            rows,
        }
    }

    pub fn generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    /// Renders the standalone HTML document.
    pub fn render_html(&self) -> String {
        let labels = column_labels(&self.rows);
        let title = escape_html(&self.title);
        let mut html = String::new();

        let _ = write!(
            html,
            "<html>\n<head>\n<title>{title}</title>\n<style>\n{REPORT_STYLE}\n</style>\n</head>\n<body>\n<h1>{title}</h1>\n<p>Generated on: {}</p>\n<table>\n<thead>\n<tr>",
            display_date(self.generated_on)
        );
        for label in &labels {
            let _ = write!(html, "<th>{}</th>", escape_html(&header_label(label)));
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for label in &labels {
                let _ = write!(html, "<td>{}</td>", escape_html(row.get(label).unwrap_or("")));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
        html
    }

    /// File name derived from the title, e.g. `finance-ledger-report.html`.
    pub fn file_name(&self) -> String {
        let lowered = self.title.to_lowercase();
        let slug = SLUG_RE.replace_all(&lowered, "-");
        let slug = slug.trim_matches('-');
        if slug.is_empty() {
            "report.html".to_string()
        } else {
            format!("{slug}.html")
        }
    }

    /// Writes the rendered document into `dir` for the host to print.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> ExportResult<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        let html = self.render_html();
        std::fs::write(&path, html.as_bytes()).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=print_report module=export status=ok rows={} bytes={}",
            self.rows.len(),
            html.len()
        );
        Ok(path)
    }
}

/// Splits camelCase keys into words (`fullName` -> `full Name`).
fn header_label(label: &str) -> String {
    UPPERCASE_RE.replace_all(label, " $1").trim().to_string()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
