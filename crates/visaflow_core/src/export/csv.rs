//! CSV text export and quote-aware parsing.

use super::{column_labels, ExportError, ExportResult, FlatRecord};
use log::info;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// A CSV document ready to be delivered as `<basename>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

impl CsvExport {
    /// Writes the document into `dir` and returns the file path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> ExportResult<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, self.content.as_bytes()).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=csv_export module=export status=ok file={} bytes={}",
            self.file_name,
            self.content.len()
        );
        Ok(path)
    }
}

/// Builds a named CSV export. Returns `None` for an empty row set.
pub fn export_csv(rows: &[FlatRecord], basename: &str) -> Option<CsvExport> {
    to_csv(rows).map(|content| CsvExport {
        file_name: format!("{basename}.csv"),
        content,
    })
}

/// Renders rows as CSV text: a header line, then one line per row.
///
/// Cells containing a comma, a double quote or a line break are wrapped in
/// double quotes, with embedded quotes doubled. Returns `None` when there are
/// no rows.
pub fn to_csv(rows: &[FlatRecord]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let labels = column_labels(rows);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_cells(labels.iter().copied()));
    for row in rows {
        lines.push(join_cells(
            labels.iter().map(|label| row.get(label).unwrap_or("")),
        ));
    }
    Some(lines.join("\n"))
}

fn join_cells<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(escape_cell).collect::<Vec<_>>().join(",")
}

fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Splits CSV text into records of cells, honouring double-quoted fields.
///
/// Line breaks inside quotes belong to the cell. A trailing line break does
/// not start an extra record.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut pending = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        pending = true;
        match (ch, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            }
            ('"', true) => in_quotes = false,
            ('"', false) if cell.is_empty() => in_quotes = true,
            (',', false) => cells.push(std::mem::take(&mut cell)),
            ('\r', false) if chars.peek() == Some(&'\n') => {}
            ('\n', false) => {
                cells.push(std::mem::take(&mut cell));
                records.push(std::mem::take(&mut cells));
                pending = false;
            }
            (other, _) => cell.push(other),
        }
    }

    if pending {
        cells.push(cell);
        records.push(cells);
    }
    records
}
