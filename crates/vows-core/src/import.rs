//! Spreadsheet import: turn a guest list into [`GuestDraft`]s.
//!
//! CSV text and Excel workbooks (`.xlsx`, `.xls`) are accepted. For a
//! workbook only the first worksheet is read. The first row is a header and
//! is dropped. Each following row maps positionally: name, table, VIP
//! marker. Extra columns are ignored.

use crate::error::ErrorCode;
use crate::model::{GuestDraft, UNASSIGNED_TABLE};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions read as Excel workbooks.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unsupported spreadsheet format '{extension}' (use .csv, .xlsx or .xls)")]
    UnsupportedFormat { extension: String },

    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    #[error("failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ImportError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedImportFormat,
            Self::UnterminatedQuote { .. } | Self::Workbook { .. } => ErrorCode::ImportParseError,
            Self::Io { .. } => ErrorCode::StorageReadFailed,
        }
    }
}

/// Read a spreadsheet file and map its data rows to drafts.
///
/// # Errors
///
/// Returns an error for unsupported extensions, unreadable files, malformed
/// CSV, or a workbook that cannot be opened.
pub fn import_path(path: &Path) -> Result<Vec<GuestDraft>, ImportError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let drafts = if extension == "csv" {
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        import_csv(&text)?
    } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        import_workbook(path)?
    } else {
        return Err(ImportError::UnsupportedFormat { extension });
    };
    debug!(path = %path.display(), rows = drafts.len(), "parsed guest spreadsheet");
    Ok(drafts)
}

/// Map the first worksheet of an Excel workbook (header row first) to
/// drafts. A workbook without sheets yields no drafts.
///
/// # Errors
///
/// Returns an error if the workbook cannot be opened or its first sheet
/// cannot be read.
pub fn import_workbook(path: &Path) -> Result<Vec<GuestDraft>, ImportError> {
    let workbook_error = |source| ImportError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Vec::new());
    };
    let range = range.map_err(workbook_error)?;

    // the range starts at the first used cell; pad so columns stay positional
    let leading = range
        .start()
        .map_or(0, |(_, col)| usize::try_from(col).unwrap_or(usize::MAX));
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|cells| {
            std::iter::repeat_n(String::new(), leading)
                .chain(cells.iter().map(cell_text))
                .collect::<Vec<_>>()
        })
        .filter(|cells| cells.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    Ok(drafts_from_rows(rows.iter().skip(1).map(Vec::as_slice)))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map CSV text (header row first) to drafts.
///
/// # Errors
///
/// Returns an error if a quoted field is never closed.
pub fn import_csv(text: &str) -> Result<Vec<GuestDraft>, ImportError> {
    let rows = parse_csv(text)?;
    Ok(drafts_from_rows(rows.iter().skip(1).map(Vec::as_slice)))
}

/// Drafts for data rows. Row `n` (1-based) with a blank name becomes
/// `"Guest n"`.
pub fn drafts_from_rows<'a>(rows: impl IntoIterator<Item = &'a [String]>) -> Vec<GuestDraft> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let cell = |i: usize| row.get(i).map_or("", |c| c.trim());
            let placeholder;
            let name = if cell(0).is_empty() {
                placeholder = format!("Guest {}", index + 1);
                placeholder.as_str()
            } else {
                cell(0)
            };
            let table = if cell(1).is_empty() {
                UNASSIGNED_TABLE
            } else {
                cell(1)
            };
            let vip = cell(2).to_uppercase() == "VIP";
            GuestDraft::new(name, table, vip).ok()
        })
        .collect()
}

/// Split CSV text into rows of unquoted cells.
///
/// Handles quoted fields with `""` escapes and embedded separators or
/// newlines, LF and CRLF line endings, and skips lines with no content.
///
/// # Errors
///
/// Returns an error if a quoted field is never closed.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                end_row(&mut rows, &mut row, &mut field);
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { line: quote_line });
    }
    end_row(&mut rows, &mut row, &mut field);
    Ok(rows)
}

fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String) {
    row.push(std::mem::take(field));
    let cells = std::mem::take(row);
    if cells.iter().any(|cell| !cell.trim().is_empty()) {
        rows.push(cells);
    }
}
