// src/load/mod.rs

//! Dataset loader.
//!
//! Every supported file format is first read into a [`RawTable`] of string
//! cells; [`records_from_raw`] then resolves the required columns and parses
//! each row into a [`Record`]. The loader never touches the network.

pub mod columnar;
pub mod columns;
pub mod delimited;
pub mod sheet;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Dataset, MonthLabel, Record};
use columns::ColumnIndex;

/// Header row plus data rows, every cell as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("panel file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
    #[error("unsupported panel format (expected xlsx, xls, ods, csv or parquet): {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("{} has no header row", .0.display())]
    Empty(PathBuf),
    #[error("{} has no data rows", .0.display())]
    NoRows(PathBuf),
    #[error("{} is missing required column(s): {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },
    #[error("row {row}: cannot parse `{column}` value {value:?}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
}

impl LoadError {
    pub(crate) fn unreadable(path: &Path, reason: impl ToString) -> Self {
        LoadError::Unreadable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFormat {
    Spreadsheet,
    Csv,
    Parquet,
}

impl PanelFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(PanelFormat::Spreadsheet),
            "csv" => Some(PanelFormat::Csv),
            "parquet" => Some(PanelFormat::Parquet),
            _ => None,
        }
    }
}

/// Read the panel at `path` into an immutable [`Dataset`].
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let format =
        PanelFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;
    debug!(?format, "reading panel");

    let raw = match format {
        PanelFormat::Spreadsheet => sheet::read_first_sheet(path)?,
        PanelFormat::Csv => delimited::read_csv(path)?,
        PanelFormat::Parquet => columnar::read_parquet(path)?,
    };

    let records = records_from_raw(path, &raw)?;
    if records.is_empty() {
        return Err(LoadError::NoRows(path.to_path_buf()));
    }

    let dataset = Dataset::new(records);
    info!(
        rows = dataset.len(),
        tax_types = dataset.tax_types().len(),
        years = ?dataset.years(),
        "panel loaded"
    );
    Ok(dataset)
}

/// Turn a raw table into records. Fully blank rows are skipped.
pub fn records_from_raw(path: &Path, raw: &RawTable) -> Result<Vec<Record>, LoadError> {
    if raw.headers.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    let normalized = columns::normalize_headers(&raw.headers);
    let idx = ColumnIndex::resolve(&normalized).map_err(|missing| LoadError::MissingColumns {
        path: path.to_path_buf(),
        missing,
    })?;

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut unknown_months = 0usize;
    let mut missing_coords = 0usize;
    let mut missing_years = 0usize;

    for (i, row) in raw.rows.iter().enumerate() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        // header is line 1
        let line = i + 2;
        let cell = |at: usize| row.get(at).map(|s| s.trim()).unwrap_or("");

        // no year means no filter can ever select the row
        if is_missing(cell(idx.year)) {
            missing_years += 1;
            continue;
        }
        let year = parse_year(cell(idx.year)).ok_or_else(|| invalid(line, columns::YEAR, cell(idx.year)))?;
        let collection_amount = parse_amount(cell(idx.amount))
            .ok_or_else(|| invalid(line, columns::AMOUNT, cell(idx.amount)))?;
        let latitude = parse_coordinate(cell(idx.latitude))
            .ok_or_else(|| invalid(line, columns::LATITUDE, cell(idx.latitude)))?;
        let longitude = parse_coordinate(cell(idx.longitude))
            .ok_or_else(|| invalid(line, columns::LONGITUDE, cell(idx.longitude)))?;

        let month = MonthLabel::parse(cell(idx.month));
        if month.known().is_none() {
            unknown_months += 1;
        }
        if !latitude.is_finite() || !longitude.is_finite() {
            missing_coords += 1;
        }

        records.push(Record {
            tax_type: cell(idx.tax_type).to_string(),
            year,
            month,
            customs_office: cell(idx.customs_office).to_string(),
            collection_amount,
            latitude,
            longitude,
        });
    }

    if missing_years > 0 {
        warn!(rows = missing_years, "rows without a year were dropped");
    }
    if unknown_months > 0 {
        warn!(rows = unknown_months, "rows with unrecognized month names; they sort last");
    }
    if missing_coords > 0 {
        warn!(rows = missing_coords, "rows without coordinates; they are left off the map");
    }

    Ok(records)
}

fn invalid(row: usize, column: &str, value: &str) -> LoadError {
    LoadError::InvalidCell {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Cell values read as "no value", on top of the blank cell.
const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(s: &str) -> bool {
    s.is_empty() || MISSING_TOKENS.contains(&s)
}

/// Accepts `2024` as well as the `2024.0` spreadsheets produce for numeric cells.
fn parse_year(s: &str) -> Option<i32> {
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let f = s.parse::<f64>().ok()?;
    (f.fract() == 0.0 && f.abs() <= i32::MAX as f64).then_some(f as i32)
}

/// Missing amounts count as zero in every sum.
fn parse_amount(s: &str) -> Option<f64> {
    if is_missing(s) {
        return Some(0.0);
    }
    s.parse::<f64>().ok()
}

/// Missing coordinates become NaN.
fn parse_coordinate(s: &str) -> Option<f64> {
    if is_missing(s) {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}
