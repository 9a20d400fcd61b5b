use crate::error::{ProcessingError, Result};
use crate::models::{CellValue, RawSheet};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads worksheets of an xlsx/xls/ods workbook into [`RawSheet`]s
pub struct SheetReader {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl SheetReader {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ProcessingError::MissingSourceFile(path.to_path_buf()));
        }

        let workbook = open_workbook_auto(path)?;
        debug!("Opened workbook {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read one sheet whose header is the first non-blank row at or below `header_row`
    pub fn read_sheet(&mut self, name: &str, header_row: usize) -> Result<RawSheet> {
        if !self.sheet_names().iter().any(|s| s == name) {
            return Err(ProcessingError::SheetNotFound {
                sheet: name.to_string(),
                path: self.path.clone(),
            });
        }

        let range = self.workbook.worksheet_range(name)?;
        let sheet = range_to_sheet(name, &range, header_row);

        debug!(
            "Read sheet '{}': {} columns, {} rows",
            name,
            sheet.width(),
            sheet.height()
        );
        Ok(sheet)
    }
}

fn range_to_sheet(name: &str, range: &Range<Data>, header_row: usize) -> RawSheet {
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range
        .rows()
        .enumerate()
        .filter(|(i, _)| start_row + i >= header_row)
        .map(|(_, row)| row.iter().map(to_cell).collect::<Vec<_>>())
        .skip_while(|row| row.iter().all(|c| c.is_empty()));

    let mut headers = match rows.next() {
        Some(headers) => headers,
        None => return RawSheet::new(name, Vec::new(), Vec::new()),
    };

    // Trailing blank header cells carry no column
    while headers.last().is_some_and(|c| c.is_empty()) {
        headers.pop();
    }

    let width = headers.len();
    let data: Vec<Vec<CellValue>> = rows
        .filter(|row| !row.iter().all(|c| c.is_empty()))
        .map(|mut row| {
            row.truncate(width);
            row
        })
        .collect();

    RawSheet::new(name, headers, data)
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}
