use serde::{Deserialize, Serialize};

use crate::models::CellValue;

/// One worksheet as read: a header row followed by data rows of equal width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn header_labels(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.as_label()).collect()
    }

    /// Position of the first column whose trimmed header equals `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.as_label() == name)
    }

    /// Render the sheet as an aligned text table
    pub fn to_text_table(&self, max_rows: usize) -> String {
        let labels = self.header_labels();
        let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count().max(1)).collect();

        let shown: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(max_rows)
            .map(|row| row.iter().map(|c| c.as_label()).collect())
            .collect();

        for row in &shown {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_row = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        let mut out = String::new();
        out.push_str(&format_row(&labels));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &shown {
            out.push_str(&format_row(row));
            out.push('\n');
        }
        if self.rows.len() > max_rows {
            out.push_str(&format!("... {} more rows\n", self.rows.len() - max_rows));
        }
        out
    }
}
