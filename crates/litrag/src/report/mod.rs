//! Tabular presentation of survey results

use console::style;

use crate::types::SurveyReport;

/// Label of the header column
pub const HEADER_COLUMN: &str = "Publication Info";

/// Placeholder shown when the OCR header is null
pub const MISSING_HEADER: &str = "None";

/// Renders survey rows as a plain-text table, one row per document in upload
/// order: header column first, then one column per fixed question.
pub struct TablePresenter {
    /// Cells longer than this are truncated with an ellipsis
    max_cell_width: usize,
}

impl Default for TablePresenter {
    fn default() -> Self {
        Self { max_cell_width: 48 }
    }
}

impl TablePresenter {
    /// Create a presenter with a custom cell width
    pub fn new(max_cell_width: usize) -> Self {
        Self { max_cell_width }
    }

    /// Column headers: the header column plus the question texts
    pub fn column_headers(questions: &[String]) -> Vec<String> {
        let mut headers = Vec::with_capacity(questions.len() + 1);
        headers.push(HEADER_COLUMN.to_string());
        headers.extend(questions.iter().cloned());
        headers
    }

    /// Data cells, one row per document in upload order
    pub fn rows(report: &SurveyReport) -> Vec<Vec<String>> {
        report
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(row.answers.len() + 1);
                cells.push(
                    row.header
                        .clone()
                        .unwrap_or_else(|| MISSING_HEADER.to_string()),
                );
                cells.extend(row.answers.iter().cloned());
                cells
            })
            .collect()
    }

    /// Render the full table as styled text
    pub fn render(&self, questions: &[String], report: &SurveyReport) -> String {
        let headers = Self::column_headers(questions);
        let rows = Self::rows(report);

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let widest_cell = rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0);
                header
                    .chars()
                    .count()
                    .max(widest_cell)
                    .min(self.max_cell_width)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&self.render_line(&headers, &widths, true));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');

        for row in &rows {
            out.push_str(&self.render_line(row, &widths, false));
            out.push('\n');
        }

        out
    }

    fn render_line(&self, cells: &[String], widths: &[usize], emphasize: bool) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| {
                let cell = self.truncate_cell(cell);
                let padded = format!("{cell:<width$}");
                if emphasize {
                    style(padded).bold().to_string()
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Flatten newlines and truncate to the cell width on a char boundary
    fn truncate_cell(&self, cell: &str) -> String {
        let flat = cell.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= self.max_cell_width {
            return flat;
        }

        let kept: String = flat.chars().take(self.max_cell_width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
