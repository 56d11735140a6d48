//! Survey result rows

use serde::{Deserialize, Serialize};

use crate::generation::prompt::QUESTION_COUNT;

/// One table row: the OCR'd publication header plus one answer per fixed
/// question. A failed question carries an inline error string, never a gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRow {
    /// Filename of the uploaded document
    pub filename: String,
    /// OCR-recovered citation header, if extraction succeeded
    pub header: Option<String>,
    /// One entry per fixed question, answer or error string
    pub answers: Vec<String>,
}

impl SurveyRow {
    /// Build a row, enforcing one answer cell per question
    pub fn new(filename: String, header: Option<String>, answers: Vec<String>) -> Self {
        debug_assert_eq!(answers.len(), QUESTION_COUNT);
        Self {
            filename,
            header,
            answers,
        }
    }

    /// Build a row where every question cell carries the same error message
    pub fn failed(filename: String, header: Option<String>, error: &str) -> Self {
        Self {
            filename,
            header,
            answers: vec![format!("Error: {error}"); QUESTION_COUNT],
        }
    }
}

/// All rows for one run, in upload order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyReport {
    /// One row per uploaded document
    pub rows: Vec<SurveyRow>,
}

impl SurveyReport {
    /// Number of documents surveyed
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether any documents were surveyed
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
