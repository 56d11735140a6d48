//! Core data types shared across the pipeline

pub mod document;
pub mod report;

pub use document::{Chunk, Segment, UploadedFile};
pub use report::{SurveyReport, SurveyRow};
