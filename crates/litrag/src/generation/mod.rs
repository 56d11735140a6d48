//! Prompt construction and answer generation

mod chain;
pub mod prompt;

pub use chain::AnswerChain;
pub use prompt::{survey_questions, PromptBuilder, QUESTION_COUNT, QUESTION_TEMPLATES};
