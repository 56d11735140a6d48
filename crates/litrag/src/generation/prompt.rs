//! Prompt templates for the survey pipeline

use crate::index::ScoredChunk;

/// Number of fixed survey questions asked per document
pub const QUESTION_COUNT: usize = 5;

/// The fixed question templates, parameterized by the research field
pub const QUESTION_TEMPLATES: [&str; QUESTION_COUNT] = [
    "What is the key research question this paper addresses in the field of {field}?",
    "Which theoretical perspectives or frameworks does the paper draw on within {field}?",
    "What hypotheses does the paper put forward, and how well do its proposed approaches scale within {field}?",
    "What methodologies does the paper use to investigate {field}?",
    "What are the paper's main findings, and what do they imply for {field}?",
];

/// Render the five survey questions for a research field
pub fn survey_questions(field: &str) -> Vec<String> {
    QUESTION_TEMPLATES
        .iter()
        .map(|template| template.replace("{field}", field))
        .collect()
}

/// Prompt builder for retrieval and answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Ask for exactly `n` alternative phrasings in a strict numbered list
    pub fn paraphrase_prompt(question: &str, n: usize) -> String {
        format!(
            r#"You are an AI language model assistant. Your task is to generate exactly {n} different versions of the given user question to retrieve relevant documents from a vector database. By generating multiple perspectives on the user question, your goal is to help the user overcome some of the limitations of distance-based similarity search.

Reply with a numbered list only, one question per line, in the form "1. <question>". Do not add any other text.

Original question: {question}"#
        )
    }

    /// Build a context block from retrieved chunks
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!("[{}]\n{}\n\n---\n\n", i + 1, result.content));
        }

        context
    }

    /// Build the answer prompt with strict grounding on the context
    pub fn answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Answer the question based ONLY on the following context. If the answer is not in the context, respond with "This information is not available in the provided document." Do not use external knowledge.

CONTEXT:
{context}

QUESTION: {question}

Answer:"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn scored(content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk_id: Uuid::new_v4(),
            content: content.to_string(),
            metadata: HashMap::new(),
            similarity: 1.0,
        }
    }

    #[test]
    fn questions_carry_the_research_field() {
        let questions = survey_questions("Healthcare");

        assert_eq!(questions.len(), QUESTION_COUNT);
        for question in &questions {
            assert!(question.contains("Healthcare"));
        }
    }

    #[test]
    fn questions_match_the_templates_verbatim() {
        let questions = survey_questions("Healthcare");

        for (question, template) in questions.iter().zip(QUESTION_TEMPLATES) {
            assert_eq!(question, &template.replace("{field}", "Healthcare"));
        }
        // The five angles stay distinct
        assert!(questions[0].contains("key research question"));
        assert!(questions[1].contains("theoretical perspectives"));
        assert!(questions[2].contains("hypotheses"));
        assert!(questions[3].contains("methodologies"));
        assert!(questions[4].contains("main findings"));
    }

    #[test]
    fn context_numbers_each_chunk() {
        let context = PromptBuilder::build_context(&[scored("first"), scored("second")]);

        assert!(context.contains("[1]\nfirst"));
        assert!(context.contains("[2]\nsecond"));
    }

    #[test]
    fn answer_prompt_embeds_context_and_question() {
        let prompt = PromptBuilder::answer_prompt("Why?", "Because of X.");

        assert!(prompt.contains("Because of X."));
        assert!(prompt.contains("QUESTION: Why?"));
        assert!(prompt.contains("ONLY on the following context"));
    }

    #[test]
    fn paraphrase_prompt_pins_the_count_and_format() {
        let prompt = PromptBuilder::paraphrase_prompt("What is RAG?", 5);

        assert!(prompt.contains("exactly 5 different versions"));
        assert!(prompt.contains("numbered list"));
        assert!(prompt.contains("Original question: What is RAG?"));
    }
}
