//! Answer chain: retrieve, assemble context, generate

use std::sync::Arc;

use crate::error::Result;
use crate::index::VectorIndex;
use crate::providers::LlmProvider;
use crate::retrieval::MultiQueryRetriever;

use super::prompt::PromptBuilder;

/// Answers one question against one document's index.
///
/// Errors propagate to the caller, which catches them per question.
pub struct AnswerChain {
    llm: Arc<dyn LlmProvider>,
    retriever: MultiQueryRetriever,
}

impl AnswerChain {
    /// Create a chain over the given retriever
    pub fn new(llm: Arc<dyn LlmProvider>, retriever: MultiQueryRetriever) -> Self {
        Self { llm, retriever }
    }

    /// Produce an answer grounded in the retrieved context.
    ///
    /// An empty retrieval still goes to the model; the grounding instructions
    /// make it report that the information is unavailable.
    pub async fn answer(&self, index: &VectorIndex, question: &str) -> Result<String> {
        let hits = self.retriever.retrieve(index, question).await?;
        let context = PromptBuilder::build_context(&hits);
        let prompt = PromptBuilder::answer_prompt(question, &context);

        let answer = self.llm.generate(&prompt).await?;
        Ok(answer.trim().to_string())
    }
}
