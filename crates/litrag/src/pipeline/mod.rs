//! Per-document survey pipeline
//!
//! Documents are processed strictly one after another in upload order. Each
//! document gets a fresh vector index; every document yields exactly one row
//! with exactly one cell per fixed question, whatever fails along the way.

pub mod progress;

use std::sync::Arc;

use crate::config::{AppConfig, RetrievalConfig};
use crate::error::{Error, Result};
use crate::generation::{survey_questions, AnswerChain};
use crate::header::HeaderExtractor;
use crate::index::{build_index, collection_name, VectorIndex};
use crate::ingestion::{content_hash, sanitize_segment, DocumentLoader, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::MultiQueryRetriever;
use crate::types::{SurveyReport, SurveyRow, UploadedFile};

pub use progress::{NullSink, ProgressEvent, ProgressSink, Stage};

/// Drives the ingest → sanitize → chunk → index → answer flow per document
pub struct SurveyPipeline {
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    header: Arc<dyn HeaderExtractor>,
    chunker: TextChunker,
    retrieval: RetrievalConfig,
}

impl SurveyPipeline {
    /// Assemble a pipeline from configuration and providers
    pub fn new(
        config: &AppConfig,
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        header: Arc<dyn HeaderExtractor>,
    ) -> Self {
        Self {
            loader,
            embedder,
            llm,
            header,
            chunker: TextChunker::from_config(&config.chunking),
            retrieval: config.retrieval.clone(),
        }
    }

    /// Survey every upload in order and collect one row per document
    pub async fn run(
        &self,
        uploads: &[UploadedFile],
        field: &str,
        sink: &dyn ProgressSink,
    ) -> SurveyReport {
        let questions = survey_questions(field);
        let total = uploads.len();
        let mut rows = Vec::with_capacity(total);

        for (index, upload) in uploads.iter().enumerate() {
            sink.emit(ProgressEvent::DocumentStarted {
                index,
                total,
                filename: upload.filename.clone(),
            });

            rows.push(self.process_document(index, upload, &questions, sink).await);

            sink.emit(ProgressEvent::DocumentCompleted { index });
        }

        SurveyReport { rows }
    }

    /// Process one document into one row. Never fails: build errors fill all
    /// answer cells, question errors fill their own cell.
    async fn process_document(
        &self,
        index: usize,
        upload: &UploadedFile,
        questions: &[String],
        sink: &dyn ProgressSink,
    ) -> SurveyRow {
        // Header first; its failure is caught and never blocks the questions.
        // Both consumers read the same buffered bytes.
        let header = match self.header.extract(&upload.data) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(file = %upload.filename, error = %e, "header extraction failed");
                sink.emit(ProgressEvent::HeaderUnavailable {
                    index,
                    reason: e.to_string(),
                });
                None
            }
        };

        let vector_index = match self.build_document_index(index, upload, sink).await {
            Ok(built) => built,
            Err(e) => {
                tracing::error!(file = %upload.filename, error = %e, "document indexing failed");
                sink.emit(ProgressEvent::DocumentFailed {
                    index,
                    reason: e.to_string(),
                });
                return SurveyRow::failed(upload.filename.clone(), header, &e.to_string());
            }
        };

        let retriever =
            MultiQueryRetriever::new(self.llm.clone(), self.embedder.clone(), &self.retrieval);
        let chain = AnswerChain::new(self.llm.clone(), retriever);

        sink.emit(ProgressEvent::StageChanged {
            index,
            stage: Stage::Answering,
        });

        let mut answers = Vec::with_capacity(questions.len());
        for (question_index, question) in questions.iter().enumerate() {
            match chain.answer(&vector_index, question).await {
                Ok(answer) => {
                    sink.emit(ProgressEvent::QuestionAnswered {
                        index,
                        question: question_index,
                        failed: false,
                    });
                    answers.push(answer);
                }
                Err(e) => {
                    tracing::warn!(
                        file = %upload.filename,
                        question = question_index,
                        error = %e,
                        "question failed"
                    );
                    sink.emit(ProgressEvent::QuestionAnswered {
                        index,
                        question: question_index,
                        failed: true,
                    });
                    answers.push(format!("Error: {e}"));
                }
            }
        }

        SurveyRow::new(upload.filename.clone(), header, answers)
    }

    /// Load, sanitize, chunk and embed one document into a fresh collection
    async fn build_document_index(
        &self,
        seq: usize,
        upload: &UploadedFile,
        sink: &dyn ProgressSink,
    ) -> Result<VectorIndex> {
        sink.emit(ProgressEvent::StageChanged {
            index: seq,
            stage: Stage::Parsing,
        });
        let mut segments = self.loader.load(&upload.filename, &upload.data)?;
        for segment in &mut segments {
            sanitize_segment(segment);
        }

        sink.emit(ProgressEvent::StageChanged {
            index: seq,
            stage: Stage::Chunking,
        });
        let chunks = self.chunker.chunk_segments(&segments);
        if chunks.is_empty() {
            return Err(Error::file_parse(
                &upload.filename,
                "document produced no chunks",
            ));
        }

        sink.emit(ProgressEvent::StageChanged {
            index: seq,
            stage: Stage::Embedding,
        });
        let collection = collection_name(seq, &content_hash(&upload.data));
        build_index(collection, &chunks, self.embedder.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::generation::QUESTION_COUNT;
    use crate::types::Segment;

    struct StubLoader;

    impl DocumentLoader for StubLoader {
        fn load(&self, filename: &str, _data: &[u8]) -> Result<Vec<Segment>> {
            let mut metadata = HashMap::new();
            metadata.insert("source".to_string(), json!(filename));
            metadata.insert("page".to_string(), json!(1));
            Ok(vec![Segment::new(
                "The study finds that irrigation improves yields.",
                metadata,
            )])
        }
    }

    struct FailingLoader;

    impl DocumentLoader for FailingLoader {
        fn load(&self, filename: &str, _data: &[u8]) -> Result<Vec<Segment>> {
            Err(Error::file_parse(filename, "corrupt xref table"))
        }
    }

    struct ConstantEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ConstantEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    /// Answers every prompt, optionally failing on one question substring
    struct StubLlm {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if let Some(marker) = self.fail_on {
                if prompt.contains(marker) {
                    return Err(Error::Llm("model unavailable".to_string()));
                }
            }
            if prompt.contains("different versions") {
                Ok("1. v1\n2. v2\n3. v3\n4. v4\n5. v5".to_string())
            } else {
                Ok("a grounded answer".to_string())
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    struct FixedHeader;

    impl HeaderExtractor for FixedHeader {
        fn extract(&self, _data: &[u8]) -> Result<String> {
            Ok("Doe et al., 2023".to_string())
        }
    }

    struct BrokenHeader;

    impl HeaderExtractor for BrokenHeader {
        fn extract(&self, _data: &[u8]) -> Result<String> {
            Err(Error::Ocr("image cropping failed".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressSink for RecordingSink {
        fn emit(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn pipeline(
        loader: Arc<dyn DocumentLoader>,
        llm: Arc<dyn LlmProvider>,
        header: Arc<dyn HeaderExtractor>,
    ) -> SurveyPipeline {
        SurveyPipeline::new(
            &AppConfig::default(),
            loader,
            Arc::new(ConstantEmbedder),
            llm,
            header,
        )
    }

    fn uploads(n: usize) -> Vec<UploadedFile> {
        (0..n)
            .map(|i| UploadedFile::new(format!("paper-{i}.pdf"), format!("pdf bytes {i}").into_bytes()))
            .collect()
    }

    #[tokio::test]
    async fn every_document_gets_exactly_five_answers() {
        let pipeline = pipeline(
            Arc::new(StubLoader),
            Arc::new(StubLlm { fail_on: None }),
            Arc::new(FixedHeader),
        );

        let report = pipeline.run(&uploads(2), "Agronomy", &NullSink).await;

        assert_eq!(report.rows.len(), 2);
        for row in &report.rows {
            assert_eq!(row.answers.len(), QUESTION_COUNT);
            assert!(row.answers.iter().all(|a| a == "a grounded answer"));
            assert_eq!(row.header.as_deref(), Some("Doe et al., 2023"));
        }
    }

    #[tokio::test]
    async fn a_failed_question_becomes_an_error_cell_and_the_rest_continue() {
        // The third question is the only one mentioning hypotheses
        let pipeline = pipeline(
            Arc::new(StubLoader),
            Arc::new(StubLlm {
                fail_on: Some("hypotheses"),
            }),
            Arc::new(FixedHeader),
        );

        let report = pipeline.run(&uploads(1), "Agronomy", &NullSink).await;
        let row = &report.rows[0];

        assert_eq!(row.answers.len(), QUESTION_COUNT);
        assert!(row.answers[2].starts_with("Error:"));
        for (i, answer) in row.answers.iter().enumerate() {
            if i != 2 {
                assert_eq!(answer, "a grounded answer");
            }
        }
    }

    #[tokio::test]
    async fn header_failure_yields_null_and_questions_still_run() {
        let sink = RecordingSink::default();
        let pipeline = pipeline(
            Arc::new(StubLoader),
            Arc::new(StubLlm { fail_on: None }),
            Arc::new(BrokenHeader),
        );

        let report = pipeline.run(&uploads(1), "Agronomy", &sink).await;
        let row = &report.rows[0];

        assert!(row.header.is_none());
        assert_eq!(row.answers.len(), QUESTION_COUNT);
        assert!(row.answers.iter().all(|a| a == "a grounded answer"));

        let events = sink.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::HeaderUnavailable { .. })));
    }

    #[tokio::test]
    async fn load_failure_fills_all_cells_with_the_error() {
        let sink = RecordingSink::default();
        let pipeline = pipeline(
            Arc::new(FailingLoader),
            Arc::new(StubLlm { fail_on: None }),
            Arc::new(FixedHeader),
        );

        let report = pipeline.run(&uploads(1), "Agronomy", &sink).await;
        let row = &report.rows[0];

        assert_eq!(row.answers.len(), QUESTION_COUNT);
        assert!(row.answers.iter().all(|a| a.starts_with("Error:")));
        assert!(row.answers[0].contains("corrupt xref table"));

        let events = sink.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, ProgressEvent::DocumentFailed { .. })));
    }

    #[tokio::test]
    async fn rows_follow_upload_order() {
        let pipeline = pipeline(
            Arc::new(StubLoader),
            Arc::new(StubLlm { fail_on: None }),
            Arc::new(FixedHeader),
        );

        let report = pipeline.run(&uploads(3), "Agronomy", &NullSink).await;

        let names: Vec<&str> = report.rows.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["paper-0.pdf", "paper-1.pdf", "paper-2.pdf"]);
    }

    #[tokio::test]
    async fn progress_stream_reports_each_document_once() {
        let sink = RecordingSink::default();
        let pipeline = pipeline(
            Arc::new(StubLoader),
            Arc::new(StubLlm { fail_on: None }),
            Arc::new(FixedHeader),
        );

        pipeline.run(&uploads(2), "Agronomy", &sink).await;

        let events = sink.events.lock().unwrap();
        let started = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::DocumentStarted { .. }))
            .count();
        let completed = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::DocumentCompleted { .. }))
            .count();
        assert_eq!(started, 2);
        assert_eq!(completed, 2);
    }
}
