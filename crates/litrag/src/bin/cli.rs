//! litrag CLI
//!
//! Run with: cargo run -p litrag -- --field "Healthcare" --model mistral paper.pdf

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use litrag::config::SUPPORTED_MODELS;
use litrag::generation::survey_questions;
use litrag::header::OcrHeaderExtractor;
use litrag::ingestion::PdfLoader;
use litrag::pipeline::{ProgressEvent, ProgressSink, SurveyPipeline};
use litrag::providers::{EmbeddingProvider, LlmProvider, OllamaClient};
use litrag::report::TablePresenter;
use litrag::types::UploadedFile;
use litrag::AppConfig;

/// Survey research PDFs with a local Ollama model
#[derive(Debug, Parser)]
#[command(name = "litrag", version, about)]
struct Cli {
    /// Research field used to parameterize the survey questions
    #[arg(long)]
    field: Option<String>,

    /// Model served by Ollama, used for both embeddings and answers
    #[arg(long, value_parser = SUPPORTED_MODELS)]
    model: Option<String>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// PDF files to survey, processed in the given order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Progress sink backed by an indicatif bar: 0-100%, advanced once per
/// document, with a textual status message
struct IndicatifSink {
    bar: ProgressBar,
    total: usize,
}

impl IndicatifSink {
    fn new(total: usize) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {percent:>3}% {msg}")
                .expect("Invalid progress template")
                .progress_chars("##-"),
        );
        Self { bar, total }
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressSink for IndicatifSink {
    fn emit(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DocumentStarted {
                index,
                total,
                filename,
            } => {
                self.bar
                    .set_message(format!("[{}/{}] {}", index + 1, total, filename));
            }
            ProgressEvent::StageChanged { stage, .. } => {
                self.bar.set_message(format!("{stage}..."));
            }
            ProgressEvent::HeaderUnavailable { reason, .. } => {
                self.bar
                    .println(format!("warning: header unavailable: {reason}"));
            }
            ProgressEvent::QuestionAnswered {
                question, failed, ..
            } => {
                if failed {
                    self.bar
                        .println(format!("warning: question {} failed", question + 1));
                }
            }
            ProgressEvent::DocumentFailed { reason, .. } => {
                self.bar.println(format!("error: {reason}"));
            }
            ProgressEvent::DocumentCompleted { index } => {
                self.bar
                    .set_position(((index + 1) * 100 / self.total.max(1)) as u64);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "litrag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    let field = match cli.field {
        Some(field) => field,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Research field")
            .interact_text()?,
    };

    let model = match cli.model {
        Some(model) => model,
        None => {
            let choice = dialoguer::Select::new()
                .with_prompt("Model")
                .items(&SUPPORTED_MODELS)
                .default(0)
                .interact()?;
            SUPPORTED_MODELS[choice].to_string()
        }
    };
    AppConfig::validate_model(&model)?;

    let client = Arc::new(OllamaClient::new(&config.llm, &model));

    tracing::info!("Surveying {} file(s)", cli.files.len());
    tracing::info!("  - Field: {}", field);
    tracing::info!("  - Model: {}", model);
    tracing::info!("  - Ollama: {}", config.llm.base_url);

    if !client.probe().await {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Install: https://ollama.com/download");
        tracing::warn!("  2. Start: ollama serve");
        tracing::warn!("  3. Pull the model: ollama pull {}", model);
    }

    // Buffer each file once; the loader and the header extractor read the
    // same immutable blob.
    let mut uploads = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        uploads.push(UploadedFile::new(filename, data));
    }

    let pipeline = SurveyPipeline::new(
        &config,
        Arc::new(PdfLoader),
        client.clone() as Arc<dyn EmbeddingProvider>,
        client.clone() as Arc<dyn LlmProvider>,
        Arc::new(OcrHeaderExtractor::new(&config.ocr)),
    );

    let sink = IndicatifSink::new(uploads.len());
    let report = pipeline.run(&uploads, &field, &sink).await;
    sink.finish();

    let questions = survey_questions(&field);
    let presenter = TablePresenter::default();
    println!("\n{}", presenter.render(&questions, &report));

    Ok(())
}
