//! Ask command - one question against local files

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use crate::domain::ingestion::{IngestionMode, UploadedFile};
use crate::domain::rag::RagRunResult;
use crate::domain::RagWorkflow;
use crate::infrastructure::services::{DocumentServiceTrait, NO_DOCUMENTS};
use crate::{build_components, Components, IndexPersistence};

#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// File to ingest before answering (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Ingest the files as a fresh batch
    #[arg(long)]
    pub replace: bool,

    /// Print the executed workflow nodes after the answer
    #[arg(long)]
    pub trace: bool,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let components = build_components(&config, IndexPersistence::Ephemeral).await?;

    let result = answer(&components, &args).await?;

    println!("{}", result.answer);
    if args.trace {
        print!("{}", format_trace(&result));
    }
    Ok(())
}

/// Ingest the requested files, check preconditions and run the workflow
async fn answer(components: &Components, args: &AskArgs) -> anyhow::Result<RagRunResult> {
    let question = args.question.trim();
    if question.is_empty() {
        bail!("Question cannot be empty");
    }

    if !args.files.is_empty() {
        let mut uploads = Vec::with_capacity(args.files.len());
        for path in &args.files {
            uploads.push(read_upload(path).await?);
        }

        let mode = if args.replace {
            IngestionMode::Replace
        } else {
            IngestionMode::Append
        };
        let outcome = components.documents.ingest(uploads, mode).await?;
        info!(chunks = outcome.chunk_count, "{}", outcome.message);
    }

    if !components.retrievers.is_bound().await {
        bail!(NO_DOCUMENTS);
    }
    if !components.status.llm {
        bail!("Language model is not available");
    }

    Ok(components.workflow.run(question.to_string()).await)
}

async fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;

    Ok(UploadedFile::new(file_name, bytes))
}

fn format_trace(result: &RagRunResult) -> String {
    let mut out = String::from("\nTrace:\n");
    for (i, step) in result.steps.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<20} {:>6}ms  {}",
            i + 1,
            step.node.as_str(),
            step.duration_ms,
            step.note
        );
    }
    let _ = writeln!(
        out,
        "critique={} attempts={} total={}ms",
        result.final_state.critique_status.as_str(),
        result.final_state.attempt_count,
        result.execution_time_ms
    );
    out
}
