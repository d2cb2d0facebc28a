//! Ingest command - index a local file without starting the server

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::ingestion::{is_pdf_name, Document};

#[derive(Args, Clone, Debug)]
pub struct IngestArgs {
    /// Document name used in storage keys (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Path to a UTF-8 text file
    pub path: PathBuf,
}

impl IngestArgs {
    fn document_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| file_name(&self.path))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub async fn run(config: &AppConfig, args: IngestArgs) -> anyhow::Result<()> {
    let name = args.document_name();
    if is_pdf_name(&file_name(&args.path)) {
        bail!("PDF files are not supported; convert {} to text first", args.path.display());
    }
    super::require_persistent_store(config)?;

    let data = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let document = Document::from_bytes(name, &data);

    let state = crate::create_app_state(config).await?;
    let report = state.ingest(&document.content, &document.name).await?;

    info!(
        document = %document.name,
        chunks_indexed = report.chunks_indexed,
        total_chars = report.total_chars,
        "Ingest finished"
    );
    println!(
        "Indexed '{}': {} chunks, {} characters",
        document.name, report.chunks_indexed, report.total_chars
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_name_defaults_to_file_name() {
        let args = IngestArgs {
            name: None,
            path: PathBuf::from("/tmp/docs/guide.md"),
        };
        assert_eq!(args.document_name(), "guide.md");

        let args = IngestArgs {
            name: Some("Guide".to_string()),
            ..args
        };
        assert_eq!(args.document_name(), "Guide");
    }

    #[tokio::test]
    async fn test_pdf_rejected_before_reading() {
        let args = IngestArgs {
            name: None,
            path: PathBuf::from("/nonexistent/scan.pdf"),
        };

        let err = run(&AppConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("PDF"));
    }

    #[tokio::test]
    async fn test_in_memory_store_rejected_before_reading() {
        let args = IngestArgs {
            name: None,
            path: PathBuf::from("/nonexistent/notes.txt"),
        };

        let err = run(&AppConfig::default(), args).await.unwrap_err();
        assert!(err.to_string().contains("in_memory"));
    }
}
