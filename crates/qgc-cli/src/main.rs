//! qgc - análise de Quadros Gerais de Credores com IA

mod cli;
mod output;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use colored::Colorize;
use qgc_analyzer::{chunking, Analyzer, AnalyzerConfig, ChunkProgress};
use qgc_domain::{CreditorRecord, DocumentChunk};
use qgc_llm::FalClient;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "erro:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    config.validate().map_err(anyhow::Error::msg)?;

    let provider = FalClient::new(cli.fal_key.clone());
    let analyzer = Analyzer::new(provider, config);

    match &cli.command {
        Command::Extract { input, label } => {
            let label = label.clone().unwrap_or_else(|| document_label(input));
            let chunks = load_chunks(input, cli.pages_per_chunk)?;
            let (creditors, pre_count) = analyzer
                .extract_from_chunks(&chunks, &label, print_progress)
                .await?;

            let report = output::ExtractionReport {
                creditors: &creditors,
                unique_count: creditors.len(),
                pre_consolidation_count: pre_count,
            };
            output::print_extraction_summary(&report);
            output::write_json(&report, cli.output.as_deref())?;
        }
        Command::Compare { old, new } => {
            let old_creditors = extract_document(&analyzer, old, cli.pages_per_chunk).await?;
            let new_creditors = extract_document(&analyzer, new, cli.pages_per_chunk).await?;

            let result = analyzer.compare(&old_creditors, &new_creditors).await?;
            output::print_comparison_summary(&result.summary);
            output::write_json(&result, cli.output.as_deref())?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let toml = std::fs::read_to_string(path)
                .with_context(|| format!("falha ao ler {}", path.display()))?;
            AnalyzerConfig::from_toml(&toml)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("configuração inválida em {}", path.display()))?
        }
        None => AnalyzerConfig::default(),
    };
    if let Some(model) = &cli.model {
        config.model_id = model.clone();
    }
    Ok(config)
}

/// Read a pre-extracted text file and split it into page chunks.
///
/// Pages are separated by form-feed characters, the convention of
/// `pdftotext` and similar extractors.
fn load_chunks(path: &Path, pages_per_chunk: usize) -> Result<Vec<DocumentChunk>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("falha ao ler {}", path.display()))?;
    let pages: Vec<String> = text.split('\u{0C}').map(chunking::clean_text).collect();
    let chunks = chunking::chunk_pages(&pages, pages_per_chunk);
    ensure!(
        !chunks.is_empty(),
        "nenhum texto encontrado em {}",
        path.display()
    );
    Ok(chunks)
}

async fn extract_document(
    analyzer: &Analyzer<FalClient>,
    path: &Path,
    pages_per_chunk: usize,
) -> Result<Vec<CreditorRecord>> {
    let label = document_label(path);
    let chunks = load_chunks(path, pages_per_chunk)?;
    let (creditors, _) = analyzer
        .extract_from_chunks(&chunks, &label, print_progress)
        .await?;
    Ok(creditors)
}

fn document_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "documento".to_owned())
}

fn print_progress(progress: ChunkProgress) {
    eprintln!(
        "{} bloco {}/{} (páginas {}-{})",
        "→".cyan(),
        progress.index + 1,
        progress.total,
        progress.start_page,
        progress.end_page
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_chunks_splits_on_form_feed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "página um\u{0C}página dois\u{0C}página três").unwrap();

        let chunks = load_chunks(file.path(), 2).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].start_page, 1);
        assert_eq!(chunks[0].end_page, 2);
        assert_eq!(chunks[1].start_page, 3);
        assert_eq!(chunks[1].total_pages, 3);
    }

    #[test]
    fn test_load_chunks_rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_chunks(file.path(), 20).is_err());
    }

    #[test]
    fn test_document_label_uses_file_stem() {
        assert_eq!(document_label(Path::new("/tmp/qgc_2024.txt")), "qgc_2024");
    }
}
