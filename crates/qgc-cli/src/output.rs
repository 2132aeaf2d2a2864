//! Result rendering: JSON to stdout or file, summaries to stderr

use anyhow::{Context, Result};
use colored::Colorize;
use qgc_domain::{ComparisonSummary, CreditorRecord};
use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// JSON envelope for a single-document extraction run.
#[derive(Serialize)]
pub struct ExtractionReport<'a> {
    pub creditors: &'a [CreditorRecord],
    pub unique_count: usize,
    pub pre_consolidation_count: usize,
}

/// Write a result as pretty JSON to the given path, or stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("falha ao serializar o resultado")?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("falha ao escrever {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

pub fn print_extraction_summary(report: &ExtractionReport<'_>) {
    eprintln!(
        "{} {} credores únicos ({} extraídos antes da consolidação)",
        "✓".green(),
        report.unique_count.to_string().bold(),
        report.pre_consolidation_count
    );
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "métrica")]
    metric: &'static str,
    #[tabled(rename = "credores")]
    count: usize,
}

pub fn print_comparison_summary(summary: &ComparisonSummary) {
    let rows = vec![
        SummaryRow { metric: "versão anterior", count: summary.total_old },
        SummaryRow { metric: "versão atual", count: summary.total_new },
        SummaryRow { metric: "novos", count: summary.new_count },
        SummaryRow { metric: "removidos", count: summary.removed_count },
        SummaryRow { metric: "modificados", count: summary.modified_count },
        SummaryRow { metric: "inalterados", count: summary.unchanged_count },
    ];

    eprintln!("{}", Table::new(rows));
    eprintln!(
        "{} novos  {} removidos  {} modificados  {} inalterados",
        summary.new_count.to_string().green(),
        summary.removed_count.to_string().red(),
        summary.modified_count.to_string().yellow(),
        summary.unchanged_count
    );
}
