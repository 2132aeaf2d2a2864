//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Análise inteligente de Quadros Gerais de Credores (QGC) com IA.
#[derive(Parser)]
#[command(name = "qgc", version, about)]
pub struct Cli {
    /// Chave da API fal.ai
    #[arg(long, env = "FAL_KEY", hide_env_values = true)]
    pub fal_key: String,

    /// Modelo de IA (substitui o da configuração)
    #[arg(long)]
    pub model: Option<String>,

    /// Páginas por bloco de extração
    #[arg(long, default_value_t = qgc_analyzer::chunking::DEFAULT_PAGES_PER_CHUNK)]
    pub pages_per_chunk: usize,

    /// Arquivo de configuração TOML do analisador
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Grava o resultado JSON neste arquivo em vez de stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extrai os credores de um documento QGC (texto pré-extraído)
    Extract {
        /// Arquivo de texto com páginas separadas por form-feed
        input: PathBuf,

        /// Rótulo do documento usado nos prompts e logs
        #[arg(long)]
        label: Option<String>,
    },

    /// Compara duas versões de um QGC
    Compare {
        /// Versão anterior do documento
        old: PathBuf,

        /// Versão atual do documento
        new: PathBuf,
    },
}
