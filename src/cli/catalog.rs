use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::{load_corpus, OutputFormat, DEFAULT_DAT_DIR};

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List loaded catalogs in search order, with entry counts
    List {
        /// Directory holding the DAT catalogs
        #[arg(long, default_value = DEFAULT_DAT_DIR)]
        dat_dir: PathBuf,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog directory cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: CatalogArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { dat_dir } => list_catalogs(&dat_dir, format),
    }
}

fn list_catalogs(dat_dir: &std::path::Path, format: OutputFormat) -> anyhow::Result<()> {
    let corpus = load_corpus(dat_dir)?;

    match format {
        OutputFormat::Text => {
            println!("{:<60} {:>10}", "Catalog", "Entries");
            println!("{}", "-".repeat(71));
            for document in corpus.documents() {
                println!("{:<60} {:>10}", document.id.as_str(), document.len());
            }
            println!();
            println!(
                "Total: {} catalogs, {} entries",
                corpus.len(),
                corpus.entry_count()
            );
            for failure in corpus.failures() {
                println!("Failed: {} ({})", failure.catalog, failure.error);
            }
        }
        OutputFormat::Json => {
            let catalogs: Vec<serde_json::Value> = corpus
                .documents()
                .iter()
                .map(|d| serde_json::json!({ "catalog": d.id, "entries": d.len() }))
                .collect();
            let failures: Vec<serde_json::Value> = corpus
                .failures()
                .iter()
                .map(|f| serde_json::json!({ "catalog": f.catalog, "error": f.error.to_string() }))
                .collect();
            let output = serde_json::json!({
                "catalogs": catalogs,
                "failures": failures,
                "total_entries": corpus.entry_count(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("catalog\tentries\terror");
            for document in corpus.documents() {
                println!("{}\t{}\t", document.id, document.len());
            }
            for failure in corpus.failures() {
                println!("{}\t\t{}", failure.catalog, failure.error);
            }
        }
    }

    Ok(())
}
