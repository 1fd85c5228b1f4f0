use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_corpus, OutputFormat, DEFAULT_DAT_DIR};
use crate::core::types::MatchMethod;
use crate::matching::engine::matcher_for;
use crate::utils::validation::normalize_md5;

#[derive(Args)]
pub struct LookupArgs {
    /// MD5 of the image (32 hex characters)
    #[arg(required = true)]
    pub md5: String,

    /// File name used to rank candidate titles (accurate method only)
    #[arg(long, default_value = "")]
    pub name: String,

    /// Directory holding the DAT catalogs
    #[arg(long, default_value = DEFAULT_DAT_DIR)]
    pub dat_dir: PathBuf,

    /// How to pick a title when the hash is catalogued more than once
    #[arg(short, long, value_enum, default_value_t = MatchMethod::Accurate)]
    pub match_method: MatchMethod,
}

/// Execute lookup subcommand
///
/// # Errors
///
/// Returns an error if the hash is not a valid MD5 or the catalogs cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LookupArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let hash = normalize_md5(args.md5.trim())
        .ok_or_else(|| anyhow::anyhow!("'{}' is not a valid MD5 (expected 32 hex characters)", args.md5))?;

    let corpus = load_corpus(&args.dat_dir)?;
    if verbose {
        eprintln!(
            "Looking up {hash} in {} catalogs ({} matching)",
            corpus.len(),
            args.match_method
        );
    }

    let found = matcher_for(args.match_method).find_title(&corpus, &hash, &args.name);

    match format {
        OutputFormat::Text => match &found {
            Some(m) => {
                println!("{} ({})", m.title, m.source);
                if let Some(score) = m.score {
                    println!("   Name similarity: {:.1}%", score * 100.0);
                }
            }
            None => println!("No catalog entry has MD5 {hash}"),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({
                "md5": hash,
                "match": found,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("md5\ttitle\tcatalog\tscore");
            if let Some(m) = &found {
                let score = m.score.map(|s| format!("{s:.4}")).unwrap_or_default();
                println!("{hash}\t{}\t{}\t{score}", m.title, m.source);
            }
        }
    }

    Ok(())
}
