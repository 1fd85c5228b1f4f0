use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Args;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::catalog::corpus::Corpus;
use crate::cli::{load_corpus, OutputFormat, DEFAULT_DAT_DIR};
use crate::core::result::{VerificationResult, VerificationStatus};
use crate::core::types::MatchMethod;
use crate::utils::paths::split_dropped_paths;
use crate::verify::orchestrator::{VerificationBatch, Verifier};

#[derive(Args)]
pub struct VerifyArgs {
    /// Files or folders to verify; folders are searched recursively.
    /// With no paths, prompts for drag-and-dropped paths
    pub paths: Vec<PathBuf>,

    /// Directory holding the DAT catalogs
    #[arg(long, default_value = DEFAULT_DAT_DIR)]
    pub dat_dir: PathBuf,

    /// How to pick a title when a hash is catalogued more than once
    /// [default: accurate]
    #[arg(short, long, value_enum)]
    pub match_method: Option<MatchMethod>,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Execute verify subcommand
///
/// # Errors
///
/// Returns an error if the catalogs cannot be loaded or the prompt cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: VerifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (inputs, method) = if args.paths.is_empty() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let inputs = prompt_for_paths(&mut input)?;
        let method = match args.match_method {
            Some(method) => method,
            None => prompt_for_method(&mut input)?,
        };
        (inputs, method)
    } else {
        (args.paths.clone(), args.match_method.unwrap_or_default())
    };

    let files = expand_inputs(&inputs);
    if files.is_empty() {
        eprintln!("No files to verify.");
        return Ok(());
    }

    let corpus = load_corpus(&args.dat_dir)?;

    if verbose {
        eprintln!(
            "Verifying {} files with {method} matching against {} catalogs",
            files.len(),
            corpus.len()
        );
    }

    let batch = run_with_interrupt(corpus, files, method, args.jobs, format)?;

    if batch.interrupted {
        eprintln!(
            "Interrupted: {} files were not verified.",
            batch.skipped
        );
    }

    Ok(())
}

/// Run the batch on a blocking thread, cancelling it on Ctrl-C.
///
/// Output is rendered before returning so results gathered before an
/// interrupt are still reported.
fn run_with_interrupt(
    corpus: Corpus,
    files: Vec<PathBuf>,
    method: MatchMethod,
    jobs: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<VerificationBatch> {
    let rt = tokio::runtime::Runtime::new()?;

    let (batch, corpus) = rt.block_on(async move {
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);

        let mut task = tokio::task::spawn_blocking(move || {
            let batch = verify_files(&corpus, &files, method, jobs, worker_cancel);
            batch.map(|batch| (batch, corpus))
        });

        tokio::select! {
            joined = &mut task => joined,
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, finishing files in progress");
                cancel.store(true, Ordering::Relaxed);
                task.await
            }
        }
    })??;

    match format {
        OutputFormat::Text => print_text_results(&batch),
        OutputFormat::Json => print_json_results(&batch, &corpus)?,
        OutputFormat::Tsv => print_tsv_results(&batch),
    }

    Ok(batch)
}

fn verify_files(
    corpus: &Corpus,
    files: &[PathBuf],
    method: MatchMethod,
    jobs: Option<usize>,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<VerificationBatch> {
    let verifier = Verifier::new(corpus, method).with_cancel(cancel);

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build()?;

    Ok(pool.install(|| verifier.verify(files)))
}

/// Expand folders into the files beneath them, in file-name order.
///
/// Anything that is not a folder is kept as given, so a missing path still
/// gets a result (a hash failure) instead of vanishing from the report.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(files_under(input));
        } else {
            files.push(input.clone());
        }
    }

    files
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Ask for drag-and-dropped paths, separated by `*`
fn prompt_for_paths(input: &mut impl BufRead) -> anyhow::Result<Vec<PathBuf>> {
    println!("Drag 'n Drop your ISO or folder");
    println!("If you want to verify multiple items, separate them by an asterisk ( * )");
    print!("\n> ");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let paths = split_dropped_paths(&line);
    debug!("Prompt gave {} paths", paths.len());
    Ok(paths)
}

/// Ask for the match method; anything unrecognised falls back to the default
fn prompt_for_method(input: &mut impl BufRead) -> anyhow::Result<MatchMethod> {
    println!("\nWhich method would you like to run?");
    println!("1: (default) Accurate name match; searches all catalogs for the title most similar to the file name.");
    println!("2: Fast match; stops at the first catalog containing the hash, the title (and even system) may be off.");
    print!("\n> ");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(parse_method_choice(&line))
}

fn parse_method_choice(choice: &str) -> MatchMethod {
    match choice.trim() {
        "" | "1" => MatchMethod::Accurate,
        "2" => MatchMethod::Fast,
        other => {
            println!("Matching method '{other}' not recognised. Using default.");
            MatchMethod::default()
        }
    }
}

fn print_text_results(batch: &VerificationBatch) {
    for result in &batch.results {
        println!("\nISO: {}", result.path);
        if let Some(hash) = &result.hash {
            println!("MD5: {hash}");
        }
        match &result.status {
            VerificationStatus::Verified { title, catalog, .. } => {
                println!("Game verified, MD5 matches catalog entry");
                println!("Title: {title} ({catalog})");
            }
            VerificationStatus::Unverified => {
                println!("MD5 doesn't match any catalog entry");
            }
            VerificationStatus::HashFailure { reason } => {
                println!("Could not hash file: {reason}");
            }
        }
        println!("{}", "─".repeat(40));
    }

    println!("\nSummary ({} of {} verified):\n", batch.verified_count(), batch.results.len());
    for result in &batch.results {
        println!("{} - {}", result.file_name(), result.status.label());
        if let Some(hash) = &result.hash {
            println!("{hash}");
        }
    }
}

fn print_json_results(batch: &VerificationBatch, corpus: &Corpus) -> anyhow::Result<()> {
    let failures: Vec<serde_json::Value> = corpus
        .failures()
        .iter()
        .map(|f| {
            serde_json::json!({
                "catalog": f.catalog,
                "error": f.error.to_string(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "results": batch.results,
        "verified": batch.verified_count(),
        "interrupted": batch.interrupted,
        "skipped": batch.skipped,
        "catalog_failures": failures,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(batch: &VerificationBatch) {
    println!("path\tstatus\ttitle\tcatalog\tscore\tmd5");
    for result in &batch.results {
        println!("{}", tsv_row(result));
    }
}

fn tsv_row(result: &VerificationResult) -> String {
    let hash = result.hash.as_deref().unwrap_or("");
    match &result.status {
        VerificationStatus::Verified {
            title,
            catalog,
            score,
        } => {
            let score = score.map(|s| format!("{s:.4}")).unwrap_or_default();
            format!("{}\tverified\t{title}\t{catalog}\t{score}\t{hash}", result.path)
        }
        VerificationStatus::Unverified => format!("{}\tunverified\t\t\t\t{hash}", result.path),
        VerificationStatus::HashFailure { .. } => format!("{}\thash_failure\t\t\t\t", result.path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_choice() {
        assert_eq!(parse_method_choice("1\n"), MatchMethod::Accurate);
        assert_eq!(parse_method_choice("2\n"), MatchMethod::Fast);
        assert_eq!(parse_method_choice("\n"), MatchMethod::Accurate);
        assert_eq!(parse_method_choice("fast\n"), MatchMethod::Accurate);
    }

    #[test]
    fn test_prompt_reads_dropped_paths() {
        let mut input = io::Cursor::new("'/isos/a b.iso' * /isos/c.iso\n2\n");
        let paths = prompt_for_paths(&mut input).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("/isos/a b.iso"), PathBuf::from("/isos/c.iso")]
        );
        assert_eq!(prompt_for_method(&mut input).unwrap(), MatchMethod::Fast);
    }

    #[test]
    fn test_expand_inputs_recurses_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("b.iso"), b"b").unwrap();
        std::fs::write(root.join("a.iso"), b"a").unwrap();
        std::fs::write(root.join("sub").join("c.iso"), b"c").unwrap();
        let single = root.join("a.iso");

        let files = expand_inputs(&[root.to_path_buf(), root.join("missing.iso"), single.clone()]);
        assert_eq!(
            files,
            vec![
                root.join("a.iso"),
                root.join("b.iso"),
                root.join("sub").join("c.iso"),
                root.join("missing.iso"),
                single,
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_inputs_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.iso");
        std::fs::write(&real, b"data").unwrap();

        let folder = dir.path().join("folder");
        std::fs::create_dir_all(&folder).unwrap();
        std::os::unix::fs::symlink(&real, folder.join("linked.iso")).unwrap();

        assert_eq!(expand_inputs(&[folder.clone()]), vec![folder.join("linked.iso")]);
    }

    #[test]
    fn test_tsv_row() {
        let failed = VerificationResult::hash_failure("/x.iso", "gone");
        assert_eq!(tsv_row(&failed), "/x.iso\thash_failure\t\t\t\t");

        let unverified = VerificationResult::hashed("/y.iso", "00ff".to_string(), None);
        assert_eq!(tsv_row(&unverified), "/y.iso\tunverified\t\t\t\t00ff");
    }
}
