use std::path::PathBuf;
use std::process;

use chrono::{Duration, Utc};
use clap::Parser;

use arxiv_digest::config::RunConfig;
use arxiv_digest::parser::ArxivFetcher;
use arxiv_digest::query::DateWindow;
use arxiv_digest::storage::LocalSaver;
use arxiv_digest::Error;

/// Search arXiv for recently submitted and updated papers and write the
/// results as JSON and/or a markdown report.
#[derive(Debug, Parser)]
#[command(name = "arxiv-digest", version)]
struct Args {
    /// Start date, YYYY-MM-DD (default: seven days ago)
    #[arg(short, long)]
    start: Option<String>,

    /// End date, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    end: Option<String>,

    /// JSON search configuration (title, queries, vetoes, categories)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result set as pretty-printed JSON to this path
    #[arg(short, long)]
    json: Option<PathBuf>,

    /// Write a markdown report to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Collapse author lists longer than ten entries to a single credit
    #[arg(short, long)]
    truncate_authors: bool,
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    // Checked before any network call.
    if args.json.is_none() && args.report.is_none() {
        return Err(Error::MissingConfiguration(String::from(
            "no output target; pass --json and/or --report",
        )));
    }

    let config = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    let title = config.title.clone();

    let today = Utc::now().date_naive();
    let start = args
        .start
        .unwrap_or_else(|| (today - Duration::days(7)).format("%Y-%m-%d").to_string());
    let end = args
        .end
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());
    let window = DateWindow::new(&start, &end)?;

    let fetcher = ArxivFetcher::new(config, window);
    let mut results = fetcher.fetch()?;
    println!(
        "submitted: {}, last updated: {}",
        results.submitted.len(),
        results.last_updated.len()
    );

    if args.truncate_authors {
        for entry in results
            .submitted
            .iter_mut()
            .chain(results.last_updated.iter_mut())
        {
            entry.truncate_authors();
        }
    }

    if let Some(path) = &args.json {
        LocalSaver::save_results_as_json(path, &results)?;
    }
    if let Some(path) = &args.report {
        LocalSaver::save_results_as_report(path, &title, &results)?;
    }
    Ok(())
}
