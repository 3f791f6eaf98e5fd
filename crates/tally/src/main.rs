//! tally - Turn cucumber JSON reports into a static report site
//!
//! tally loads every cucumber JSON file under a directory, merges background
//! steps into their scenarios, and summarizes results by feature, tag and
//! scenario. The summary is printed; the full site is written when an output
//! directory is configured.

use clap::Parser;
use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tally::output::{OutputFormat, render_summary};
use tally::site::{HtmlRenderer, PageLayout, write_site};
use tally::{CONFIG_PATH, find_project_root, load_config, load_config_or_default, load_reports};
use tally_core::Generation;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "tally", version, about)]
struct Args {
    /// Directory holding cucumber JSON reports (overrides `source` in the config)
    source: Option<PathBuf>,

    /// Path to config file (default: .config/tally/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to write the report site to (overrides `output` in the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit 1 if any scenario failed
    #[arg(long)]
    check: bool,

    /// Show per-feature and per-tag breakdowns, and debug logs
    #[arg(short, long)]
    verbose: bool,

    /// Output format: text, json, markdown, html
    #[arg(short, long)]
    format: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "tally=debug,tally_core=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let project_root = find_project_root()?;

    // An explicit config must exist; the default one is optional
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_config_or_default(&project_root.join(CONFIG_PATH))?,
    };

    let format = match args.format.as_deref() {
        Some(f) => OutputFormat::parse(f).ok_or_else(|| {
            eyre::eyre!("Unknown output format '{}' (expected text, json, markdown or html)", f)
        })?,
        None => OutputFormat::default(),
    };

    let source = match (&args.source, &config.source) {
        (Some(source), _) => source.clone(),
        (None, Some(source)) => project_root.join(source),
        (None, None) => eyre::bail!(
            "No report directory given. Pass one as an argument or set `source` in {}",
            CONFIG_PATH
        ),
    };
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output.as_ref().map(|o| project_root.join(o)));

    eprintln!(
        "{} Loading reports from {}...",
        "->".blue().bold(),
        source.display()
    );
    let loaded = load_reports(&source, &config)?;
    eprintln!(
        "   Found {} reports in {} files",
        loaded.reports.len().to_string().green(),
        loaded.files
    );

    if !loaded.warnings.is_empty() {
        eprintln!(
            "{} {} warnings:",
            "!".yellow().bold(),
            loaded.warnings.len()
        );
        for warning in &loaded.warnings {
            eprintln!("   {}", warning);
        }
    }

    let generation = Generation::run(loaded.reports).wrap_err("Failed to generate report")?;

    let summary = render_summary(&generation, config.title(), format, args.verbose)?;
    print!("{}", summary);

    if let Some(output_dir) = output_dir {
        let layout = PageLayout::new(&output_dir);
        let stats = write_site(&generation, &layout, &HtmlRenderer, config.title())?;
        eprintln!(
            "{} Wrote {} pages to {}",
            "OK".green().bold(),
            stats.pages,
            output_dir.display()
        );
    }

    if args.check && !generation.is_passing() {
        std::process::exit(1);
    }

    Ok(())
}
