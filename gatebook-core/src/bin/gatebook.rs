//! Gatebook command-line presenter
//!
//! Loads a directory data file, applies a category filter and search query,
//! and prints the resulting groups.
//!
//! ## Usage
//!
//! ```bash
//! # Residential addresses, grouped
//! gatebook data.json
//!
//! # Businesses matching "plumbing", as JSON
//! gatebook data.json --filter businesses --query plumbing --json
//!
//! # Alphabetical groups with every group open
//! gatebook data.json --filter all --sort name --expand-all
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gatebook_core::index::{maps_link, DirectoryView};
use gatebook_core::{load_path, Directory, ViewState};
use gatebook_types::{CategoryFilter, DirectoryConfig, GroupSort};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const UNAVAILABLE_MESSAGE: &str = "Could not load data. Refresh and try again.";

#[derive(Parser, Debug)]
#[command(name = "gatebook")]
#[command(version, about = "Browse gate and access codes by community")]
struct Args {
    /// Path to the JSON data file
    data: PathBuf,

    /// Category to show: all, apartments, businesses or residential
    #[arg(short, long, default_value = "residential")]
    filter: CategoryFilter,

    /// Free-text search across addresses, labels, codes and notes
    #[arg(short, long, default_value = "")]
    query: String,

    /// Group order: count (largest first) or name
    #[arg(long)]
    sort: Option<GroupSort>,

    /// JSON configuration file (fallback labels, auto-expand limits, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the records of every group, not just expanded ones
    #[arg(long)]
    expand_all: bool,

    /// Print the view as JSON
    #[arg(long)]
    json: bool,

    /// Print directory statistics after loading
    #[arg(long)]
    stats: bool,
}

fn load_config(args: &Args) -> Result<DirectoryConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            DirectoryConfig::from_json_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => DirectoryConfig::default(),
    };
    if let Some(sort) = args.sort {
        config.group_sort = sort;
    }
    Ok(config)
}

fn print_text(view: &DirectoryView<'_>) {
    println!("{}", view.summary);
    for group in &view.groups {
        let open = group.expanded;
        let chevron = if open { "⌄" } else { "›" };
        if group.meta.is_empty() {
            println!("{chevron} {} ({})", group.name, group.len());
        } else {
            println!("{chevron} {} ({}) · {}", group.name, group.len(), group.meta);
        }
        if !open {
            continue;
        }
        for record in &group.items {
            let code = if record.gate_code.is_empty() {
                "-"
            } else {
                record.gate_code.as_str()
            };
            println!("    {:<40} {code}", record.display_address());
            let extras = [
                ("alt", &record.alternate_code),
                ("locker", &record.locker_code),
                ("city", &record.city),
                ("notes", &record.notes),
            ];
            for (label, value) in extras {
                if !value.is_empty() {
                    println!("        {label}: {value}");
                }
            }
            if !record.display_address().is_empty() {
                println!("        map: {}", maps_link(record.display_address()));
            }
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;

    let (directory, unavailable) = match load_path(&args.data, config.clone()) {
        Ok(directory) => (directory, false),
        Err(e) => {
            tracing::warn!(error = %e, path = %args.data.display(), "data source unavailable");
            (Directory::empty(config), true)
        }
    };

    if args.stats {
        eprintln!("{}", directory.stats());
    }

    let mut state = ViewState::new(args.filter).with_query(&directory, &args.query);
    if args.expand_all {
        let names: Vec<String> = directory
            .view(&state)
            .groups
            .into_iter()
            .map(|group| group.name)
            .collect();
        state = state.expand_all(names.iter().map(String::as_str));
    }
    let view = directory.view(&state);

    if args.json {
        let json = serde_json::to_string_pretty(&view).context("Failed to serialize view")?;
        println!("{json}");
    } else {
        print_text(&view);
    }

    if unavailable {
        eprintln!("{UNAVAILABLE_MESSAGE}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
