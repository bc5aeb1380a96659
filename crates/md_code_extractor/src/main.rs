use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use md_code_extractor::{extract_with_report, ExtractConfig, ExtractReport};

const RULE: &str = "--------------------------------------------------";

#[derive(Parser, Debug)]
#[command(
    name = "md_code_extractor",
    version,
    about = "Extracts path-annotated fenced code blocks from a Markdown file into a folder tree"
)]
struct Cli {
    /// Markdown file containing the code blocks
    markdown_file: PathBuf,
    /// Folder to extract into ("." for the current directory)
    destination_folder: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = ExtractConfig::new(cli.markdown_file, cli.destination_folder);

    println!("Reading Markdown file: {}", config.markdown_path.display());
    println!("Output directory: {}", config.destination_root.display());
    println!("{}", RULE);

    let report = extract_with_report(&config).with_context(|| {
        format!(
            "Failed to extract code blocks from {}",
            config.markdown_path.display()
        )
    })?;

    print_report(&report);
    Ok(())
}

/// Logs go to stderr, filtered by `RUST_LOG` (warnings by default).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // The subscriber also receives `log` records from the library crates.
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_report(report: &ExtractReport) {
    for file in &report.written {
        println!("Created: {}", file.relative_path);
    }

    if report.written.is_empty() {
        println!("No path-annotated code blocks found.");
        println!("Put the file path on the line before each fence, for example:");
        println!("  ### src/main.rs");
        println!("  ## FILE 1: backend/index.ts");
        println!("followed by:");
        println!("  ```language");
        println!("  code content");
        println!("  ```");
    }

    println!("{}", RULE);
    println!("Files written: {}", report.files_written());
    println!("Directories created: {}", report.created_dirs.len());
    println!("Blocks skipped: {}", report.skipped.len());
    for skipped in &report.skipped {
        println!("  - line {}: {}", skipped.line, skipped.reason);
    }
    println!("{}", RULE);
}
