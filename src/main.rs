// src/main.rs
// =============================================================================
// This is the entry point of the CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the document and wire the real collaborators together
//    (HTTP resolver, local filesystem, stdout presenter)
// 3. Run the analysis or the full report
// 4. Exit with proper code (0 = clean, 1 = broken links, 2 = error)
// =============================================================================

mod analysis;
mod cli;
mod document;
mod report;
mod resolver;

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use analysis::{AnalysisCoordinator, AnalysisOutcome, Inspection, LocalFiles};
use cli::{Cli, Commands};
use document::Document;
use report::{Report, StdoutPresenter};
use resolver::{HttpResolver, ResolverOptions};

#[tokio::main]
async fn main() {
    env_logger::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {error:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = at least one Error-severity finding
//   Err   = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            file,
            json,
            resolver,
        } => handle_check(&file, json, resolver.into_options()).await,
        Commands::Report { file, resolver } => {
            handle_report(&file, resolver.into_options()).await
        }
    }
}

// Handles the 'check' subcommand: one analysis pass, findings to stdout.
async fn handle_check(file: &Path, json: bool, options: ResolverOptions) -> Result<i32> {
    let document = Document::load(file)?;

    let coordinator = AnalysisCoordinator::new(
        HttpResolver::new(),
        LocalFiles,
        StdoutPresenter::new(json),
        options,
    );

    let request = coordinator.begin(&document);
    match coordinator.run(&document, request).await {
        AnalysisOutcome::Published { errors, .. } => Ok(if errors > 0 { 1 } else { 0 }),
        AnalysisOutcome::NoLinks | AnalysisOutcome::Superseded => Ok(0),
        AnalysisOutcome::NotMarkdown => {
            eprintln!(
                "⚠️  {} is not a Markdown document; nothing to check",
                file.display()
            );
            Ok(0)
        }
    }
}

// Handles the 'report' subcommand: one line per link, healthy links included.
async fn handle_report(file: &Path, options: ResolverOptions) -> Result<i32> {
    let document = Document::load(file)?;

    let coordinator = AnalysisCoordinator::new(
        HttpResolver::new(),
        LocalFiles,
        StdoutPresenter::new(false),
        options,
    );

    println!("🔍 Checking links in {}", document.id());

    match coordinator.inspect(&document).await {
        Inspection::NotMarkdown => {
            eprintln!(
                "⚠️  {} is not a Markdown document; nothing to report",
                file.display()
            );
            Ok(0)
        }
        inspection => {
            let report = Report::new(inspection);
            if report.is_empty() {
                println!("✅ No links found to check");
                return Ok(0);
            }
            for line in report.lines() {
                println!("{line}");
            }
            Ok(if report.error_count() > 0 { 1 } else { 0 })
        }
    }
}
