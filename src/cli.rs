// src/cli.rs
// =============================================================================
// This file defines the command-line interface using the `clap` crate.
//
// Two subcommands share the resolver policy flags:
// - check:  run the analysis and print positioned findings
// - report: print one line for every link, including the healthy ones
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::resolver::ResolverOptions;

#[derive(Parser, Debug)]
#[command(
    name = "linkscout",
    version = "0.1.0",
    about = "Checks Markdown documents for unreachable, locale-pinned, and missing-file links",
    long_about = "linkscout scans a Markdown document for inline and reference-style links, \
                  probes HTTP(S) targets for reachability, verifies that relative links point \
                  at files that exist, and flags locale-pinned addresses like /en-us/."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a Markdown document and print positioned findings
    ///
    /// Example: linkscout check README.md --allow-redirects
    Check {
        /// Path to the Markdown document to check
        file: PathBuf,

        /// Output findings in JSON format instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// Print one report line for every link in a Markdown document
    ///
    /// Example: linkscout report README.md
    Report {
        /// Path to the Markdown document to report on
        file: PathBuf,

        #[command(flatten)]
        resolver: ResolverArgs,
    },
}

/// Reachability policy flags, shared by both subcommands.
#[derive(Args, Debug)]
pub struct ResolverArgs {
    /// Treat redirected (3xx) links as reachable
    #[arg(long)]
    pub allow_redirects: bool,

    /// Treat 404/410 responses as reachable
    #[arg(long = "allow-404")]
    pub allow_404_pages: bool,

    /// HTTP status code to ignore when judging reachability (repeatable)
    #[arg(long = "ignore-status", value_name = "CODE")]
    pub ignore_status_codes: Vec<u16>,
}

impl ResolverArgs {
    pub fn into_options(self) -> ResolverOptions {
        ResolverOptions {
            allow_redirects: self.allow_redirects,
            allow_404_pages: self.allow_404_pages,
            ignore_status_codes: self.ignore_status_codes,
        }
    }
}
