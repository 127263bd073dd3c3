// SPDX-License-Identifier: Apache-2.0
//! cildiff: compute the structural difference between two SELinux CIL
//! policies.
//!
//! The report lists semantic additions and deletions only; statement order
//! in unordered contexts, anonymous-construct naming and formatting never
//! count as differences. Exit code 0 means the comparison ran (differences
//! found is still success); any failure exits non-zero with the offending
//! input named on stderr.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::dbg_macro
)]

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod input;

/// JSON output mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum JsonMode {
    /// Compact, one line.
    Compact,
    /// Indented.
    Pretty,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Format output as JSON instead of CIL with plain-text comments.
    #[arg(
        long,
        value_name = "pretty",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "compact",
        value_enum
    )]
    json: Option<JsonMode>,

    /// Left policy; '-' reads standard input. Plain or bzip2-compressed CIL.
    left: String,

    /// Right policy; '-' reads standard input. Plain or bzip2-compressed CIL.
    right: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cildiff: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let left_input = input::read_policy(&args.left)?;
    let right_input = input::read_policy(&args.right)?;

    let left_ast = cil_ast::parse_policy(&left_input.text, &left_input.path)
        .with_context(|| format!("failed to parse '{}'", left_input.path))?;
    let right_ast = cil_ast::parse_policy(&right_input.text, &right_input.path)
        .with_context(|| format!("failed to parse '{}'", right_input.path))?;

    let left_root = cil_cmp::build_root(&left_ast);
    let right_root = cil_cmp::build_root(&right_ast);
    let diff = cil_cmp::compare_roots(&left_root, &right_root)
        .context("comparison failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.json {
        Some(mode) => diff.write_json(&mut out, mode == JsonMode::Pretty)?,
        None => diff.write_text(&mut out)?,
    }
    out.flush().context("failed to write report")?;
    Ok(())
}
