//! PASC checker CLI
//!
//! Usage: pasc [OPTIONS] <input>

use anyhow::Context;
use clap::Parser as ClapParser;
use pasc_frontend::common::DiagnosticReporter;
use pasc_frontend::driver::{CheckConfig, check_source};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "pasc")]
#[command(author = "PASC Team")]
#[command(version = "0.1.0")]
#[command(about = "Semantic checker for the PASC procedural language", long_about = None)]
struct Args {
    /// Input source file (.pas)
    #[arg(required = true)]
    input: PathBuf,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,

    /// Dump the syntax tree (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Trace scope enter/leave events and dump scope tables
    #[arg(long)]
    trace_scopes: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = CheckConfig {
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        trace_scopes: args.trace_scopes,
        verbose: args.verbose,
    };

    if args.verbose {
        eprintln!("Checking {}", args.input.display());
    }

    check_source(&source, &config, &reporter, file_id)?;

    if args.verbose {
        eprintln!("No errors in {}", args.input.display());
    }
    Ok(())
}
