//! `lox` — assemble a listing and print its bytecode trace
//!
//! Only argument parsing, logger setup and delegation to `lox_cli` (lib) live
//! here.
//!
//! Examples:
//!   lox demo
//!   lox disasm prog.lasm
//!   cat prog.lasm | lox disasm - --name prog --json
//!   lox -vv disasm prog.lasm -o target/prog.trace.txt

#![forbid(unsafe_code)]

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use lox_cli as cli;

// ──────────────────────────── CLI (clap) ────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "lox", version, about = "lox — bytecode chunks: listing assembly and traces", long_about = None)]
struct Opt {
    /// Raise verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (overrides verbosity)
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, global = true)]
    quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Trace of the demo chunk (RETURN then the constant 1.2)
    Demo {
        /// Output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Structured JSON view instead of the trace
        #[arg(long)]
        json: bool,
    },

    /// Assemble a listing and print its trace
    Disasm {
        /// Listing (or - for stdin)
        input: Option<PathBuf>,
        /// Name shown in the header (default: file name)
        #[arg(long)]
        name: Option<String>,
        /// Output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Structured JSON view instead of the trace
        #[arg(long)]
        json: bool,
    },
}

// ──────────────────────────── Input / Output ────────────────────────────

fn input_from_opt(p: Option<PathBuf>) -> cli::Input {
    match p {
        Some(path) if path.as_os_str() == "-" => cli::Input::Stdin,
        Some(path) => cli::Input::Path(path),
        None => cli::Input::Stdin,
    }
}

fn output_from_opt(p: Option<PathBuf>) -> cli::Output {
    p.map_or(cli::Output::Stdout, cli::Output::Path)
}

const fn format_from_flag(json: bool) -> cli::Format {
    if json { cli::Format::Json } else { cli::Format::Text }
}

// ──────────────────────────── Logger / Verbosity ────────────────────────────

const fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

// ──────────────────────────── main ────────────────────────────

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> Result<()> {
    let opt = Opt::parse();
    cli::init_logger(log_level(opt.verbose, opt.quiet));

    let command = match opt.cmd {
        Command::Demo { output, json } => cli::Command::Demo(cli::DemoTask {
            output: output_from_opt(output),
            format: format_from_flag(json),
        }),
        Command::Disasm { input, name, output, json } => cli::Command::Disasm(cli::DisasmTask {
            input: input_from_opt(input),
            output: output_from_opt(output),
            name,
            format: format_from_flag(json),
        }),
    };

    cli::execute(command).context("command failed")
}
