//! lox-cli — internal library behind the `lox` binary
//!
//! Keeps argument parsing in `main.rs` and everything testable here:
//! - reading a listing (file or stdin) and assembling it into a chunk
//! - rendering the chunk as the text trace or as JSON (`json` feature)
//! - writing the result to stdout or a file
//! - logger setup (`trace` feature)

#![deny(unused_must_use)]
#![forbid(unsafe_code)]

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use log::{debug, info};

use lox_core::{asm, bytecode::Chunk, disasm};

// ───────────────────────────── Public types ─────────────────────────────

/// High-level command, already parsed.
#[derive(Clone, Debug)]
pub enum Command {
    /// Trace of the built-in reference chunk.
    Demo(DemoTask),
    /// Assemble a listing and print its trace.
    Disasm(DisasmTask),
}

/// Where the listing comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Input {
    /// Read everything from stdin.
    #[default]
    Stdin,
    /// Read a file.
    Path(PathBuf),
}

/// Where the rendered text goes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Output {
    /// Print to stdout.
    #[default]
    Stdout,
    /// Write a file, creating parent directories.
    Path(PathBuf),
}

/// Rendering of a chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Fixed-width trace.
    #[default]
    Text,
    /// One JSON object per instruction, in an array.
    Json,
}

/// `lox demo`
#[derive(Clone, Debug, Default)]
pub struct DemoTask {
    /// Destination.
    pub output: Output,
    /// Rendering.
    pub format: Format,
}

/// `lox disasm`
#[derive(Clone, Debug, Default)]
pub struct DisasmTask {
    /// Listing source.
    pub input: Input,
    /// Destination.
    pub output: Output,
    /// Header name; defaults to the input file stem or `<stdin>`.
    pub name: Option<String>,
    /// Rendering.
    pub format: Format,
}

/// Name printed in the demo header.
pub const DEMO_NAME: &str = "test chunk";

// ───────────────────────────── Setup ─────────────────────────────

/// Sets up the logger when the `trace` feature is on (`RUST_LOG` wins).
pub fn init_logger(default_level: &str) {
    #[cfg(feature = "trace")]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_secs()
            .try_init();
    }
    #[cfg(not(feature = "trace"))]
    {
        let _ = default_level;
    }
}

// ───────────────────────────── Execution ─────────────────────────────

/// Runs a command to completion.
pub fn execute(cmd: Command) -> Result<()> {
    match cmd {
        Command::Demo(t) => demo_entry(&t),
        Command::Disasm(t) => disasm_entry(&t),
    }
}

fn demo_entry(task: &DemoTask) -> Result<()> {
    let chunk = lox_core::reference_chunk().context("building the demo chunk")?;
    let text = render(&chunk, DEMO_NAME, task.format)?;
    write_output(&task.output, &text)
}

fn disasm_entry(task: &DisasmTask) -> Result<()> {
    let source = read_input(&task.input)?;
    let name = task.name.clone().unwrap_or_else(|| default_name(&task.input));
    let chunk = asm::assemble(&source).with_context(|| format!("assembling {name}"))?;
    info!("{name}: {} bytes, {} constants", chunk.len(), chunk.constants().len());
    let text = render(&chunk, &name, task.format)?;
    write_output(&task.output, &text)
}

/// Renders `chunk` in the requested format.
pub fn render(chunk: &Chunk, name: &str, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(disasm::disassemble_chunk(chunk, name)),
        Format::Json => render_json(chunk),
    }
}

#[cfg(feature = "json")]
fn render_json(chunk: &Chunk) -> Result<String> {
    let rows = disasm::decode_listing(chunk);
    let mut text = serde_json::to_string_pretty(&rows).context("JSON serialization")?;
    text.push('\n');
    Ok(text)
}

#[cfg(not(feature = "json"))]
fn render_json(_chunk: &Chunk) -> Result<String> {
    anyhow::bail!("JSON output unavailable (feature `json` disabled)")
}

// ───────────────────────────── I/O ─────────────────────────────

/// Header name derived from the input.
pub fn default_name(input: &Input) -> String {
    match input {
        Input::Stdin => "<stdin>".into(),
        Input::Path(p) => p
            .file_stem()
            .map_or_else(|| p.display().to_string(), |s| s.to_string_lossy().into_owned()),
    }
}

/// Reads the whole listing.
pub fn read_input(input: &Input) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).context("reading stdin")?;
            Ok(s)
        }
        Input::Path(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
    }
}

/// Writes `text` to the destination.
pub fn write_output(output: &Output, text: &str) -> Result<()> {
    match output {
        Output::Stdout => {
            let mut out = io::stdout().lock();
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
        Output::Path(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(p, text).with_context(|| format!("writing {}", p.display()))?;
            debug!("wrote {} bytes to {}", text.len(), p.display());
        }
    }
    Ok(())
}
