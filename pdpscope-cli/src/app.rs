use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pdpscope - PDP-11 a.out inspection, disassembly, and control-flow analysis
#[derive(Debug, Parser)]
#[command(name = "pdpscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where and how to scan the text segment.
#[derive(Debug, Args)]
pub struct ScanOptions {
    /// Load address of the first text byte (octal with 0 or 0o prefix, hex with 0x).
    #[arg(long, value_parser = parse_number, default_value = "0")]
    pub base: u64,

    /// File offset to start decoding at (default: the a.out header size).
    #[arg(long, value_parser = parse_number)]
    pub start: Option<u64>,

    /// File offset to stop decoding at (default: the end of the text segment).
    #[arg(long, value_parser = parse_number)]
    pub end: Option<u64>,

    /// Recognize only the instruction groups of the narrow decoder.
    #[arg(long)]
    pub minimal: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display the a.out header: magic, segment sizes, entry point.
    Info {
        /// Path to the a.out executable.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Disassemble the text segment (Unix `as` syntax, octal).
    Disasm {
        /// Path to the a.out executable.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        scan: ScanOptions,

        /// Hide the raw opcode and extension words.
        #[arg(long)]
        no_words: bool,

        /// Omit function banners and branch labels.
        #[arg(long)]
        no_labels: bool,
    },

    /// Summarize control flow: functions, call and branch targets, system calls.
    Flow {
        /// Path to the a.out executable.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        scan: ScanOptions,
    },

    /// Display the function-level call graph.
    Callgraph {
        /// Path to the a.out executable.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        #[command(flatten)]
        scan: ScanOptions,

        /// Output format: text, mermaid, json.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List printable strings in the file.
    Strings {
        /// Path to the a.out executable.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Minimum string length.
        #[arg(short = 'n', long, default_value_t = pdpscope::analysis::DEFAULT_MIN_LEN)]
        min_len: usize,
    },

    /// Solve tic-tac-toe and report game-tree statistics.
    Ttt {
        /// Position to analyze: nine cells of X, O and '.', rows optionally split by '/'.
        #[arg(long, value_name = "CELLS")]
        board: Option<String>,
    },
}

/// Parses `0x` hex, `0o` or leading-zero octal, or decimal.
pub fn parse_number(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if let Some(octal) = s.strip_prefix("0o") {
        u64::from_str_radix(octal, 8)
    } else if s.len() > 1 && s.starts_with('0') {
        u64::from_str_radix(&s[1..], 8)
    } else {
        s.parse::<u64>()
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}
