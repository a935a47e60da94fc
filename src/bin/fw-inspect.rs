//! CLI tool to check a fixed-width table and show its column layout.
//!
//! Usage:
//!   fw-inspect <input.txt>
//!   fw-inspect <input.txt> -c Name -c "Credit Limit"
//!
//! Without `--column`, every whitespace-separated word of the header is
//! taken as a column name.

use clap::Parser;
use fixed_width::inspect;
use std::fs;
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

/// Validate a fixed-width table and print the span of each column.
#[derive(Parser)]
#[command(name = "fw-inspect")]
struct Cli {
    /// Input table (header line first, or /dev/stdin)
    input: String,

    /// Column name to locate in the header (repeatable)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// Log header resolution details on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let input_text = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input file '{}': {e}", cli.input);
            process::exit(1);
        }
    };

    let columns = if cli.columns.is_empty() {
        header_words(&input_text)
    } else {
        cli.columns.clone()
    };

    match inspect(input_text.as_bytes(), &columns) {
        Ok(layout) => {
            let mut out = io::stdout().lock();
            let mut report = String::new();
            for column in &layout.columns {
                report.push_str(&format!("{}\t{}\t{}\n", column.name, column.start, column.end));
            }
            if let Err(e) = out.write_all(report.as_bytes()) {
                eprintln!("Error writing output: {e}");
                process::exit(1);
            }
            for name in &columns {
                if !layout.columns.iter().any(|c| &c.name == name) {
                    eprintln!("Column not found: {name}");
                }
            }
            eprintln!(
                "Checked {} rows of {} characters",
                layout.rows, layout.line_len
            );
        }
        Err(e) => {
            eprintln!("Table error: {e}");
            process::exit(1);
        }
    }
}

/// Whitespace-separated words of the header line.
fn header_words(text: &str) -> Vec<String> {
    let header = text.lines().next().unwrap_or("");
    header.split_whitespace().map(str::to_string).collect()
}
