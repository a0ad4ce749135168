//! Table Extraction Example
//!
//! Prints the bordered table found on the first sheet of a workbook.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example extract_table -- input.xlsx [--format plain|markdown|csv|json]
//! RUST_LOG=debug cargo run --example extract_table -- input.xlsx
//! ```

use std::io::{self, Write};
use std::process;

use xlsxtable::{ExtractorBuilder, OutputFormat, TableRenderer, XlsxTableError};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <input.xlsx> [options]", args[0]);
        eprintln!("\nOptions:");
        eprintln!("  --format <fmt>   plain (default), markdown, csv or json");
        eprintln!("\nExamples:");
        eprintln!("  {} report.xlsx", args[0]);
        eprintln!("  {} report.xlsx --format markdown", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];

    // Parse options
    let mut format = OutputFormat::Plain;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --format requires a value");
                    process::exit(1);
                };
                format = value.parse().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                });
                i += 2;
            }
            other => {
                eprintln!("Error: Unknown option: {}", other);
                process::exit(1);
            }
        }
    }

    if let Err(e) = print_table(input_path, format) {
        handle_error(e);
        process::exit(1);
    }
}

fn print_table(input_path: &str, format: OutputFormat) -> Result<(), XlsxTableError> {
    let extractor = ExtractorBuilder::new().build()?;
    let table = extractor.extract_path(input_path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    TableRenderer::new(format).render(&table, &mut handle)?;
    handle.flush()?;

    Ok(())
}

fn handle_error(error: XlsxTableError) {
    match error {
        XlsxTableError::NoTableFound { sheet } => {
            eprintln!("No table found in sheet '{}'.", sheet);
            eprintln!("Only cells with a border are treated as part of the table.");
        }
        XlsxTableError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        XlsxTableError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid XLSX file or may be corrupted.");
        }
        XlsxTableError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates input limits (e.g., file size limit).");
        }
        other => eprintln!("Error: {}", other),
    }
}
