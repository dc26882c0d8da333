use bookpatch::cli;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bookpatch")]
#[command(about = "Apply inspection records to an existing Excel workbook")]
#[command(long_about = "Bookpatch - batch updates for existing .xlsx workbooks

Matches each record to its row by a code value and to its columns by fuzzy
header names (case- and accent-insensitive, substring fallback), then writes
the record's field values into the matched cells.

COMMANDS:
  apply    - Apply a records file to a workbook and save the result
  headers  - Show which sheet is picked and the discovered header index
  find     - Locate the row a single code resolves to

EXAMPLES:
  bookpatch apply avisos.xlsx registros.json
  bookpatch apply avisos.xlsx registros.json --sheet PROGRAMACION -o out.xlsx
  bookpatch headers avisos.xlsx --sheet PROGRAMACION
  bookpatch find avisos.xlsx 1001")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Apply a records file to a workbook.

The records file is a JSON array of objects mapping field labels to string
values. Every record must carry a non-empty \"Código\" field - that value
locates the target row. All other fields are matched against the sheet's
header row; unmatched fields are dropped, empty values leave cells alone.

Records whose code matches no row are reported and skipped; the rest of the
batch still applies (no rollback).

EXAMPLE RECORDS FILE:
  [
    {\"Código\": \"1001\", \"Estado\": \"GESTIONADO\", \"Acta firmada\": \"SI\"},
    {\"Código\": \"1002\", \"Estado\": \"EN GESTION\"}
  ]")]
    /// Apply a records file to a workbook and save the result
    Apply {
        /// Path to the workbook (.xlsx)
        workbook: PathBuf,

        /// Path to the records file (JSON array of label→value objects)
        records: PathBuf,

        /// Worksheet name to update (fuzzy-matched)
        #[arg(short, long, default_value = "PROGRAMACION", env = "BOOKPATCH_SHEET")]
        sheet: String,

        /// Output workbook path
        #[arg(short, long, default_value = "resultado_actualizado.xlsx")]
        output: PathBuf,

        /// Emit the per-record report as JSON instead of the summary
        #[arg(long)]
        json: bool,

        /// Show per-record application steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show which sheet is picked and the discovered header index
    Headers {
        /// Path to the workbook (.xlsx)
        workbook: PathBuf,

        /// Worksheet name to inspect (fuzzy-matched)
        #[arg(short, long, default_value = "PROGRAMACION", env = "BOOKPATCH_SHEET")]
        sheet: String,
    },

    /// Locate the row a single code resolves to
    Find {
        /// Path to the workbook (.xlsx)
        workbook: PathBuf,

        /// Code value to look up
        code: String,

        /// Worksheet name to search (fuzzy-matched)
        #[arg(short, long, default_value = "PROGRAMACION", env = "BOOKPATCH_SHEET")]
        sheet: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            workbook,
            records,
            sheet,
            output,
            json,
            verbose,
        } => cli::apply(workbook, records, sheet, output, json, verbose)?,

        Commands::Headers { workbook, sheet } => cli::headers(workbook, sheet)?,

        Commands::Find {
            workbook,
            code,
            sheet,
        } => cli::find(workbook, code, sheet)?,
    }

    Ok(())
}
