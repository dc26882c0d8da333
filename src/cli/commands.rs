use crate::core::{build_header_index, locate_row, locate_sheet, reconcile};
use crate::error::PatchResult;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::{Outcome, Record};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Field label the per-date recap groups applied records by.
const DATE_LABEL: &str = "Fecha de ejecución";

/// Execute the apply command: import → reconcile → export.
pub fn apply(
    workbook: PathBuf,
    records_file: PathBuf,
    sheet: String,
    output: PathBuf,
    json: bool,
    verbose: bool,
) -> PatchResult<()> {
    if !json {
        println!("{}", "📄 Bookpatch - Applying records".bold().green());
        println!("   Workbook: {}", workbook.display());
        println!("   Records:  {}", records_file.display());
        println!("   Output:   {}\n", output.display());
    }

    let records: Vec<Record> = serde_json::from_str(&fs::read_to_string(&records_file)?)?;

    if verbose && !json {
        println!("{}", "📖 Reading workbook...".cyan());
    }

    let book = ExcelImporter::new(&workbook).import()?;

    if verbose && !json {
        println!("   Found {} worksheet(s): {:?}", book.len(), book.sheet_names());
        println!("   Applying {} record(s)\n", records.len());
    }

    let (book, report) = reconcile(book, &sheet, &records)?;

    ExcelExporter::new(&book).export(&output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "✅ Workbook updated with {} record(s)",
            report.applied_count()
        )
        .bold()
        .green()
    );
    println!("   Saved to: {}\n", output.display());

    let missing = report.missing_codes();
    if !missing.is_empty() {
        println!("{}", "⚠️  Codes without a matching row:".yellow());
        for code in &missing {
            println!("   • {code}");
        }
        println!();
    }

    if verbose {
        for (record, outcome) in records.iter().zip(&report.outcomes) {
            match outcome {
                Outcome::Applied { row } => {
                    println!("   {} {} → row {row}", "✓".green(), record.code())
                }
                Outcome::NotFound { code } => {
                    println!("   {} {code} not found", "✗".red())
                }
            }
        }
        println!();
    }

    print_date_recap(&records, &report.outcomes);

    Ok(())
}

/// Recap of applied codes grouped by execution date, most recent first.
fn print_date_recap(records: &[Record], outcomes: &[Outcome]) {
    let mut by_date: Vec<(&str, Vec<&str>)> = Vec::new();
    for (record, outcome) in records.iter().zip(outcomes) {
        if !matches!(outcome, Outcome::Applied { .. }) {
            continue;
        }
        let date = match record.get(DATE_LABEL) {
            Some(d) if !d.is_empty() => d,
            _ => "Sin fecha",
        };
        match by_date.iter_mut().find(|(d, _)| *d == date) {
            Some((_, codes)) => codes.push(record.code()),
            None => by_date.push((date, vec![record.code()])),
        }
    }
    if by_date.is_empty() {
        return;
    }

    by_date.sort_by(|(a, _), (b, _)| b.cmp(a));

    println!("{}", "📅 Applied codes by date".bold());
    for (date, codes) in by_date {
        println!("   {}", date.bright_blue().bold());
        for code in codes {
            println!("      • {code}");
        }
    }
    println!();
}

/// Execute the headers command: show the located sheet and its header index.
pub fn headers(workbook: PathBuf, sheet: String) -> PatchResult<()> {
    println!("{}", "📄 Bookpatch - Header inspection".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let book = ExcelImporter::new(&workbook).import()?;
    let target = match locate_sheet(&book, &sheet) {
        Some(idx) => &book.sheets()[idx],
        None => {
            println!("{}", "⚠️  Workbook has no worksheets".yellow());
            return Ok(());
        }
    };

    println!(
        "   Sheet \"{}\" resolved to {}",
        sheet,
        target.name().bright_blue().bold()
    );

    let header_index = build_header_index(target);
    if header_index.is_empty() {
        println!("{}", "⚠️  No headers found in the scan window".yellow());
        return Ok(());
    }

    println!("   {} header(s):\n", header_index.len());
    for (header, col) in header_index.iter() {
        println!("   {:>4}  {}", column_letter(col).cyan(), header);
    }
    println!();

    Ok(())
}

/// Execute the find command: locate a single code's row.
pub fn find(workbook: PathBuf, code: String, sheet: String) -> PatchResult<()> {
    println!("{}", "📄 Bookpatch - Code lookup".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Code:     {}\n", code);

    let book = ExcelImporter::new(&workbook).import()?;
    let target = match locate_sheet(&book, &sheet).map(|idx| &book.sheets()[idx]) {
        Some(target) => target,
        None => {
            println!("{}", "⚠️  Workbook has no worksheets".yellow());
            return Ok(());
        }
    };

    match locate_row(target, &code) {
        Some(row) => println!(
            "{}",
            format!("✅ Found in sheet {} at row {row}", target.name()).green()
        ),
        None => println!(
            "{}",
            format!("⚠️  Code {code} matches no cell in {}", target.name()).yellow()
        ),
    }

    Ok(())
}

/// 1-based column number to Excel letters (1→A, 26→Z, 27→AA).
fn column_letter(col: u32) -> String {
    let mut result = String::new();
    let mut num = col as i64 - 1;

    loop {
        let remainder = (num % 26) as u8;
        result.insert(0, (b'A' + remainder) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}
