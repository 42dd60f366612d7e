use crate::core::{EntryExtractor, SheetLayout};
use crate::error::SheetResult;
use crate::excel::SheetImporter;
use crate::grid::{Grid, Sheet};
use crate::types::FlatRecord;
use crate::writer;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};

/// Load the first worksheet
fn load_sheet(input: &Path, layout: SheetLayout, verbose: bool) -> SheetResult<Sheet> {
    if verbose {
        eprintln!("{}", "📖 Reading Excel file...".cyan());
    }

    let sheet = SheetImporter::new(input).import()?;

    if verbose {
        eprintln!(
            "   Sheet: {} ({} rows, last row {})",
            sheet.name().bright_blue(),
            sheet.row_count(),
            sheet.last_row().map_or(0, |r| r + 1)
        );
        eprintln!(
            "   Layout: primary col {}, secondary col {}, plans from col {}, {} header row(s)\n",
            layout.primary_column,
            layout.secondary_column,
            layout.first_plan_column,
            layout.header_rows
        );
    }

    Ok(sheet)
}

/// Load the first worksheet and flatten it
fn load_and_extract(
    input: &Path,
    layout: SheetLayout,
    verbose: bool,
) -> SheetResult<Vec<FlatRecord>> {
    let sheet = load_sheet(input, layout, verbose)?;

    if verbose {
        eprintln!("{}", "🧮 Flattening rows...".cyan());
    }

    Ok(EntryExtractor::new(layout).extract(&sheet))
}

/// Execute the convert command
pub fn convert(
    input: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
    layout: SheetLayout,
) -> SheetResult<()> {
    eprintln!("{}", "📋 Plansheet - Converting template".bold().green());
    eprintln!("   Input:  {}", input.display());
    if let Some(ref path) = output {
        eprintln!("   Output: {}", path.display());
    }
    eprintln!();

    let records = load_and_extract(&input, layout, verbose)?;

    match output {
        Some(ref path) => writer::write_records_to_file(path, &records)?,
        None => writer::write_records(&mut io::stdout().lock(), &records)?,
    }

    eprintln!();
    eprintln!("{}", "✅ Template conversion completed successfully!".bold().green());
    eprintln!("   {} records", records.len().to_string().bold());

    Ok(())
}

/// Execute the groups command - one line per benefit group
pub fn groups(input: PathBuf, layout: SheetLayout) -> SheetResult<()> {
    println!("{}", "📋 Plansheet - Benefit groups".bold().green());
    println!("   File: {}\n", input.display());

    let sheet = load_sheet(&input, layout, false)?;
    let summaries = EntryExtractor::new(layout).summarize(&sheet);

    if summaries.is_empty() {
        println!("{}", "⚠️  No benefit groups found".yellow());
        return Ok(());
    }

    for summary in &summaries {
        let label = if summary.benefit.is_empty() {
            "(no benefit)".dimmed().to_string()
        } else {
            summary.benefit.bright_blue().bold().to_string()
        };
        println!(
            "   {}: {} coverage lines, {} records",
            label, summary.coverage_lines, summary.records
        );
    }

    let total: usize = summaries.iter().map(|s| s.records).sum();
    println!(
        "\n   {} groups, {} records",
        summaries.len(),
        total.to_string().bold()
    );

    Ok(())
}
