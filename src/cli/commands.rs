use crate::config::TemplateConfig;
use crate::error::TemplateResult;
use crate::excel::{TemplateBuilder, TemplateParser};
use crate::preview::PreviewSession;
use crate::types::PreviewRow;
use crate::upload::DroppedFile;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the template command
pub fn template(
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    verbose: bool,
) -> TemplateResult<()> {
    println!("{}", "📋 Roster - Template Download".bold().green());

    let config = TemplateConfig::load(config_path.as_deref())?;
    if verbose {
        println!(
            "   Sheets: {} + {} (hidden)",
            config.sheet_name.bright_blue(),
            config.lookup_sheet_name.bright_blue()
        );
        println!(
            "   {} sample rows, {} lookup entries\n",
            config.sample_rows.len(),
            config.lookup.len()
        );
    }

    let download = TemplateBuilder::new(&config).download(&config.sample_rows)?;
    let size = download.len();

    let path = match output {
        Some(path) if path.is_dir() => download.save_in(&path)?,
        Some(path) => {
            download.save_as(&path)?;
            path
        }
        None => download.save_in(&std::env::current_dir()?)?,
    };

    println!("{}", "✅ Template written".bold().green());
    println!("   File: {} ({} bytes)\n", path.display(), size);
    Ok(())
}

/// Execute the preview command
pub fn preview(file: PathBuf, config_path: Option<PathBuf>, verbose: bool) -> TemplateResult<()> {
    println!("{}", "🔍 Roster - Upload Preview".bold().green());
    println!("   File: {}\n", file.display());

    let config = TemplateConfig::load(config_path.as_deref())?;
    let dropped = DroppedFile::from_path(&file)?;
    if verbose {
        println!("   Read {} bytes", dropped.bytes.len());
    }

    let parser = TemplateParser::new(&config.sheet_name).with_expected_headers(
        config.schema.columns().iter().map(|col| col.header.clone()),
    );
    let mut session = PreviewSession::new();
    let count = session.load(vec![dropped], &parser, &config.lookup)?;

    if count == 0 {
        println!("{}", "⚠️  No rows found below the header".yellow());
        return Ok(());
    }

    print_table(session.rows());
    println!("\n{} {} rows", "✅".green(), count);
    Ok(())
}

/// Execute the lookup command
pub fn lookup(config_path: Option<PathBuf>) -> TemplateResult<()> {
    let config = TemplateConfig::load(config_path.as_deref())?;
    println!(
        "{}",
        format!("📖 Lookup values ({})", config.lookup_sheet_name)
            .bold()
            .cyan()
    );
    for entry in config.lookup.entries() {
        println!("   {:>3}  {}", entry.id, entry.name);
    }
    Ok(())
}

fn print_table(rows: &[PreviewRow]) {
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|row| {
            [
                row.record.name.to_string(),
                row.record.email.to_string(),
                row.gender_label(),
            ]
        })
        .collect();

    let headers = ["Name", "Email", "Gender"];
    let mut widths = headers.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_line = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h))
        .collect::<Vec<_>>()
        .join(" │ ");
    println!("   {}", header_line.bold());
    println!(
        "   {}",
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─")
    );
    for row in &cells {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell))
            .collect::<Vec<_>>()
            .join(" │ ");
        println!("   {}", line);
    }
}
