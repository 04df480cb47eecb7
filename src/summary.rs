// src/summary.rs
//! Condensed human summary for console or CI logs.

use crate::classify::{Classification, FileType};
use crate::report::Report;
use colored::Colorize;

/// Prints per-type counts and the top `top_n` high-confidence findings.
pub fn print(report: &Report, top_n: usize) {
    println!(
        "{} scanned {} files",
        "deadwood".bold(),
        report.summary.total_files
    );

    for (label, count) in &report.summary.by_type {
        let line = format!("  {label:<10} {count}");
        match label.as_str() {
            "backup" | "copy" => println!("{}", line.red()),
            "abandoned" => println!("{}", line.yellow()),
            "template" => println!("{}", line.cyan()),
            "error" => println!("{}", line.magenta()),
            _ => println!("{line}"),
        }
    }

    if !report.duplicate_groups.is_empty() {
        println!(
            "  {} duplicate {}",
            report.duplicate_groups.len(),
            pluralize("group", report.duplicate_groups.len())
        );
    }

    let flagged: Vec<&Classification> = report
        .classifications
        .iter()
        .filter(|c| c.confidence > 80 && c.file_type != FileType::Active)
        .take(top_n)
        .collect();

    if flagged.is_empty() {
        println!("{}", "No high-confidence findings.".green());
        return;
    }

    println!();
    println!("{}", "Top findings:".bold());
    for c in flagged {
        println!(
            "  {} {} ({}%)",
            c.file_type.label().red().bold(),
            c.path.display(),
            c.confidence
        );
        if let Some(reason) = c.reasons.first() {
            println!("    {}", reason.dimmed());
        }
        if let Some(rec) = c.recommendations.first() {
            println!("    {} {}", "->".blue(), rec);
        }
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
