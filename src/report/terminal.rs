use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::Report;
use crate::models::{LicenseRisk, PolicyVerdict, ReportEntry, UNKNOWN};

/// Render a colored terminal report.
pub fn render(report: &Report, path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let entries = &report.packages;
    let total = entries.len();
    let pass_count = count(entries, &PolicyVerdict::Pass);
    let warn_count = count(entries, &PolicyVerdict::Warn);
    let error_count = count(entries, &PolicyVerdict::Error);

    if quiet {
        println!(
            "Total: {}  Pass: {}  Warn: {}  Error: {}  Unresolved: {}",
            total,
            pass_count.to_string().green(),
            warn_count.to_string().yellow(),
            error_count.to_string().red(),
            report.unresolved.len(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "pylicense-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}", path.display());
    println!(" Project license: {}\n", report.project_license.bold());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total dependencies : {}", total));
    println!(
        " │  {:<48} │",
        format!(
            "{}  Pass            : {:>4}  {}",
            "✓".green(),
            pass_count,
            summarize_licenses(entries, &PolicyVerdict::Pass)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Warn            : {:>4}  {}",
            "⚠".yellow(),
            warn_count,
            summarize_licenses(entries, &PolicyVerdict::Warn)
        )
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Error           : {:>4}  {}",
            "✗".red(),
            error_count,
            summarize_licenses(entries, &PolicyVerdict::Error)
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if error_count > 0 {
        println!(" {} Dependencies requiring attention:\n", "[ERROR]".red().bold());
        render_table(entries, &PolicyVerdict::Error);
        println!();
    }

    if warn_count > 0 {
        println!(" {} Dependencies with warnings:\n", "[WARN]".yellow().bold());
        render_table(entries, &PolicyVerdict::Warn);
        println!();
    }

    if verbose && pass_count > 0 {
        println!(" {} All passing dependencies:\n", "[PASS]".green().bold());
        render_table(entries, &PolicyVerdict::Pass);
        println!();
    }

    if !report.unresolved.is_empty() {
        println!(
            " {} Not installed and not looked up (offline): {}\n",
            "[SKIP]".dimmed().bold(),
            report.unresolved.join(", ")
        );
    }

    Ok(())
}

fn count(entries: &[ReportEntry], verdict: &PolicyVerdict) -> usize {
    entries.iter().filter(|e| &e.verdict == verdict).count()
}

fn render_table(entries: &[ReportEntry], verdict_filter: &PolicyVerdict) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Name", "Version", "License", "Author", "Size", "Source", "Risk", "Verdict"]
                .into_iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for entry in entries.iter().filter(|e| &e.verdict == verdict_filter) {
        let pkg = &entry.package;

        let (verdict_str, verdict_color) = match entry.verdict {
            PolicyVerdict::Pass => ("✓ pass", Color::Green),
            PolicyVerdict::Warn => ("⚠ warn", Color::Yellow),
            PolicyVerdict::Error => ("✗ error", Color::Red),
        };

        let risk_color = match entry.risk {
            LicenseRisk::Permissive => Color::Green,
            LicenseRisk::WeakCopyleft => Color::Yellow,
            LicenseRisk::StrongCopyleft => Color::Red,
            LicenseRisk::Proprietary => Color::Magenta,
            LicenseRisk::Unknown => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(&pkg.name),
            Cell::new(pkg.version.as_deref().unwrap_or(UNKNOWN)),
            Cell::new(pkg.license_or_unknown()),
            Cell::new(pkg.author.as_deref().unwrap_or(UNKNOWN)),
            Cell::new(human_size(pkg.size)).set_alignment(CellAlignment::Right),
            Cell::new(pkg.source.to_string()),
            Cell::new(entry.risk.to_string()).fg(risk_color),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn summarize_licenses(entries: &[ReportEntry], verdict: &PolicyVerdict) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for entry in entries.iter().filter(|e| &e.verdict == verdict) {
        *counts.entry(entry.package.license_or_unknown()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(lic, cnt)| format!("{} ({})", lic, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

/// Byte count in the largest binary unit that keeps it above 1; `-` for 0.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    if bytes == 0 {
        return "-".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PackageInfo, PackageSource};

    fn entry(name: &str, license: Option<&str>, verdict: PolicyVerdict) -> ReportEntry {
        ReportEntry {
            package: PackageInfo::new(
                name.to_string(),
                Some("1.0".to_string()),
                None,
                None,
                0,
                license.map(str::to_string),
                PackageSource::Registry,
            ),
            risk: LicenseRisk::Unknown,
            verdict,
        }
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "-");
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MiB");
    }

    #[test]
    fn test_summarize_licenses() {
        let entries = vec![
            entry("a", Some("MIT License"), PolicyVerdict::Pass),
            entry("b", Some("MIT License"), PolicyVerdict::Pass),
            entry("c", Some("BSD License"), PolicyVerdict::Pass),
            entry("d", None, PolicyVerdict::Warn),
        ];
        assert_eq!(
            summarize_licenses(&entries, &PolicyVerdict::Pass),
            "[MIT License (2), BSD License (1)]"
        );
        assert_eq!(summarize_licenses(&entries, &PolicyVerdict::Warn), "[UNKNOWN (1)]");
        assert_eq!(summarize_licenses(&entries, &PolicyVerdict::Error), "");
    }
}
