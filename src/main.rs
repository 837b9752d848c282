//! `pylicense-checkr` resolves license metadata for Python dependencies and
//! checks it against the project's own license.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Collect requirement names ([`requirements`]).
//! 4. Resolve them: installed metadata first ([`local`]), PyPI for the rest
//!    ([`registry`]), merged by [`resolver::resolve`].
//! 5. Determine the project license ([`project`]).
//! 6. Classify licenses and apply policy ([`license`], [`config::apply_policy`]).
//! 7. Render the requested report ([`report`]).
//! 8. Exit `0` (clean) or `1` (at least one [`models::PolicyVerdict::Error`]).

mod cli;
mod config;
mod license;
mod local;
mod models;
mod project;
mod registry;
mod report;
mod requirements;
mod resolver;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::{apply_policy, load_config};
use license::classifier::classify;
use local::site_packages::{find_site_packages, SitePackages};
use models::{PolicyVerdict, ReportEntry};
use project::StdinPrompt;
use registry::pypi::PypiClient;
use report::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;

    let mut names = requirements::collect_requirements(&path)?;
    names.extend(cli.requirements.iter().cloned());
    let names = requirements::dedup_names(names);

    if names.is_empty() {
        eprintln!("No Python requirements found in {}", path.display());
        std::process::exit(1);
    }

    let site = cli
        .site_packages
        .clone()
        .or_else(|| config.resolver.site_packages.clone())
        .or_else(|| find_site_packages(&path))
        .map(SitePackages::new);

    if !cli.quiet {
        match &site {
            Some(site) => eprintln!(
                "  {} site-packages {}",
                "→".cyan(),
                site.root().display()
            ),
            None => eprintln!(
                "  {} no site-packages found, every package goes to the registry",
                "→".yellow()
            ),
        }
        eprintln!("  {} {} requirements", "→".cyan(), names.len());
    }

    let registry = if cli.offline {
        None
    } else {
        Some(PypiClient::new(&config.resolver)?)
    };

    let pb = if !cli.quiet && registry.is_some() {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let resolution =
        resolver::resolve(&names, site.as_ref(), registry.as_ref(), pb.as_ref()).await?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let project_license = match cli.license {
        Some(license) => license,
        None => project::project_license(&path, &StdinPrompt)?,
    };
    let project_risk = classify(&project_license);

    let packages: Vec<ReportEntry> = resolution
        .packages
        .into_iter()
        .map(|package| {
            let license = package.license.as_deref();
            let risk = classify(license.unwrap_or(""));
            let verdict = apply_policy(&config, license, &project_risk);
            ReportEntry {
                package,
                risk,
                verdict,
            }
        })
        .collect();

    let report = Report {
        project_license,
        packages,
        unresolved: resolution.unresolved,
    };

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&report, &path, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", report::json::render(&report)?);
        }
    }

    // Exit code: 1 if any error verdict found
    let has_errors = report
        .packages
        .iter()
        .any(|e| e.verdict == PolicyVerdict::Error);

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
