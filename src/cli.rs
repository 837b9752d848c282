use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "pylicense-checkr",
    about = "Resolve Python dependency licenses and check them against your project",
    version
)]
pub struct Cli {
    /// Project path to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Extra requirement to check (repeatable)
    #[arg(short = 'r', long = "requirement", value_name = "NAME")]
    pub requirements: Vec<String>,

    /// Never query the package registry; report uninstalled packages as unresolved
    #[arg(long)]
    pub offline: bool,

    /// site-packages directory to read installed metadata from [default: autodetect venv]
    #[arg(long, value_name = "DIR")]
    pub site_packages: Option<PathBuf>,

    /// The project's own license; skips reading setup.cfg / pyproject.toml
    #[arg(long, value_name = "LICENSE")]
    pub license: Option<String>,

    /// Config file [default: ./.pylicense-checkr/config.toml, fallback ~/.config/pylicense-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show all dependencies (not just warnings/errors)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from([
            "pylicense-checkr",
            "proj",
            "-r",
            "requests",
            "--requirement",
            "attrs",
            "--offline",
            "--report",
            "json",
        ]);
        assert_eq!(cli.path, PathBuf::from("proj"));
        assert_eq!(cli.requirements, vec!["requests", "attrs"]);
        assert!(cli.offline);
        assert!(matches!(cli.report, ReportFormat::Json));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
