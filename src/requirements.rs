use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::models::canonical_name;

/// Collect the requirement names declared by a Python project.
///
/// Reads, in order: `Pipfile.lock` → `requirements.txt` → `pyproject.toml`
/// (`project.dependencies`, then `tool.poetry.dependencies`). Names are
/// deduplicated by their normalized form; the first spelling seen is kept.
/// An unreadable or malformed file is skipped with a warning.
pub fn collect_requirements(path: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let sources: [(&str, fn(&Path) -> Result<Vec<String>>); 3] = [
        ("Pipfile.lock", parse_pipfile_lock),
        ("requirements.txt", parse_requirements_txt),
        ("pyproject.toml", parse_pyproject_toml),
    ];

    for (file, parse) in sources {
        let manifest = path.join(file);
        if !manifest.exists() {
            continue;
        }
        match parse(&manifest) {
            Ok(parsed) => names.extend(parsed),
            Err(e) => warn!("skipping {}: {:#}", manifest.display(), e),
        }
    }

    Ok(dedup_names(names))
}

/// Drop repeated names, comparing normalized forms.
pub fn dedup_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    names
        .into_iter()
        .filter(|n| seen.insert(canonical_name(n)))
        .collect()
}

fn requirement_name_regex() -> Result<Regex> {
    Ok(Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9_\-\.]*)")?)
}

/// Distribution name of a requirement specifier. Bare URLs carry no name;
/// the `name @ url` form keeps its name.
fn requirement_name(re: &Regex, spec: &str) -> Option<String> {
    let head = spec.split('@').next().unwrap_or(spec);
    if head.contains("://") {
        return None;
    }
    re.captures(spec).map(|caps| caps[1].to_string())
}

/// Parse `requirements.txt`: takes the distribution name of every
/// requirement line, ignoring options (`-r`, `-e`, `--hash`) and comments.
fn parse_requirements_txt(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let re = requirement_name_regex()?;

    let names = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| requirement_name(&re, line))
        .collect();

    Ok(names)
}

/// Parse `Pipfile.lock`: JSON with `default` and `develop` sections.
fn parse_pipfile_lock(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    let mut names = Vec::new();

    for section in &["default", "develop"] {
        if let Some(pkgs) = json.get(section).and_then(|v| v.as_object()) {
            names.extend(pkgs.keys().cloned());
        }
    }

    Ok(names)
}

#[derive(Debug, Deserialize)]
struct Pyproject {
    project: Option<PyprojectProject>,
    tool: Option<PyprojectTool>,
}

#[derive(Debug, Deserialize)]
struct PyprojectProject {
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PyprojectTool {
    poetry: Option<PoetryTool>,
}

#[derive(Debug, Deserialize)]
struct PoetryTool {
    #[serde(default)]
    dependencies: BTreeMap<String, toml::Value>,
}

/// Parse `pyproject.toml`: PEP 621 dependency strings and Poetry's
/// dependency table (without the `python` constraint).
fn parse_pyproject_toml(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let pyproject: Pyproject = toml::from_str(&content)?;
    let re = requirement_name_regex()?;
    let mut names = Vec::new();

    if let Some(project) = pyproject.project {
        names.extend(
            project
                .dependencies
                .iter()
                .filter_map(|dep| requirement_name(&re, dep)),
        );
    }

    if let Some(poetry) = pyproject.tool.and_then(|t| t.poetry) {
        names.extend(
            poetry
                .dependencies
                .into_keys()
                .filter(|name| !name.eq_ignore_ascii_case("python")),
        );
    }

    Ok(names)
}
