use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::license::classifier::license_from_classifiers;

/// License-bearing metadata of the project being scanned, tagged with the
/// file section it was read from.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectManifest {
    /// `[metadata]` of `setup.cfg`.
    SetupCfg(ManifestLicense),
    /// `[tool.poetry]` of `pyproject.toml`.
    Poetry(ManifestLicense),
    /// `[tool.flit.metadata]` of `pyproject.toml`.
    Flit(ManifestLicense),
    /// `[project]` of `pyproject.toml`.
    Project(ManifestLicense),
    Empty,
}

impl ProjectManifest {
    pub fn metadata(&self) -> Option<&ManifestLicense> {
        match self {
            ProjectManifest::SetupCfg(m)
            | ProjectManifest::Poetry(m)
            | ProjectManifest::Flit(m)
            | ProjectManifest::Project(m) => Some(m),
            ProjectManifest::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ManifestLicense {
    #[serde(default)]
    pub classifiers: Vec<String>,
    pub license: Option<LicenseField>,
}

/// `license = "MIT"` or `license = { text = "MIT" }`. A `{ file = ... }`
/// table carries no text and counts as undeclared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    Text(String),
    Table { text: Option<String> },
}

impl LicenseField {
    /// The declared text, trimmed. `Some("")` means declared but empty.
    fn text(&self) -> Option<&str> {
        let text = match self {
            LicenseField::Text(s) => Some(s.as_str()),
            LicenseField::Table { text } => text.as_deref(),
        };
        text.map(str::trim)
    }
}

#[derive(Debug, Deserialize)]
struct Pyproject {
    tool: Option<PyprojectTool>,
    project: Option<ManifestLicense>,
}

#[derive(Debug, Deserialize)]
struct PyprojectTool {
    poetry: Option<ManifestLicense>,
    flit: Option<FlitTool>,
}

#[derive(Debug, Deserialize)]
struct FlitTool {
    metadata: Option<ManifestLicense>,
}

/// Source of an answer when the project license cannot be read from disk.
pub trait LicensePrompt {
    fn ask(&self, message: &str) -> Result<String>;
}

/// Asks on the terminal: message on stderr, answer from stdin.
pub struct StdinPrompt;

impl LicensePrompt for StdinPrompt {
    fn ask(&self, message: &str) -> Result<String> {
        eprint!("{}: ", message);
        std::io::stderr().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }
}

/// Read the project's license metadata from `dir`.
///
/// Precedence: `setup.cfg` (only if its `[metadata]` declares `license`),
/// then the first of `tool.poetry`, `tool.flit.metadata`, `project` in
/// `pyproject.toml`. A syntactically invalid `pyproject.toml` is an error.
pub fn read_manifest(dir: &Path) -> Result<ProjectManifest> {
    let setup_cfg = dir.join("setup.cfg");
    if setup_cfg.exists() {
        let content = std::fs::read_to_string(&setup_cfg)
            .with_context(|| format!("Failed to read {}", setup_cfg.display()))?;
        if let Some(metadata) = setup_cfg_metadata(&content) {
            debug!("project license from setup.cfg");
            return Ok(ProjectManifest::SetupCfg(metadata));
        }
    }

    let pyproject_path = dir.join("pyproject.toml");
    if pyproject_path.exists() {
        let content = std::fs::read_to_string(&pyproject_path)
            .with_context(|| format!("Failed to read {}", pyproject_path.display()))?;
        let pyproject: Pyproject = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", pyproject_path.display()))?;

        if let Some(tool) = pyproject.tool {
            if let Some(poetry) = tool.poetry {
                return Ok(ProjectManifest::Poetry(poetry));
            }
            if let Some(metadata) = tool.flit.and_then(|f| f.metadata) {
                return Ok(ProjectManifest::Flit(metadata));
            }
        }
        if let Some(project) = pyproject.project {
            return Ok(ProjectManifest::Project(project));
        }
    }

    Ok(ProjectManifest::Empty)
}

/// Determine the project's own license.
///
/// Classifiers win over the `license` field. Without any manifest, or with
/// a `license` declared as an empty string, the result is empty. The
/// `prompt` is asked only when the chosen section has no license text.
pub fn project_license(dir: &Path, prompt: &dyn LicensePrompt) -> Result<String> {
    let Some(metadata) = read_manifest(dir)?.metadata().cloned() else {
        return Ok(String::new());
    };
    if let Some(license) = license_from_classifiers(&metadata.classifiers) {
        return Ok(license);
    }
    match metadata.license.as_ref().and_then(LicenseField::text) {
        Some(license) => Ok(license.to_string()),
        None => prompt.ask("Enter the project license"),
    }
}

type IniSection = HashMap<String, Vec<String>>;

/// `[metadata]` of a setup.cfg, if it declares `license`.
fn setup_cfg_metadata(content: &str) -> Option<ManifestLicense> {
    let section = parse_ini_section(content, "metadata");
    let license = section.get("license")?.join("\n");
    let classifiers = section.get("classifiers").cloned().unwrap_or_default();

    Some(ManifestLicense {
        classifiers,
        license: Some(LicenseField::Text(license)),
    })
}

/// Collect the keys of one INI section. Multi-line values (indented
/// continuation lines) become one entry per line.
fn parse_ini_section(content: &str, wanted: &str) -> IniSection {
    let mut section: IniSection = HashMap::new();
    let mut in_section = false;
    let mut current_key: Option<String> = None;

    for raw_line in content.lines() {
        let line = raw_line.trim_end_matches('\r');
        let stripped = line.trim_start();
        if stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with(';') {
            continue;
        }

        if stripped.starts_with('[') && stripped.ends_with(']') {
            let name = stripped.trim_matches(|c| c == '[' || c == ']').trim();
            in_section = name.eq_ignore_ascii_case(wanted);
            current_key = None;
            continue;
        }

        if !in_section {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(key) = &current_key {
                section
                    .entry(key.clone())
                    .or_default()
                    .push(stripped.trim().to_string());
            }
            continue;
        }

        if let Some((key, value)) = stripped.split_once('=').or_else(|| stripped.split_once(':')) {
            let key = key.trim().to_ascii_lowercase();
            let entry = section.entry(key.clone()).or_default();
            let value = value.trim();
            if !value.is_empty() {
                entry.push(value.to_string());
            }
            current_key = Some(key);
        }
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    struct FixedAnswer {
        answer: &'static str,
        asked: Cell<bool>,
    }

    impl FixedAnswer {
        fn new(answer: &'static str) -> Self {
            Self {
                answer,
                asked: Cell::new(false),
            }
        }
    }

    impl LicensePrompt for FixedAnswer {
        fn ask(&self, _message: &str) -> Result<String> {
            self.asked.set(true);
            Ok(self.answer.to_string())
        }
    }

    fn project_dir(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(tmp.path().join(name), content).unwrap();
        }
        tmp
    }

    #[test]
    fn test_setup_cfg_classifiers() {
        let dir = project_dir(&[(
            "setup.cfg",
            "[metadata]\nname = demo\nlicense = MIT\nclassifiers =\n    Programming Language :: Python\n    License :: OSI Approved :: MIT License\n\n[options]\npackages = find:\n",
        )]);
        let prompt = FixedAnswer::new("unused");

        assert_eq!(project_license(dir.path(), &prompt).unwrap(), "MIT License");
        assert!(!prompt.asked.get());
    }

    #[test]
    fn test_setup_cfg_without_license_falls_through_to_pyproject() {
        let dir = project_dir(&[
            ("setup.cfg", "[metadata]\nname = demo\n"),
            ("pyproject.toml", "[project]\nname = \"demo\"\nlicense = \"Apache-2.0\"\n"),
        ]);

        let manifest = read_manifest(dir.path()).unwrap();
        assert!(matches!(manifest, ProjectManifest::Project(_)));
        assert_eq!(
            project_license(dir.path(), &FixedAnswer::new("unused")).unwrap(),
            "Apache-2.0"
        );
    }

    #[test]
    fn test_poetry_takes_precedence_over_project() {
        let dir = project_dir(&[(
            "pyproject.toml",
            r#"
[project]
name = "demo"
license = { text = "GPL-3.0" }

[tool.poetry]
name = "demo"
license = "BSD-3-Clause"
"#,
        )]);

        let manifest = read_manifest(dir.path()).unwrap();
        assert_eq!(
            manifest,
            ProjectManifest::Poetry(ManifestLicense {
                classifiers: Vec::new(),
                license: Some(LicenseField::Text("BSD-3-Clause".to_string())),
            })
        );
    }

    #[test]
    fn test_flit_metadata() {
        let dir = project_dir(&[(
            "pyproject.toml",
            "[tool.flit.metadata]\nmodule = \"demo\"\nclassifiers = [\"License :: OSI Approved :: ISC License (ISCL)\"]\n",
        )]);

        assert_eq!(
            project_license(dir.path(), &FixedAnswer::new("unused")).unwrap(),
            "ISC License (ISCL)"
        );
    }

    #[test]
    fn test_project_license_table_text() {
        let dir = project_dir(&[(
            "pyproject.toml",
            "[tool.black]\nline-length = 100\n\n[project]\nname = \"demo\"\nlicense = { text = \"MPL-2.0\" }\n",
        )]);

        assert_eq!(
            project_license(dir.path(), &FixedAnswer::new("unused")).unwrap(),
            "MPL-2.0"
        );
    }

    #[test]
    fn test_prompt_when_nothing_declared() {
        let dir = project_dir(&[(
            "pyproject.toml",
            "[project]\nname = \"demo\"\nlicense = { file = \"LICENSE\" }\n",
        )]);
        let prompt = FixedAnswer::new("Proprietary");

        assert_eq!(project_license(dir.path(), &prompt).unwrap(), "Proprietary");
        assert!(prompt.asked.get());
    }

    #[test]
    fn test_no_manifest_is_empty_without_prompt() {
        let dir = project_dir(&[]);
        let prompt = FixedAnswer::new("MIT");

        assert_eq!(read_manifest(dir.path()).unwrap(), ProjectManifest::Empty);
        assert_eq!(project_license(dir.path(), &prompt).unwrap(), "");
        assert!(!prompt.asked.get());
    }

    #[test]
    fn test_empty_declared_license_without_prompt() {
        let dir = project_dir(&[(
            "pyproject.toml",
            "[tool.poetry]\nname = \"demo\"\nlicense = \"\"\n",
        )]);
        let prompt = FixedAnswer::new("MIT");

        assert_eq!(project_license(dir.path(), &prompt).unwrap(), "");
        assert!(!prompt.asked.get());
    }

    #[test]
    fn test_empty_setup_cfg_license_without_prompt() {
        let dir = project_dir(&[("setup.cfg", "[metadata]\nname = demo\nlicense =\n")]);
        let prompt = FixedAnswer::new("MIT");

        assert_eq!(project_license(dir.path(), &prompt).unwrap(), "");
        assert!(!prompt.asked.get());
    }

    #[test]
    fn test_malformed_pyproject_is_fatal() {
        let dir = project_dir(&[("pyproject.toml", "[project\nname = ")]);
        assert!(read_manifest(dir.path()).is_err());
    }
}
