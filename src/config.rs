use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::license::classifier::classify;
use crate::license::spdx::normalize;
use crate::models::{LicenseRisk, PolicyVerdict};

/// Root configuration structure, deserialized from `.pylicense-checkr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// License policy rules.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Where packages are looked up.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Defines how licenses are evaluated.
#[derive(Debug, Deserialize)]
pub struct PolicyConfig {
    /// Verdict for licenses the compatibility rule cannot judge
    /// (proprietary ones). Defaults to `warn`.
    #[serde(default = "default_policy_action")]
    pub default: PolicyAction,
    /// Per-license overrides keyed by full license string, classifier label
    /// or SPDX identifier (e.g. `"MIT License"`, `"GPL-3.0"`).
    #[serde(default)]
    pub licenses: HashMap<String, PolicyAction>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default: default_policy_action(),
            licenses: HashMap::new(),
        }
    }
}

fn default_policy_action() -> PolicyAction {
    PolicyAction::Warn
}

/// The action to take when a dependency's license matches a policy rule.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    /// Dependency is compliant; no action needed.
    Pass,
    /// Dependency warrants review but does not fail the scan.
    Warn,
    /// Dependency violates policy; the CLI exits with code 1.
    Error,
}

impl PolicyAction {
    /// Convert to the corresponding [`PolicyVerdict`].
    pub fn to_verdict(&self) -> PolicyVerdict {
        match self {
            PolicyAction::Pass => PolicyVerdict::Pass,
            PolicyAction::Warn => PolicyVerdict::Warn,
            PolicyAction::Error => PolicyVerdict::Error,
        }
    }
}

/// Package lookup settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Base URL of the PyPI-compatible JSON API.
    #[serde(default = "default_registry_url")]
    pub registry_url: String,
    /// Per-request timeout for registry queries.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Installed packages to prefer over the registry; autodetected when unset.
    pub site_packages: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            timeout_secs: default_timeout_secs(),
            site_packages: None,
        }
    }
}

fn default_registry_url() -> String {
    "https://pypi.org".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.pylicense-checkr/config.toml`
/// 3. `~/.config/pylicense-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".pylicense-checkr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("pylicense-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
}

/// Determine the policy verdict for a dependency license under a project
/// whose own license has risk `project_risk`.
///
/// 1. The full license string (raw or SPDX-normalized), if listed in
///    `policy.licenses`.
/// 2. Each comma-separated label (raw or SPDX-normalized); labels are
///    alternatives, so the most lenient listed verdict wins.
/// 3. Compatibility with the project license.
pub fn apply_policy(
    config: &Config,
    license: Option<&str>,
    project_risk: &LicenseRisk,
) -> PolicyVerdict {
    let license = license.unwrap_or("unknown");

    if let Some(action) = config
        .policy
        .licenses
        .get(license)
        .or_else(|| config.policy.licenses.get(&normalize(license)))
    {
        return action.to_verdict();
    }

    let listed: Vec<PolicyVerdict> = license
        .split(", ")
        .filter_map(|label| {
            config
                .policy
                .licenses
                .get(label)
                .or_else(|| config.policy.licenses.get(&normalize(label)))
        })
        .map(PolicyAction::to_verdict)
        .collect();
    if let Some(verdict) = listed.into_iter().reduce(verdict_or) {
        return verdict;
    }

    compatibility(config, &classify(license), project_risk)
}

/// Verdict for a dependency risk level under a project risk level.
fn compatibility(
    config: &Config,
    dependency: &LicenseRisk,
    project: &LicenseRisk,
) -> PolicyVerdict {
    match dependency {
        LicenseRisk::Unknown => PolicyVerdict::Warn,
        LicenseRisk::Proprietary => config.policy.default.to_verdict(),
        LicenseRisk::Permissive => PolicyVerdict::Pass,
        LicenseRisk::StrongCopyleft => match project {
            LicenseRisk::StrongCopyleft => PolicyVerdict::Pass,
            _ => PolicyVerdict::Error,
        },
        LicenseRisk::WeakCopyleft => match project {
            LicenseRisk::Permissive => PolicyVerdict::Warn,
            _ => PolicyVerdict::Pass,
        },
    }
}

/// Most permissive (least severe) of two verdicts.
/// Pass < Warn < Error
fn verdict_or(a: PolicyVerdict, b: PolicyVerdict) -> PolicyVerdict {
    match (a, b) {
        (PolicyVerdict::Pass, _) | (_, PolicyVerdict::Pass) => PolicyVerdict::Pass,
        (PolicyVerdict::Warn, _) | (_, PolicyVerdict::Warn) => PolicyVerdict::Warn,
        _ => PolicyVerdict::Error,
    }
}
