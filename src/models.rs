use serde::{Deserialize, Serialize};

/// Display value for a metadata field that could not be determined.
pub const UNKNOWN: &str = "UNKNOWN";

/// License and authorship metadata for one resolved dependency.
///
/// Absent fields are `None`; they render as [`UNKNOWN`] in the terminal
/// report and as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    pub namever: String,
    pub home_page: Option<String>,
    pub author: Option<String>,
    /// Installed size in bytes, `0` when unknown.
    pub size: u64,
    /// Comma-and-space-joined license labels.
    pub license: Option<String>,
    pub source: PackageSource,
}

impl PackageInfo {
    pub fn new(
        name: String,
        version: Option<String>,
        home_page: Option<String>,
        author: Option<String>,
        size: u64,
        license: Option<String>,
        source: PackageSource,
    ) -> Self {
        let namever = format!("{}-{}", name, version.as_deref().unwrap_or(UNKNOWN));
        Self {
            name,
            version,
            namever,
            home_page,
            author,
            size,
            license,
            source,
        }
    }

    pub fn license_or_unknown(&self) -> &str {
        self.license.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Which resolver produced a [`PackageInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSource {
    Local,
    Registry,
}

impl std::fmt::Display for PackageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageSource::Local => write!(f, "local"),
            PackageSource::Registry => write!(f, "registry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Proprietary,
    Unknown,
}

impl std::fmt::Display for LicenseRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseRisk::Permissive => write!(f, "Permissive"),
            LicenseRisk::WeakCopyleft => write!(f, "Weak Copyleft"),
            LicenseRisk::StrongCopyleft => write!(f, "Strong Copyleft"),
            LicenseRisk::Proprietary => write!(f, "Proprietary"),
            LicenseRisk::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVerdict {
    Pass,
    Warn,
    Error,
}

impl std::fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyVerdict::Pass => write!(f, "pass"),
            PolicyVerdict::Warn => write!(f, "warn"),
            PolicyVerdict::Error => write!(f, "error"),
        }
    }
}

/// A resolved package together with its classification, as reported.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub package: PackageInfo,
    pub risk: LicenseRisk,
    pub verdict: PolicyVerdict,
}

/// Normalize a distribution name the way PyPI compares them (PEP 503):
/// lowercase, with every run of `-`, `_` and `.` collapsed to a single `-`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("Flask"), "flask");
        assert_eq!(canonical_name("zope.interface"), "zope-interface");
        assert_eq!(canonical_name("typing__Extensions"), "typing-extensions");
        assert_eq!(canonical_name("a-_.b"), "a-b");
    }

    #[test]
    fn test_namever_with_missing_version() {
        let pkg = PackageInfo::new(
            "left-pad".to_string(),
            None,
            None,
            None,
            0,
            None,
            PackageSource::Local,
        );
        assert_eq!(pkg.namever, "left-pad-UNKNOWN");
        assert_eq!(pkg.license_or_unknown(), "UNKNOWN");
    }

    #[test]
    fn test_enum_serialization_is_lowercase() {
        assert_eq!(
            serde_json::to_value(LicenseRisk::StrongCopyleft).unwrap(),
            "strong_copyleft"
        );
        assert_eq!(serde_json::to_value(PolicyVerdict::Error).unwrap(), "error");
        assert_eq!(serde_json::to_value(PackageSource::Registry).unwrap(), "registry");
    }
}
