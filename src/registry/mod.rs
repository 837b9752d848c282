//! Registry lookups for packages that are not installed locally.
//!
//! [`PackageRegistry`] is the seam between resolution and the network:
//! [`pypi::PypiClient`] talks to the PyPI JSON API, tests substitute an
//! in-memory registry. Every failure is fatal to the caller; there is no
//! retry and no skip-on-missing.

pub mod pypi;

use anyhow::Result;
use indicatif::ProgressBar;
use serde::Deserialize;
use tracing::debug;

use crate::license::classifier::license_from_classifiers;
use crate::models::{PackageInfo, PackageSource};

/// Project document returned by `GET /pypi/<name>/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryProject {
    pub info: ProjectInfo,
    /// Files of the latest release.
    #[serde(default)]
    pub urls: Vec<ReleaseFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub version: String,
    pub home_page: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
    pub license: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseFile {
    pub size: u64,
}

impl RegistryProject {
    /// Size of the last file of the latest release, `0` if it has none.
    pub fn release_size(&self) -> u64 {
        self.urls.last().map(|f| f.size).unwrap_or(0)
    }
}

#[allow(async_fn_in_trait)]
pub trait PackageRegistry {
    /// Fetch the project document for `name`. Missing projects are errors.
    async fn project(&self, name: &str) -> Result<RegistryProject>;
}

/// Resolve every name through the registry, in input order.
///
/// The record keeps the requested name. License comes from the classifiers,
/// falling back to the free-text `license` field.
pub async fn resolve_remote<R: PackageRegistry>(
    registry: &R,
    names: &[String],
    progress: Option<&ProgressBar>,
) -> Result<Vec<PackageInfo>> {
    let mut packages = Vec::with_capacity(names.len());

    for name in names {
        if let Some(pb) = progress {
            pb.set_message(name.clone());
        }
        debug!(package = %name, "querying registry");

        let project = registry.project(name).await?;
        let size = project.release_size();
        let info = project.info;
        let license = license_from_classifiers(&info.classifiers)
            .or_else(|| non_empty(info.license));

        packages.push(PackageInfo::new(
            name.clone(),
            Some(info.version),
            non_empty(info.home_page),
            non_empty(info.author),
            size,
            license,
            PackageSource::Registry,
        ));

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(packages)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use anyhow::{anyhow, Result};

    use super::{PackageRegistry, RegistryProject};

    /// In-memory registry that records every lookup.
    #[derive(Default)]
    pub struct FakeRegistry {
        projects: HashMap<String, RegistryProject>,
        pub requests: RefCell<Vec<String>>,
    }

    impl FakeRegistry {
        pub fn with(mut self, name: &str, json: serde_json::Value) -> Self {
            let project = serde_json::from_value(json).unwrap();
            self.projects.insert(name.to_string(), project);
            self
        }
    }

    impl PackageRegistry for FakeRegistry {
        async fn project(&self, name: &str) -> Result<RegistryProject> {
            self.requests.borrow_mut().push(name.to_string());
            self.projects
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("404 Not Found for {}", name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeRegistry;
    use super::*;
    use serde_json::json;

    fn registry() -> FakeRegistry {
        FakeRegistry::default()
            .with(
                "requests",
                json!({
                    "info": {
                        "version": "2.31.0",
                        "home_page": "https://requests.readthedocs.io",
                        "author": "Kenneth Reitz",
                        "classifiers": [
                            "License :: OSI Approved :: Apache Software License",
                            "Programming Language :: Python :: 3"
                        ],
                        "license": "Apache 2.0"
                    },
                    "urls": [{"size": 110}, {"size": 62574}]
                }),
            )
            .with(
                "attrs",
                json!({
                    "info": {
                        "version": "23.2.0",
                        "home_page": "",
                        "author": null,
                        "classifiers": [],
                        "license": "MIT"
                    },
                    "urls": []
                }),
            )
    }

    #[tokio::test]
    async fn test_resolve_remote_in_input_order() {
        let registry = registry();
        let names = vec!["attrs".to_string(), "requests".to_string()];

        let packages = resolve_remote(&registry, &names, None).await.unwrap();
        assert_eq!(packages.len(), 2);

        assert_eq!(packages[0].name, "attrs");
        assert_eq!(packages[0].license.as_deref(), Some("MIT"));
        assert_eq!(packages[0].home_page, None);
        assert_eq!(packages[0].author, None);
        assert_eq!(packages[0].size, 0);

        assert_eq!(packages[1].name, "requests");
        assert_eq!(packages[1].namever, "requests-2.31.0");
        assert_eq!(packages[1].license.as_deref(), Some("Apache Software License"));
        assert_eq!(packages[1].size, 62574);
        assert_eq!(packages[1].source, PackageSource::Registry);
    }

    #[tokio::test]
    async fn test_missing_project_is_an_error() {
        let registry = registry();
        let names = vec!["requests".to_string(), "no-such-package".to_string()];

        let result = resolve_remote(&registry, &names, None).await;
        assert!(result.is_err());
        assert_eq!(registry.requests.borrow().len(), 2);
    }

    #[test]
    fn test_project_without_version_fails_to_parse() {
        let parsed: Result<RegistryProject, _> =
            serde_json::from_value(json!({"message": "Not Found"}));
        assert!(parsed.is_err());
    }
}
