//! Resolution against the packages installed in a site-packages directory.
//!
//! - [`metadata`]: parses `METADATA` / `PKG-INFO` header blocks.
//! - [`site_packages`]: finds installed distributions, their import trees
//!   and the site-packages directory itself.

pub mod metadata;
pub mod site_packages;

use anyhow::Result;
use tracing::debug;

use crate::license::classifier::license_from_classifiers;
use crate::models::{PackageInfo, PackageSource};
use crate::registry::PackageRegistry;
use site_packages::{tree_size, SitePackages};

/// Resolve the names that are installed in `site`.
///
/// Names that are not installed are skipped without error; the caller
/// reconciles the output against its input. When an import tree exists but
/// measures zero bytes the size is taken from the registry, if one is given.
pub async fn resolve_local<R: PackageRegistry>(
    site: &SitePackages,
    names: &[String],
    registry: Option<&R>,
) -> Result<Vec<PackageInfo>> {
    let mut packages = Vec::new();

    for requirement in names {
        let Some(dist) = site.find(requirement)? else {
            debug!(package = %requirement, "not installed");
            continue;
        };
        let meta = &dist.metadata;

        let license = license_from_classifiers(meta.get_all("Classifier"))
            .or_else(|| meta.get("License").map(str::to_string));
        let name = meta.get("Name").unwrap_or(requirement).to_string();

        let mut size = 0;
        if let Some(root) = site.import_root(&dist, requirement) {
            size = tree_size(&root);
            if size == 0 {
                if let Some(registry) = registry {
                    debug!(package = %name, "empty import tree, sizing from registry");
                    size = registry.project(&name).await?.release_size();
                }
            }
        }

        debug!(package = %name, size, "resolved locally");
        packages.push(PackageInfo::new(
            name,
            meta.get("Version").map(str::to_string),
            meta.get("Home-page").map(str::to_string),
            meta.get("Author").map(str::to_string),
            size,
            license,
            PackageSource::Local,
        ));
    }

    Ok(packages)
}
