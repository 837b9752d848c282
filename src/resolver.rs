use std::collections::HashSet;

use anyhow::Result;
use indicatif::ProgressBar;
use tracing::debug;

use crate::local::resolve_local;
use crate::local::site_packages::SitePackages;
use crate::models::{canonical_name, PackageInfo};
use crate::registry::{resolve_remote, PackageRegistry};

/// Outcome of resolving a requirement list.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Locally resolved packages first, then registry ones.
    pub packages: Vec<PackageInfo>,
    /// Names no resolver produced; only filled when the registry is disabled.
    pub unresolved: Vec<String>,
}

/// Resolve `names` locally first, then through the registry for the rest.
///
/// Each name is resolved by exactly one source: a locally found package
/// is removed from the registry work list by its normalized name, so
/// `Django` installed as `django` is not looked up twice. With no
/// registry the leftover names come back in [`Resolution::unresolved`].
pub async fn resolve<R: PackageRegistry>(
    names: &[String],
    site: Option<&SitePackages>,
    registry: Option<&R>,
    progress: Option<&ProgressBar>,
) -> Result<Resolution> {
    let local = match site {
        Some(site) => resolve_local(site, names, registry).await?,
        None => Vec::new(),
    };

    let found: HashSet<String> = local.iter().map(|p| canonical_name(&p.name)).collect();
    let remaining: Vec<String> = names
        .iter()
        .filter(|n| !found.contains(&canonical_name(n)))
        .cloned()
        .collect();
    debug!(local = local.len(), remaining = remaining.len(), "local pass done");

    let Some(registry) = registry else {
        return Ok(Resolution {
            packages: local,
            unresolved: remaining,
        });
    };

    if let Some(pb) = progress {
        pb.set_length(remaining.len() as u64);
    }
    let remote = resolve_remote(registry, &remaining, progress).await?;

    let mut packages = local;
    packages.extend(remote);
    Ok(Resolution {
        packages,
        unresolved: Vec::new(),
    })
}
