use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::local::metadata::CoreMetadata;
use crate::models::canonical_name;

/// An installed distribution found in a site-packages directory.
#[derive(Debug)]
pub struct InstalledDist {
    /// The `*.dist-info` / `*.egg-info` entry the metadata was read from.
    pub info_path: PathBuf,
    pub metadata: CoreMetadata,
}

/// Read-only view of one `site-packages` directory.
#[derive(Debug, Clone)]
pub struct SitePackages {
    root: PathBuf,
}

impl SitePackages {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up the installed distribution called `name`.
    ///
    /// Names compare after PEP 503 normalization. Returns `Ok(None)` when
    /// nothing by that name is installed.
    pub fn find(&self, name: &str) -> Result<Option<InstalledDist>> {
        let wanted = canonical_name(name);
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read {}", self.root.display()))?;

        let mut egg_info = None;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let (stem, is_dist_info) = if let Some(stem) = file_name.strip_suffix(".dist-info") {
                (stem, true)
            } else if let Some(stem) = file_name.strip_suffix(".egg-info") {
                (stem, false)
            } else {
                continue;
            };

            // `<dist>-<version>`: wheel and egg names escape `-` in the
            // distribution part, so the first one separates the version.
            let dist = stem.split('-').next().unwrap_or(stem);
            if canonical_name(dist) != wanted {
                continue;
            }

            if is_dist_info {
                return read_dist(entry.path(), "METADATA");
            }
            egg_info.get_or_insert(entry.path());
        }

        match egg_info {
            Some(path) if path.is_dir() => read_dist(path, "PKG-INFO"),
            // Legacy single-file `.egg-info` holds PKG-INFO content directly
            Some(path) => read_dist_file(path.clone(), &path),
            None => Ok(None),
        }
    }

    /// Locate the importable tree installed by `dist`.
    ///
    /// Tries each name in `top_level.txt`, then `name` with `-` replaced by
    /// `_`. A package directory or a single `.py` module qualifies. `None`
    /// means the distribution has no concrete file tree (namespace or
    /// virtual packages).
    pub fn import_root(&self, dist: &InstalledDist, name: &str) -> Option<PathBuf> {
        let top_level = std::fs::read_to_string(dist.info_path.join("top_level.txt"))
            .unwrap_or_default();

        let candidates = top_level
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .chain(std::iter::once(name.replace('-', "_")));

        for candidate in candidates {
            let dir = self.root.join(&candidate);
            if dir.is_dir() {
                return Some(dir);
            }
            let module = self.root.join(format!("{}.py", candidate));
            if module.is_file() {
                return Some(module);
            }
        }

        None
    }
}

fn read_dist(info_path: PathBuf, file: &str) -> Result<Option<InstalledDist>> {
    let metadata_path = info_path.join(file);
    if !metadata_path.is_file() {
        warn!("{} has no {}, skipping", info_path.display(), file);
        return Ok(None);
    }
    read_dist_file(info_path, &metadata_path)
}

fn read_dist_file(info_path: PathBuf, metadata_path: &Path) -> Result<Option<InstalledDist>> {
    let content = std::fs::read_to_string(metadata_path)
        .with_context(|| format!("Failed to read {}", metadata_path.display()))?;
    debug!("read metadata from {}", metadata_path.display());
    Ok(Some(InstalledDist {
        info_path,
        metadata: CoreMetadata::parse(&content),
    }))
}

/// Total size in bytes of every file under `path`, skipping `__pycache__`.
pub fn tree_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| e.file_name() != "__pycache__")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Find the site-packages directory for a project.
///
/// Search order:
/// 1. `$VIRTUAL_ENV` (an activated virtualenv)
/// 2. `.venv/` then `venv/` under the project path
pub fn find_site_packages(project_root: &Path) -> Option<PathBuf> {
    let virtual_env = std::env::var_os("VIRTUAL_ENV").map(PathBuf::from);
    virtual_env
        .into_iter()
        .chain([project_root.join(".venv"), project_root.join("venv")])
        .filter(|venv| venv.is_dir())
        .find_map(|venv| find_site_packages_in_venv(&venv))
}

/// Find site-packages within a venv directory.
fn find_site_packages_in_venv(venv: &Path) -> Option<PathBuf> {
    // Unix: lib/pythonX.Y/site-packages
    if let Ok(entries) = std::fs::read_dir(venv.join("lib")) {
        for entry in entries.flatten() {
            if entry.file_name().to_string_lossy().starts_with("python") {
                let site_packages = entry.path().join("site-packages");
                if site_packages.is_dir() {
                    return Some(site_packages);
                }
            }
        }
    }

    // Windows: Lib/site-packages
    let lib_dir = venv.join("Lib").join("site-packages");
    if lib_dir.is_dir() {
        return Some(lib_dir);
    }

    None
}
