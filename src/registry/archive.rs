//! Snapshot download and module-scoped repackaging.
//!
//! GitHub zipballs contain the whole repository under one synthetic root
//! directory (`owner-repo-commit/`). The repackager filters a snapshot down
//! to the resolved module subtree and rebuilds a zip rooted at the module
//! itself, so output paths never leak the synthetic root or the registry's
//! internal `modules` prefix.

use std::io::{Cursor, Read, Seek, Write};

use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::config::MODULE_PREFIX;
use crate::error::{CairnError, Result};
use crate::registry::coordinate::ModuleCoordinate;
use crate::registry::ModuleRegistry;

impl ModuleRegistry {
    /// Build a module-scoped source zip for one version.
    ///
    /// The snapshot is fetched for ref `v{version}` first, then the bare
    /// `{version}` - some repositories tag without the prefix. Two failed
    /// downloads are a `None`; a snapshot that does not decode as a zip is
    /// a [`CairnError::CorruptArchive`] and is not retried. A snapshot with
    /// no entries under the module path yields an empty but valid zip.
    pub fn source_archive(&self, coord: &ModuleCoordinate, version: &str) -> Result<Option<Vec<u8>>> {
        let Some(location) = self.resolve(coord)? else {
            tracing::warn!("Could not resolve repository for {}", coord);
            return Ok(None);
        };

        let repo_owner = self.repo_owner_for(coord)?;

        let mut bytes = None;
        for git_ref in [format!("v{}", version), version.to_string()] {
            match self.client().zipball(&repo_owner, &location.repo, &git_ref) {
                Ok(Some(body)) => {
                    bytes = Some(body);
                    break;
                }
                Ok(None) => {
                    tracing::info!("Snapshot ref '{}' not found for {}", git_ref, location.repo);
                }
                Err(e) => {
                    tracing::warn!("Snapshot download for ref '{}' failed: {}", git_ref, e);
                }
            }
        }
        let Some(bytes) = bytes else {
            tracing::error!("No snapshot available for {} version {}", coord, version);
            return Ok(None);
        };

        let corrupt = |e: &dyn std::fmt::Display| CairnError::CorruptArchive {
            coordinate: coord.to_string(),
            message: e.to_string(),
        };

        let mut snapshot = ZipArchive::new(Cursor::new(bytes)).map_err(|e| corrupt(&e))?;
        if snapshot.is_empty() {
            tracing::warn!("Snapshot for {} has no entries", coord);
            return Ok(None);
        }

        let root_dir = {
            let first = snapshot.by_index(0).map_err(|e| corrupt(&e))?;
            first
                .name()
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string()
        };

        let target_path = if self.settings().is_monorepo() {
            if location.path.is_empty() {
                MODULE_PREFIX.to_string()
            } else {
                format!("{}/{}", MODULE_PREFIX, location.path)
            }
        } else {
            String::new()
        };

        let prefix = search_prefix(&root_dir, &target_path);
        tracing::info!("Filtering snapshot for {} with prefix {}", coord, prefix);

        let repacked = filter_archive(&mut snapshot, &prefix).map_err(|e| corrupt(&e))?;
        Ok(Some(repacked))
    }
}

/// Join the synthetic root and the module path into the entry prefix to
/// keep, always with a trailing slash.
fn search_prefix(root_dir: &str, target_path: &str) -> String {
    if target_path.is_empty() {
        format!("{}/", root_dir)
    } else {
        format!("{}/{}/", root_dir, target_path.trim_matches('/'))
    }
}

/// Copy every entry under `prefix` into a fresh zip with the prefix
/// stripped. The entry equal to the prefix itself (the directory marker)
/// is skipped.
fn filter_archive<R: Read + Seek>(source: &mut ZipArchive<R>, prefix: &str) -> ZipResult<Vec<u8>> {
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let mut matched = false;

    for index in 0..source.len() {
        let mut entry = source.by_index(index)?;
        let name = entry.name().to_string();
        let Some(rel_path) = name.strip_prefix(prefix) else {
            continue;
        };
        if rel_path.is_empty() {
            continue;
        }

        if entry.is_dir() {
            out.add_directory(rel_path.trim_end_matches('/'), options)?;
        } else {
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            out.start_file(rel_path, options)?;
            out.write_all(&data)?;
        }
        matched = true;
    }

    if !matched {
        tracing::warn!("No snapshot entries matched prefix {}", prefix);
    }

    Ok(out.finish()?.into_inner())
}
