//! Module location resolution.
//!
//! Resolution pipeline (first tier that answers wins):
//! 1. Structured cache - any group/parent of the provider subtree
//! 2. Flat cache - `location:{namespace}:{name}:{provider}`, negative
//!    entries included
//! 3. Cold path - direct repository probing (single-repo mode) or a
//!    tree scan over candidate repositories (shared-repository mode)
//! 4. The cold result, positive or negative, is written back to the flat
//!    cache so permanently missing coordinates stay cheap within the TTL

use crate::config::MODULE_PREFIX;
use crate::error::Result;
use crate::github::TreeEntry;
use crate::registry::coordinate::{flatten_path, ModuleCoordinate, ModuleLocation};
use crate::registry::providers::matches_provider_repo;
use crate::registry::{fetch_or_skip, ModuleRegistry};

impl ModuleRegistry {
    /// Resolve a coordinate to its repository and in-repository path.
    ///
    /// `Ok(None)` means the coordinate does not exist anywhere the registry
    /// can see; the negative answer is cached with the same TTL as a
    /// positive one. No remote call is made when either cache tier answers.
    pub fn resolve(&self, coord: &ModuleCoordinate) -> Result<Option<ModuleLocation>> {
        if let Some(location) = self.check_structured(coord) {
            return Ok(Some(location));
        }
        if let Some(cached) = self.check_flat(coord) {
            return Ok(cached);
        }

        let resolved = if self.settings().is_monorepo() {
            self.locate_by_scan(coord)?
        } else {
            self.locate_by_probe(coord)?
        };

        self.flat()
            .locations
            .insert(coord.location_key(), resolved.clone());
        Ok(resolved)
    }

    /// Tier 1: the structured index, if a scan has already seen the module.
    fn check_structured(&self, coord: &ModuleCoordinate) -> Option<ModuleLocation> {
        self.structured()
            .find(&coord.provider, &coord.name)
            .map(|record| ModuleLocation::new(&record.repo_name, &record.path))
    }

    /// Tier 2: the flat cache. Outer `None` is a miss; inner `None` is a
    /// cached negative resolution.
    fn check_flat(&self, coord: &ModuleCoordinate) -> Option<Option<ModuleLocation>> {
        self.flat().locations.get(&coord.location_key())
    }

    /// Tier 3, single-repo mode: probe the conventional repository names
    /// under the coordinate's namespace. The module is the repository root.
    fn locate_by_probe(&self, coord: &ModuleCoordinate) -> Result<Option<ModuleLocation>> {
        let direct = coord.name.clone();
        let conventional = format!("terraform-{}-{}", coord.provider, coord.name);

        for repo in [direct, conventional] {
            match self.client().repo_exists(&coord.namespace, &repo) {
                Ok(true) => return Ok(Some(ModuleLocation::new(repo, ""))),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Probe of {}/{} failed: {}", coord.namespace, repo, e);
                }
            }
        }
        Ok(None)
    }

    /// Tier 3, shared-repository mode: scan each candidate repository's
    /// tree for a directory whose flattened name matches the coordinate.
    fn locate_by_scan(&self, coord: &ModuleCoordinate) -> Result<Option<ModuleLocation>> {
        let owner = self.owner()?.to_string();

        for repo in self.candidate_repos(&coord.provider)? {
            let context = format!("default branch for {}/{}", owner, repo);
            let Some(branch) = fetch_or_skip(self.client().default_branch(&owner, &repo), &context)
            else {
                continue;
            };

            let context = format!("tree for {}/{}", owner, repo);
            let Some(tree) = fetch_or_skip(self.client().tree(&owner, &repo, &branch), &context)
            else {
                continue;
            };

            if let Some(rel_path) = locate_in_tree(&tree, &coord.name) {
                return Ok(Some(ModuleLocation::new(repo, rel_path)));
            }
        }
        Ok(None)
    }

    /// Candidate shared repositories for a provider: the configured name,
    /// else every owner repository matching `*terraform-{provider}-modules`,
    /// else the bare conventional name.
    pub(crate) fn candidate_repos(&self, provider: &str) -> Result<Vec<String>> {
        if let Some(name) = &self.settings().monorepo_name {
            return Ok(vec![name.clone()]);
        }

        let owner = self.owner()?;
        let mut candidates = Vec::new();
        let context = format!("repository list for {}", owner);
        if let Some(repos) = fetch_or_skip(self.client().list_repos(owner, 1), &context) {
            candidates.extend(
                repos
                    .into_iter()
                    .filter(|name| matches_provider_repo(name, provider)),
            );
        }

        if candidates.is_empty() {
            candidates.push(format!("terraform-{}-modules", provider));
        }
        Ok(candidates)
    }
}

/// Find the prefix-relative path whose flattened name matches `name`.
///
/// Two passes over the tree. The file-based pass considers only directories
/// that directly contain a `.tf` blob; the directory-only fallback catches
/// non-standard layouts the first pass misses. The file pass runs to
/// completion before the fallback starts, so a `.tf`-containing directory
/// always wins over a same-named bare directory; within a pass, tree order
/// decides.
pub(crate) fn locate_in_tree(tree: &[TreeEntry], name: &str) -> Option<String> {
    for entry in tree {
        if !entry.is_blob() || !entry.path.ends_with(".tf") {
            continue;
        }
        let Some((dirname, _)) = entry.path.rsplit_once('/') else {
            continue;
        };
        let Some(rel_path) = prefix_relative(dirname) else {
            continue;
        };
        if flatten_path(rel_path) == name {
            return Some(rel_path.to_string());
        }
    }

    for entry in tree {
        if !entry.is_tree() {
            continue;
        }
        let Some(rel_path) = prefix_relative(&entry.path) else {
            continue;
        };
        if flatten_path(rel_path) == name {
            return Some(rel_path.to_string());
        }
    }

    None
}

/// The part of `dir` below the module prefix, or `None` when `dir` is not
/// strictly under it.
fn prefix_relative(dir: &str) -> Option<&str> {
    dir.strip_prefix(MODULE_PREFIX)?.strip_prefix('/')
}
