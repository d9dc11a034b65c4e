//! Version listing and tag normalization.

use crate::error::Result;
use crate::registry::coordinate::ModuleCoordinate;
use crate::registry::{fetch_or_skip, ModuleRegistry};

impl ModuleRegistry {
    /// Version strings for a module, or `None` when the coordinate does not
    /// resolve.
    ///
    /// Prefers the version list already enriched into the structured cache,
    /// then the flat cache, then resolves the repository and fetches its
    /// tags. Ordering is the upstream tag listing's insertion order - not
    /// semantic-version order - and duplicate or odd tag names pass through
    /// unmodified. A resolved module whose tag listing fails yields an
    /// empty list rather than an error.
    pub fn versions(&self, coord: &ModuleCoordinate) -> Result<Option<Vec<String>>> {
        let enriched = self
            .structured()
            .find(&coord.provider, &coord.name)
            .filter(|record| !record.versions.is_empty())
            .map(|record| record.versions.clone());
        if let Some(versions) = enriched {
            return Ok(Some(versions));
        }

        if let Some(cached) = self.flat().versions.get(&coord.versions_key()) {
            return Ok(Some(cached));
        }

        let Some(location) = self.resolve(coord)? else {
            return Ok(None);
        };

        let repo_owner = self.repo_owner_for(coord)?;

        let context = format!("tags for {}/{}", repo_owner, location.repo);
        let Some(tags) = fetch_or_skip(self.client().tags(&repo_owner, &location.repo), &context)
        else {
            return Ok(Some(Vec::new()));
        };

        let versions: Vec<String> = tags.iter().map(|t| normalize_tag(t).to_string()).collect();
        self.flat()
            .versions
            .insert(coord.versions_key(), versions.clone());
        Ok(Some(versions))
    }

    /// Normalized versions for one repository, flat-cached per repository
    /// so a scan fetches tags once however many modules share the repo.
    ///
    /// Failures degrade to an empty, uncached list.
    pub(crate) fn repo_tags(&self, repo: &str) -> Vec<String> {
        let key = format!("tags:{}", repo);
        if let Some(cached) = self.flat().tags.get(&key) {
            return cached;
        }

        let Ok(owner) = self.owner() else {
            return Vec::new();
        };
        let owner = owner.to_string();

        let context = format!("tags for {}/{}", owner, repo);
        let Some(tags) = fetch_or_skip(self.client().tags(&owner, repo), &context) else {
            return Vec::new();
        };

        let versions: Vec<String> = tags.iter().map(|t| normalize_tag(t).to_string()).collect();
        self.flat().tags.insert(key, versions.clone());
        versions
    }
}

/// Strip exactly one leading `v` (case-sensitive) from a tag name.
pub(crate) fn normalize_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}
