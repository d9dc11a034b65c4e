//! Structured registry cache.
//!
//! Four-level hierarchical index built by tree scans:
//! provider -> group -> parent folder -> module. Records are owned
//! exclusively by this cache and written only by a scan pass; a flattened
//! name is unique within a provider and the last scan wins on collision.
//! The cache is never partially invalidated: it is rebuilt per provider by
//! a scan, or dropped wholesale by [`StructuredCache::clear`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Enrichment snapshot for one module, keyed by its flattened name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Owning account of the backing repository.
    pub namespace: String,
    /// Flattened module name (path separators and `-` replaced by `_`).
    pub name: String,
    /// Last path segment, flattened.
    pub short_name: String,
    /// Display name of the group (first path segment after the prefix).
    pub group: String,
    pub group_slug: String,
    /// Display name of the parent folder, or "General" for shallow modules.
    pub parent: String,
    pub parent_slug: String,
    /// Second-to-last path segment, or "root" for single-segment modules.
    pub subfolder: String,
    pub provider: String,
    /// Repository the module lives in.
    pub repo_name: String,
    /// Path relative to the module prefix; empty for the prefix itself.
    pub path: String,
    /// One-line human description (README-derived or synthesized).
    pub description: String,
    /// Version strings in upstream tag order.
    pub versions: Vec<String>,
    /// Canonical browse URL for the module directory.
    pub url: String,
    /// Raw README markdown, when enrichment fetched it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
}

#[derive(Debug, Default, Clone)]
struct ParentNode {
    name: String,
    modules: HashMap<String, ModuleRecord>,
}

#[derive(Debug, Default, Clone)]
struct GroupNode {
    name: String,
    parents: HashMap<String, ParentNode>,
}

#[derive(Debug, Default, Clone)]
struct ProviderNode {
    groups: HashMap<String, GroupNode>,
}

/// The provider -> group -> parent -> module index.
#[derive(Debug, Default)]
pub struct StructuredCache {
    providers: HashMap<String, ProviderNode>,
}

impl StructuredCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a scan has populated (or at least started) this provider.
    pub fn contains_provider(&self, provider: &str) -> bool {
        self.providers.contains_key(provider)
    }

    /// Mark a provider as scanned, creating its empty subtree.
    ///
    /// A scan that finds zero modules still leaves the subtree in place so
    /// later lookups are served from cache instead of rescanning.
    pub fn ensure_provider(&mut self, provider: &str) {
        self.providers.entry(provider.to_string()).or_default();
    }

    /// Insert or overwrite a record at [provider][group][parent][name].
    pub fn insert(&mut self, record: ModuleRecord) {
        let provider = self
            .providers
            .entry(record.provider.clone())
            .or_default();
        let group = provider
            .groups
            .entry(record.group_slug.clone())
            .or_default();
        group.name = record.group.clone();
        let parent = group
            .parents
            .entry(record.parent_slug.clone())
            .or_default();
        parent.name = record.parent.clone();
        parent.modules.insert(record.name.clone(), record);
    }

    /// Find a module by flattened name in any group/parent of a provider.
    pub fn find(&self, provider: &str, name: &str) -> Option<&ModuleRecord> {
        let node = self.providers.get(provider)?;
        node.groups
            .values()
            .flat_map(|g| g.parents.values())
            .find_map(|p| p.modules.get(name))
    }

    /// All records of a provider, sorted by flattened name.
    pub fn provider_modules(&self, provider: &str) -> Vec<ModuleRecord> {
        let Some(node) = self.providers.get(provider) else {
            return Vec::new();
        };
        let mut records: Vec<ModuleRecord> = node
            .groups
            .values()
            .flat_map(|g| g.parents.values())
            .flat_map(|p| p.modules.values().cloned())
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Providers with a scanned subtree.
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop the whole index.
    pub fn clear(&mut self) {
        self.providers.clear();
    }
}
