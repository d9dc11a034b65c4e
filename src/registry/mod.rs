//! Module registry core.
//!
//! [`ModuleRegistry`] is the facade the routing layer talks to. It owns the
//! runtime settings, the GitHub client capability, and both cache tiers,
//! and exposes the registry operations:
//!
//! - [`resolve`](ModuleRegistry::resolve) - coordinate to (repository, path)
//! - [`versions`](ModuleRegistry::versions) - ordered version strings
//! - [`source_archive`](ModuleRegistry::source_archive) - module-scoped zip
//! - [`providers`](ModuleRegistry::providers) - provider discovery
//! - [`modules_for_provider`](ModuleRegistry::modules_for_provider) - scan
//! - [`readme`](ModuleRegistry::readme) / [`examples`](ModuleRegistry::examples)
//! - [`search`](ModuleRegistry::search) - in-memory search over scans
//! - [`clear_cache`](ModuleRegistry::clear_cache) - wholesale cache reset
//!
//! Resolution is a tiered pipeline (structured cache, flat cache, probe or
//! scan) with first match winning; each tier lives in its own function in
//! [`locator`] so the fallbacks stay independently testable.

pub mod archive;
pub mod content;
pub mod coordinate;
pub mod locator;
pub mod providers;
pub mod scanner;
pub mod versions;

pub use content::ExampleDir;
pub use coordinate::{flatten_path, ModuleCoordinate, ModuleLocation};
pub use providers::Provider;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{FlatCaches, ModuleRecord, StructuredCache};
use crate::config::Settings;
use crate::error::{CairnError, Result};
use crate::github::GithubClient;

/// The registry proxy core: settings, transport, and both cache tiers.
///
/// Cheap to clone; clones share the caches. There is no mutual exclusion
/// around a whole scan: two concurrent scans of the same provider race and
/// the result is last-writer-wins per module entry.
#[derive(Clone)]
pub struct ModuleRegistry {
    settings: Settings,
    client: GithubClient,
    flat: Arc<Mutex<FlatCaches>>,
    structured: Arc<Mutex<StructuredCache>>,
}

impl ModuleRegistry {
    /// Create a registry from settings.
    pub fn new(settings: Settings) -> Self {
        let client = GithubClient::new(&settings);
        let ttl = settings.cache_ttl();
        Self {
            settings,
            client,
            flat: Arc::new(Mutex::new(FlatCaches::new(ttl))),
            structured: Arc::new(Mutex::new(StructuredCache::new())),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn client(&self) -> &GithubClient {
        &self.client
    }

    pub(crate) fn flat(&self) -> MutexGuard<'_, FlatCaches> {
        self.flat.lock().expect("flat cache lock poisoned")
    }

    pub(crate) fn structured(&self) -> MutexGuard<'_, StructuredCache> {
        self.structured.lock().expect("structured cache lock poisoned")
    }

    /// The owning account, required in shared-repository mode.
    pub(crate) fn owner(&self) -> Result<&str> {
        self.settings.owner().ok_or_else(|| CairnError::ConfigMissing {
            message: "MONOREPO_OWNER or TARGET_ORG must be set in shared-repository mode".into(),
        })
    }

    /// The account to fetch a resolved module's repository from: the
    /// configured owner in shared-repository mode, else the coordinate's
    /// own namespace.
    pub(crate) fn repo_owner_for(&self, coord: &ModuleCoordinate) -> Result<String> {
        if self.settings.is_monorepo() {
            Ok(self.owner()?.to_string())
        } else {
            Ok(coord.namespace.clone())
        }
    }

    /// Wholesale reset of the flat caches and the structured index.
    ///
    /// The next resolution for any previously cached coordinate performs a
    /// fresh probe or scan.
    pub fn clear_cache(&self) {
        tracing::info!("Clearing registry caches");
        self.flat().clear();
        self.structured().clear();
    }

    /// Verify the credential can see the configured owner.
    ///
    /// The owner may be an organization or a plain user account. Without an
    /// owning account configured there is nothing to verify.
    pub fn verify_access(&self) -> Result<()> {
        let Some(owner) = self.settings.owner() else {
            tracing::warn!("No owning account configured, skipping access check");
            return Ok(());
        };

        if self.client.org_exists(owner)? {
            tracing::info!("Verified access to organization '{}'", owner);
            return Ok(());
        }
        if self.client.user_exists(owner)? {
            tracing::info!("Verified access to user '{}'", owner);
            return Ok(());
        }

        Err(CairnError::AccessDenied {
            owner: owner.to_string(),
            message: "owner not visible with the configured credential".into(),
        })
    }

    /// Case-insensitive substring search over scanned module names.
    ///
    /// Shared-repository mode only: cold providers are scanned (enriched) on
    /// demand. In single-repo mode module discovery is not tree-based, so
    /// the search surface is empty.
    pub fn search(&self, query: &str, provider_filter: Option<&str>) -> Result<Vec<ModuleRecord>> {
        if !self.settings.is_monorepo() {
            tracing::debug!("Search is only available in shared-repository mode");
            return Ok(Vec::new());
        }

        let target_providers: Vec<String> = match provider_filter {
            Some(p) => vec![p.to_string()],
            None => {
                let warm = self.structured().provider_names();
                if warm.is_empty() {
                    self.providers()?.into_iter().map(|p| p.name).collect()
                } else {
                    warm
                }
            }
        };

        let needle = query.to_lowercase();
        let mut results = Vec::new();
        for provider in &target_providers {
            for record in self.modules_for_provider(provider, true)? {
                if needle.is_empty() || record.name.to_lowercase().contains(&needle) {
                    results.push(record);
                }
            }
        }
        Ok(results)
    }
}

/// Unwrap an upstream fetch, logging and degrading to `None` on failure.
///
/// Transport errors and non-2xx responses both mean "skip this candidate
/// and keep going" in scan loops; only the log level differs.
pub(crate) fn fetch_or_skip<T>(result: Result<Option<T>>, context: &str) -> Option<T> {
    match result {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            tracing::debug!("{} unavailable, skipping", context);
            None
        }
        Err(e) => {
            tracing::warn!("{} failed: {}", context, e);
            None
        }
    }
}
