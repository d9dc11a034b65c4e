//! In-memory caching for the registry proxy.
//!
//! Two tiers, both volatile and rebuilt from GitHub on demand:
//!
//! - [`TtlCache`] - flat key/value store with fixed expiry, used for point
//!   lookups (locations, versions, tags, readme text, the provider list)
//! - [`StructuredCache`] - the provider -> group -> parent -> module index
//!   built by tree scans
//!
//! Both are shared mutable state behind a mutex, passed by shared ownership
//! to every resolver and scanner. Multi-step scan-then-write sequences are
//! not atomic: concurrent scans of one provider are last-writer-wins per
//! module entry.

pub mod flat;
pub mod structured;

pub use flat::TtlCache;
pub use structured::{ModuleRecord, StructuredCache};

use std::time::Duration;

use crate::registry::content::ExampleDir;
use crate::registry::coordinate::ModuleLocation;
use crate::registry::providers::Provider;

/// The typed flat caches, cleared as a unit.
///
/// Location and readme caches hold `Option` values so that a negative
/// resolution is itself cached, bounding the cost of repeatedly asking
/// about coordinates that do not exist.
#[derive(Debug)]
pub struct FlatCaches {
    pub locations: TtlCache<Option<ModuleLocation>>,
    pub versions: TtlCache<Vec<String>>,
    pub tags: TtlCache<Vec<String>>,
    pub readmes: TtlCache<Option<String>>,
    pub examples: TtlCache<Vec<ExampleDir>>,
    pub providers: TtlCache<Vec<Provider>>,
}

impl FlatCaches {
    /// Create empty caches sharing one TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            locations: TtlCache::new(ttl),
            versions: TtlCache::new(ttl),
            tags: TtlCache::new(ttl),
            readmes: TtlCache::new(ttl),
            examples: TtlCache::new(ttl),
            providers: TtlCache::new(ttl),
        }
    }

    /// Drop every entry in every cache.
    pub fn clear(&mut self) {
        self.locations.clear();
        self.versions.clear();
        self.tags.clear();
        self.readmes.clear();
        self.examples.clear();
        self.providers.clear();
    }
}
