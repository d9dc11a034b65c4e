//! Module coordinates and the path flattening convention.
//!
//! A registry client addresses a module by `{namespace}/{name}/{provider}`
//! where `name` is a single flat identifier. Inside a shared repository the
//! same module is a nested directory under the `modules` prefix. The
//! flattening transform bridges the two: path separators and `-` become
//! `_`, and one leading `modules_`/`module_` segment is stripped so that a
//! repository laid out as `modules/modules/net` does not leak the doubled
//! prefix into module names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally visible identity of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleCoordinate {
    pub namespace: String,
    pub name: String,
    pub provider: String,
}

impl ModuleCoordinate {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            provider: provider.into(),
        }
    }

    /// Flat-cache key for location lookups.
    pub fn location_key(&self) -> String {
        format!("location:{}:{}:{}", self.namespace, self.name, self.provider)
    }

    /// Flat-cache key for version lookups.
    pub fn versions_key(&self) -> String {
        format!("versions:{}:{}:{}", self.namespace, self.name, self.provider)
    }

    /// Flat-cache key for readme lookups.
    pub fn readme_key(&self) -> String {
        format!("readme:{}:{}:{}", self.namespace, self.name, self.provider)
    }

    /// Flat-cache key for example listings.
    pub fn examples_key(&self) -> String {
        format!("examples:{}:{}:{}", self.namespace, self.name, self.provider)
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.name, self.provider)
    }
}

/// Physical location of a module: repository plus in-repository path.
///
/// `path` is relative to the `modules` prefix and empty when the module is
/// the prefix directory itself (single-repo mode). Immutable once computed;
/// replaced wholesale on cache clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLocation {
    pub repo: String,
    pub path: String,
}

impl ModuleLocation {
    pub fn new(repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            path: path.into(),
        }
    }
}

/// Flatten a prefix-relative path into a module name.
///
/// `net/vpc` -> `net_vpc`, `data-stores/redis` -> `data_stores_redis`.
/// Exactly one leading `modules_`/`module_` segment is stripped.
pub fn flatten_path(rel_path: &str) -> String {
    let flattened = rel_path.replace(['/', '-'], "_");
    strip_module_segment(&flattened).to_string()
}

/// Remove one leading `modules_` or `module_` segment, if present.
fn strip_module_segment(name: &str) -> &str {
    name.strip_prefix("modules_")
        .or_else(|| name.strip_prefix("module_"))
        .unwrap_or(name)
}

/// Title-case a slug for display: `data_stores` -> `Data Stores`.
pub fn title_case(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut word_start = true;
    for c in slug.chars() {
        if c == '_' || c == ' ' {
            out.push(' ');
            word_start = true;
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
            word_start = !c.is_alphanumeric();
        }
    }
    out
}
