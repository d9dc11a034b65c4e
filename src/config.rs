//! Runtime configuration for the registry proxy.
//!
//! Settings are plain data: the binary fills them from CLI flags and
//! environment variables, tests construct them directly. The module path
//! prefix under which all modules of a repository must live is the fixed
//! literal [`MODULE_PREFIX`] and is deliberately not configurable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level directory all modules of a repository live under.
pub const MODULE_PREFIX: &str = "modules";

/// Default TTL for point-lookup cache entries.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Runtime settings for the registry proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// GitHub token attached as a bearer credential to every API call.
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API.
    pub github_api_base: String,

    /// Restricts the registry to repositories of this user/org.
    pub target_org: Option<String>,

    /// Owner of the shared repositories, when different from `target_org`.
    pub monorepo_owner: Option<String>,

    /// Explicit single shared-repository name. When unset, candidate
    /// repositories are discovered by naming convention.
    pub monorepo_name: Option<String>,

    /// TTL for point-lookup cache entries, in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_base: "https://api.github.com".to_string(),
            target_org: None,
            monorepo_owner: None,
            monorepo_name: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Recognized variables: `GITHUB_TOKEN`, `GITHUB_API_BASE`, `TARGET_ORG`,
    /// `MONOREPO_OWNER`, `MONOREPO_NAME`, `CACHE_TTL_SECS`. Empty values are
    /// treated as unset.
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Self {
            github_token: env_nonempty("GITHUB_TOKEN"),
            github_api_base: env_nonempty("GITHUB_API_BASE").unwrap_or(defaults.github_api_base),
            target_org: env_nonempty("TARGET_ORG"),
            monorepo_owner: env_nonempty("MONOREPO_OWNER"),
            monorepo_name: env_nonempty("MONOREPO_NAME"),
            cache_ttl_secs: env_nonempty("CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
        }
    }

    /// The account owning the shared repositories, if configured.
    ///
    /// `monorepo_owner` wins over `target_org`.
    pub fn owner(&self) -> Option<&str> {
        self.monorepo_owner
            .as_deref()
            .or(self.target_org.as_deref())
    }

    /// Whether the registry operates in shared-repository mode.
    ///
    /// Without an owning account each module is assumed to live in its own
    /// repository and coordinates are resolved by direct probing.
    pub fn is_monorepo(&self) -> bool {
        self.owner().is_some()
    }

    /// TTL for point-lookup cache entries.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
