//! Cairn - Terraform registry proxy for GitHub-hosted module monorepos.
//!
//! Cairn lets a Terraform-registry-protocol client discover, version, and
//! fetch modules that actually live as subdirectories inside one or more
//! GitHub repositories. The core maps a module coordinate
//! (namespace/name/provider) to a repository and in-repository path,
//! maintains a two-tier in-memory cache of that mapping, and repackages
//! repository zipballs into module-scoped archives.
//!
//! # Modules
//!
//! - [`cache`] - Flat TTL cache and the structured provider index
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Runtime settings
//! - [`error`] - Error types and result aliases
//! - [`github`] - GitHub REST API client capability
//! - [`registry`] - Location resolution, scanning, versions, archives
//! - [`warmup`] - Background cache warmup
//!
//! # Example
//!
//! ```
//! use cairn::config::Settings;
//! use cairn::registry::{flatten_path, ModuleRegistry};
//!
//! // Nested module directories flatten to registry names.
//! assert_eq!(flatten_path("net/vpc"), "net_vpc");
//!
//! // A registry for a shared-repository setup.
//! let registry = ModuleRegistry::new(Settings {
//!     monorepo_owner: Some("acme".to_string()),
//!     ..Default::default()
//! });
//! assert!(registry.settings().is_monorepo());
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod registry;
pub mod warmup;

pub use error::{CairnError, Result};
