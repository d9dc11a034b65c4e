//! CLI argument definitions.
//!
//! The binary is an operator's tool for the registry core: it exercises
//! provider discovery, scans, resolution, version listing, and source
//! fetching without the HTTP routing layer in front. Connection options
//! double as environment variables so the CLI and a hosting service share
//! one configuration surface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Settings, DEFAULT_CACHE_TTL_SECS};

/// Cairn - Terraform registry proxy for GitHub-hosted module monorepos.
#[derive(Debug, Parser)]
#[command(name = "cairn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// GitHub token used as the bearer credential
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(
        long,
        global = true,
        env = "GITHUB_API_BASE",
        default_value = "https://api.github.com"
    )]
    pub api_base: String,

    /// Restrict the registry to repositories of this user/org
    #[arg(long, global = true, env = "TARGET_ORG")]
    pub org: Option<String>,

    /// Owner of the shared module repositories (overrides --org)
    #[arg(long, global = true, env = "MONOREPO_OWNER")]
    pub owner: Option<String>,

    /// Explicit shared repository name (skips discovery)
    #[arg(long, global = true, env = "MONOREPO_NAME")]
    pub repo: Option<String>,

    /// TTL for point-lookup cache entries, in seconds
    #[arg(long, global = true, env = "CACHE_TTL_SECS", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Build registry settings from the parsed arguments.
    pub fn settings(&self) -> Settings {
        Settings {
            github_token: self.github_token.clone(),
            github_api_base: self.api_base.clone(),
            target_org: self.org.clone(),
            monorepo_owner: self.owner.clone(),
            monorepo_name: self.repo.clone(),
            cache_ttl_secs: self.cache_ttl,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List discovered providers and their backing repositories
    Providers,

    /// List modules of a provider (scans when the cache is cold)
    Modules(ModulesArgs),

    /// Resolve a module coordinate to its repository and path
    Resolve(CoordinateArgs),

    /// List versions of a module
    Versions(CoordinateArgs),

    /// Search module names
    Search(SearchArgs),

    /// Fetch a module-scoped source zip
    Fetch(FetchArgs),

    /// Run the full cache warmup once and report
    Warmup,
}

/// Arguments for the `modules` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ModulesArgs {
    /// Provider to scan
    pub provider: String,

    /// Fetch READMEs and derive descriptions during the scan
    #[arg(long)]
    pub enrich: bool,
}

/// A module coordinate as three positional parts.
#[derive(Debug, Clone, clap::Args)]
pub struct CoordinateArgs {
    pub namespace: String,
    pub name: String,
    pub provider: String,
}

/// Arguments for the `search` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SearchArgs {
    /// Substring to match against flattened module names
    #[arg(default_value = "")]
    pub query: String,

    /// Restrict the search to one provider
    #[arg(long)]
    pub provider: Option<String>,
}

/// Arguments for the `fetch` command.
#[derive(Debug, Clone, clap::Args)]
#[command(disable_version_flag = true)]
pub struct FetchArgs {
    #[command(flatten)]
    pub coordinate: CoordinateArgs,

    /// Version to fetch (without the `v` prefix)
    pub version: String,

    /// Where to write the zip (defaults to {name}-{provider}-{version}.zip)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
