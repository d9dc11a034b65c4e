//! Provider discovery.
//!
//! Providers are not declared anywhere: they are inferred from repository
//! names following the `*terraform-{provider}-modules` convention under the
//! owning account.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::Result;
use crate::registry::{fetch_or_skip, ModuleRegistry};

/// Pagination guard for owner repository listing (100 pages = 10k repos).
const MAX_REPO_PAGES: u32 = 100;

static PROVIDER_REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.*terraform-(.+)-modules$").unwrap());

/// A provider and the shared repositories backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub repos: Vec<String>,
}

impl ModuleRegistry {
    /// Discover available providers by scanning repository names.
    ///
    /// With an explicit shared repository configured, the provider is parsed
    /// from its name. Otherwise every repository of the owning account is
    /// listed (paginated) and matched against the naming convention. The
    /// result is flat-cached. Single-repo mode has no discoverable provider
    /// set and yields an empty list.
    pub fn providers(&self) -> Result<Vec<Provider>> {
        if let Some(cached) = self.flat().providers.get("providers") {
            return Ok(cached);
        }

        if !self.settings().is_monorepo() {
            return Ok(Vec::new());
        }

        let result = match &self.settings().monorepo_name {
            Some(repo) => vec![Provider {
                name: provider_from_explicit_name(repo).unwrap_or_else(|| "aws".to_string()),
                repos: vec![repo.clone()],
            }],
            None => self.discover_providers()?,
        };

        self.flat().providers.insert("providers", result.clone());
        Ok(result)
    }

    fn discover_providers(&self) -> Result<Vec<Provider>> {
        let owner = self.owner()?.to_string();

        let mut all_repos = Vec::new();
        let mut page = 1;
        loop {
            let context = format!("repository list for {} (page {})", owner, page);
            let Some(repos) = fetch_or_skip(self.client().list_repos(&owner, page), &context)
            else {
                break;
            };
            if repos.is_empty() {
                break;
            }
            all_repos.extend(repos);
            page += 1;
            if page > MAX_REPO_PAGES {
                break;
            }
        }

        let mut providers: Vec<Provider> = Vec::new();
        for repo in all_repos {
            let Some(name) = provider_from_repo_name(&repo) else {
                continue;
            };
            match providers.iter_mut().find(|p| p.name == name) {
                Some(provider) => provider.repos.push(repo),
                None => providers.push(Provider {
                    name,
                    repos: vec![repo],
                }),
            }
        }
        Ok(providers)
    }
}

/// Extract the provider from a conventionally named repository,
/// lowercased: `Corp-Terraform-AWS-Modules` -> `aws`.
pub(crate) fn provider_from_repo_name(repo: &str) -> Option<String> {
    PROVIDER_REPO_RE
        .captures(repo)
        .map(|caps| caps[1].to_lowercase())
}

/// Whether a repository name backs the given provider.
pub(crate) fn matches_provider_repo(repo: &str, provider: &str) -> bool {
    provider_from_repo_name(repo)
        .map(|p| p == provider.to_lowercase())
        .unwrap_or(false)
}

/// Parse the provider out of an explicitly configured repository name.
///
/// Only the strict `terraform-{provider}-modules` shape is recognized here;
/// hyphenated providers keep just their first segment, matching the
/// dash-split convention for explicit names.
fn provider_from_explicit_name(repo: &str) -> Option<String> {
    let parts: Vec<&str> = repo.split('-').collect();
    if parts.len() >= 3 && parts[0] == "terraform" && parts[parts.len() - 1] == "modules" {
        Some(parts[1].to_string())
    } else {
        None
    }
}
