//! Repository tree scanning and structured cache population.
//!
//! A scan turns one provider's candidate repositories into
//! [`ModuleRecord`]s: fetch the default branch and recursive tree, keep the
//! directories under the module prefix that directly contain a `.tf` file,
//! drop scaffolding (`examples`/`fixtures`/`tests`), derive the naming
//! hierarchy, optionally enrich with README-derived descriptions, and
//! insert everything into the structured cache. A repository that fails any
//! step is skipped; the scan never aborts as a whole.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::cache::ModuleRecord;
use crate::config::MODULE_PREFIX;
use crate::error::Result;
use crate::github::TreeEntry;
use crate::registry::coordinate::{flatten_path, title_case};
use crate::registry::{fetch_or_skip, ModuleRegistry};

static HTML_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!--.*?-->").unwrap());

/// Path segments that mark auxiliary directories, not modules.
const SCAFFOLDING_SEGMENTS: [&str; 3] = ["examples", "fixtures", "tests"];

impl ModuleRegistry {
    /// All modules of a provider, scanning its repositories when the
    /// structured cache is cold.
    ///
    /// A warm provider subtree is served as-is, unscanned - even when it
    /// was populated without enrichment. Records come back sorted by
    /// flattened name. A provider with no backing repositories yields an
    /// empty list without marking the provider as scanned.
    pub fn modules_for_provider(&self, provider: &str, enrich: bool) -> Result<Vec<ModuleRecord>> {
        if self.structured().contains_provider(provider) {
            return Ok(self.structured().provider_modules(provider));
        }
        tracing::info!("Structured cache miss for provider '{}', scanning", provider);

        let target_repos = self
            .providers()?
            .into_iter()
            .find(|p| p.name == provider)
            .map(|p| p.repos)
            .unwrap_or_default();
        if target_repos.is_empty() {
            return Ok(Vec::new());
        }

        let owner = self.owner()?.to_string();
        // Mark the provider scanned up front: a scan that finds nothing
        // still counts, and later lookups are served from cache.
        self.structured().ensure_provider(provider);

        let mut records = Vec::new();
        for repo in &target_repos {
            let context = format!("default branch for {}/{}", owner, repo);
            let Some(branch) = fetch_or_skip(self.client().default_branch(&owner, repo), &context)
            else {
                continue;
            };

            let context = format!("tree for {}/{}", owner, repo);
            let Some(tree) = fetch_or_skip(self.client().tree(&owner, repo, &branch), &context)
            else {
                continue;
            };

            // One tag fetch per repository, shared by every module in it.
            let versions = self.repo_tags(repo);

            for module_path in module_dirs(&tree) {
                let rel_path = module_path
                    .strip_prefix(MODULE_PREFIX)
                    .unwrap_or(&module_path)
                    .trim_start_matches('/');
                if rel_path.is_empty() || is_scaffolding(&module_path) {
                    continue;
                }

                let record = self.build_record(
                    &owner,
                    repo,
                    &branch,
                    provider,
                    &module_path,
                    rel_path,
                    &versions,
                    enrich,
                );
                self.structured().insert(record.clone());
                records.push(record);
            }
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_record(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        provider: &str,
        module_path: &str,
        rel_path: &str,
        versions: &[String],
        enrich: bool,
    ) -> ModuleRecord {
        let naming = ModuleNaming::from_rel_path(rel_path);

        let mut description = format!("Module {} ({})", naming.name, provider);
        let mut readme = None;
        if enrich {
            let readme_path = format!("{}/README.md", module_path);
            match self.client().contents_raw(owner, repo, &readme_path) {
                Ok(Some(text)) => {
                    if let Some(line) = extract_description(&text) {
                        description = line;
                    }
                    readme = Some(text);
                }
                Ok(None) => {
                    tracing::debug!("No README for {}, using synthesized description", rel_path);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch README for {}: {}", naming.name, e);
                }
            }
        }

        ModuleRecord {
            namespace: owner.to_string(),
            name: naming.name,
            short_name: naming.short_name,
            group: naming.group,
            group_slug: naming.group_slug,
            parent: naming.parent,
            parent_slug: naming.parent_slug,
            subfolder: naming.subfolder,
            provider: provider.to_string(),
            repo_name: repo.to_string(),
            path: rel_path.to_string(),
            description,
            versions: versions.to_vec(),
            url: format!(
                "https://github.com/{}/{}/tree/{}/{}",
                owner, repo, branch, module_path
            ),
            readme,
        }
    }
}

/// Naming hierarchy derived from a prefix-relative module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleNaming {
    pub name: String,
    pub short_name: String,
    pub group: String,
    pub group_slug: String,
    pub parent: String,
    pub parent_slug: String,
    pub subfolder: String,
}

impl ModuleNaming {
    /// Derive names from a relative path.
    ///
    /// `net/vpc` -> group `net`, parent `general`, module `net_vpc`.
    /// `security/firewall/waf` -> group `security`, parent `firewall`.
    /// The parent falls back to the `general` sentinel until the path is
    /// deeper than two segments.
    pub fn from_rel_path(rel_path: &str) -> Self {
        let parts: Vec<&str> = rel_path.split('/').collect();

        let group_slug = parts[0].to_string();
        let group = title_case(&group_slug);

        let (parent_slug, parent) = if parts.len() > 2 {
            (parts[1].to_string(), title_case(parts[1]))
        } else {
            ("general".to_string(), "General".to_string())
        };

        let subfolder = if parts.len() >= 2 {
            parts[parts.len() - 2].to_string()
        } else {
            "root".to_string()
        };

        Self {
            name: flatten_path(rel_path),
            short_name: parts[parts.len() - 1].replace('-', "_"),
            group,
            group_slug,
            parent,
            parent_slug,
            subfolder,
        }
    }
}

/// Distinct directories under the module prefix that directly contain a
/// `.tf` blob. Sorted for deterministic scan order.
pub(crate) fn module_dirs(tree: &[TreeEntry]) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    let under_prefix = format!("{}/", MODULE_PREFIX);
    for entry in tree {
        if !entry.is_blob() || !entry.path.ends_with(".tf") {
            continue;
        }
        if !entry.path.starts_with(&under_prefix) {
            continue;
        }
        if let Some((dir, _)) = entry.path.rsplit_once('/') {
            dirs.insert(dir.to_string());
        }
    }
    dirs
}

/// Whether any path segment marks the directory as scaffolding.
pub(crate) fn is_scaffolding(path: &str) -> bool {
    path.split('/')
        .any(|segment| SCAFFOLDING_SEGMENTS.contains(&segment))
}

/// First line of a README usable as a one-line description: non-empty,
/// not a heading or setext underline, not a badge, HTML comments stripped.
pub(crate) fn extract_description(readme: &str) -> Option<String> {
    for line in readme.lines() {
        let stripped = HTML_COMMENT_RE.replace_all(line.trim(), "");
        let candidate = stripped.trim();
        if candidate.is_empty()
            || candidate.starts_with("[!")
            || candidate.starts_with('#')
            || candidate.starts_with('=')
        {
            continue;
        }
        return Some(candidate.to_string());
    }
    None
}
