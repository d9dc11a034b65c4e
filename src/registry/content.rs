//! Module README and example-directory lookups.

use serde::{Deserialize, Serialize};

use crate::config::MODULE_PREFIX;
use crate::error::Result;
use crate::registry::coordinate::{ModuleCoordinate, ModuleLocation};
use crate::registry::{fetch_or_skip, ModuleRegistry};

/// One example directory shipped next to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleDir {
    pub name: String,
    pub url: String,
}

impl ModuleRegistry {
    /// Raw README markdown for a module.
    ///
    /// Served from the structured cache when a scan enriched it, then the
    /// flat cache (negatives included), then fetched: `README.md` under the
    /// module directory with a lowercase `readme.md` fallback, or the
    /// repository root README outside shared-repository mode.
    pub fn readme(&self, coord: &ModuleCoordinate) -> Result<Option<String>> {
        let enriched = self
            .structured()
            .find(&coord.provider, &coord.name)
            .and_then(|record| record.readme.clone());
        if let Some(text) = enriched {
            return Ok(Some(text));
        }

        if let Some(cached) = self.flat().readmes.get(&coord.readme_key()) {
            return Ok(cached);
        }

        let Some(location) = self.resolve(coord)? else {
            return Ok(None);
        };
        let repo_owner = self.repo_owner_for(coord)?;

        let text = if self.settings().is_monorepo() {
            let base = module_base_path(&location);
            let context = format!("README for {}", coord);
            let primary = format!("{}/README.md", base);
            match fetch_or_skip(
                self.client().contents_raw(&repo_owner, &location.repo, &primary),
                &context,
            ) {
                Some(text) => Some(text),
                None => {
                    let fallback = format!("{}/readme.md", base);
                    fetch_or_skip(
                        self.client().contents_raw(&repo_owner, &location.repo, &fallback),
                        &context,
                    )
                }
            }
        } else {
            let context = format!("root README for {}/{}", repo_owner, location.repo);
            fetch_or_skip(self.client().root_readme(&repo_owner, &location.repo), &context)
        };

        self.flat().readmes.insert(coord.readme_key(), text.clone());
        Ok(text)
    }

    /// Example directories under `{module path}/examples`.
    ///
    /// A missing examples directory is an empty list, cached like any other
    /// point lookup.
    pub fn examples(&self, coord: &ModuleCoordinate) -> Result<Vec<ExampleDir>> {
        if let Some(cached) = self.flat().examples.get(&coord.examples_key()) {
            return Ok(cached);
        }

        let Some(location) = self.resolve(coord)? else {
            return Ok(Vec::new());
        };
        let repo_owner = self.repo_owner_for(coord)?;

        let examples_path = if self.settings().is_monorepo() {
            format!("{}/examples", module_base_path(&location))
        } else {
            "examples".to_string()
        };

        let context = format!("examples listing for {}", coord);
        let entries = fetch_or_skip(
            self.client()
                .contents_dir(&repo_owner, &location.repo, &examples_path),
            &context,
        )
        .unwrap_or_default();

        let examples: Vec<ExampleDir> = entries
            .into_iter()
            .filter(|entry| entry.kind == "dir")
            .map(|entry| ExampleDir {
                name: entry.name,
                url: entry.html_url.unwrap_or_default(),
            })
            .collect();

        self.flat()
            .examples
            .insert(coord.examples_key(), examples.clone());
        Ok(examples)
    }
}

/// In-repository directory of a resolved module.
fn module_base_path(location: &ModuleLocation) -> String {
    if location.path.is_empty() {
        MODULE_PREFIX.to_string()
    } else {
        format!("{}/{}", MODULE_PREFIX, location.path)
    }
}
