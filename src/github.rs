//! GitHub REST API client.
//!
//! Thin capability wrapper around a blocking HTTP client: attaches the
//! bearer credential and `Accept` header to every call and maps responses
//! into typed payloads. Policy lives in the callers - the client knows
//! nothing about caches, scanning, or retries.
//!
//! # Conventions
//!
//! Every helper returns `Err` only for transport-level failures. A non-2xx
//! status is an ordinary outcome (`Ok(None)` / `Ok(false)`): callers decide
//! whether that means "absent" or "skip this candidate".

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{CairnError, Result};

const JSON_ACCEPT: &str = "application/vnd.github.v3+json";
const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";

/// One entry of a recursive git tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root.
    pub path: String,
    /// `blob` for files, `tree` for directories.
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }

    pub fn is_tree(&self) -> bool {
        self.kind == "tree"
    }
}

/// One entry of a directory contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RepoSummary {
    name: String,
}

/// Blocking GitHub API client with bearer authentication.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client from settings, with a 30-second per-call timeout.
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: Client::builder()
                .user_agent("cairn")
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_base: settings.github_api_base.trim_end_matches('/').to_string(),
            token: settings.github_token.clone(),
        }
    }

    /// Base URL of the API this client talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn get(&self, url: &str, accept: &str) -> Result<reqwest::blocking::Response> {
        let mut request = self.client.get(url).header("Accept", accept);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request.send().map_err(|e| CairnError::upstream(url, e))
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.get(url, JSON_ACCEPT)?;
        if !response.status().is_success() {
            tracing::debug!("GET {} -> {}", url, response.status());
            return Ok(None);
        }
        let parsed = response.json().map_err(|e| CairnError::upstream(url, e))?;
        Ok(Some(parsed))
    }

    /// Check that a repository exists and is visible to the credential.
    pub fn repo_exists(&self, owner: &str, repo: &str) -> Result<bool> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let response = self.get(&url, JSON_ACCEPT)?;
        Ok(response.status().is_success())
    }

    /// Default branch of a repository, or `None` when it is not reachable.
    pub fn default_branch(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let info: Option<RepoInfo> = self.get_json(&url)?;
        Ok(info.map(|i| i.default_branch.unwrap_or_else(|| "main".to_string())))
    }

    /// Full recursive tree of a repository at the given branch.
    pub fn tree(&self, owner: &str, repo: &str, branch: &str) -> Result<Option<Vec<TreeEntry>>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, owner, repo, branch
        );
        let response: Option<TreeResponse> = self.get_json(&url)?;
        Ok(response.map(|r| r.tree))
    }

    /// Tag names of a repository, in upstream listing order.
    pub fn tags(&self, owner: &str, repo: &str) -> Result<Option<Vec<String>>> {
        let url = format!("{}/repos/{}/{}/tags", self.api_base, owner, repo);
        let tags: Option<Vec<TagInfo>> = self.get_json(&url)?;
        Ok(tags.map(|t| t.into_iter().map(|tag| tag.name).collect()))
    }

    /// One page of the owner's repository names.
    ///
    /// Tries the organization listing first and falls back to the user
    /// listing, mirroring how owners may be either kind of account.
    pub fn list_repos(&self, owner: &str, page: u32) -> Result<Option<Vec<String>>> {
        let org_url = format!(
            "{}/orgs/{}/repos?per_page=100&type=all&page={}",
            self.api_base, owner, page
        );
        if let Some(repos) = self.get_json::<Vec<RepoSummary>>(&org_url)? {
            return Ok(Some(repos.into_iter().map(|r| r.name).collect()));
        }

        let user_url = format!(
            "{}/users/{}/repos?per_page=100&type=owner&page={}",
            self.api_base, owner, page
        );
        let repos: Option<Vec<RepoSummary>> = self.get_json(&user_url)?;
        Ok(repos.map(|r| r.into_iter().map(|s| s.name).collect()))
    }

    /// Raw text of a file via the contents API.
    pub fn contents_raw(&self, owner: &str, repo: &str, path: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, owner, repo, path
        );
        let response = self.get(&url, RAW_ACCEPT)?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let text = response.text().map_err(|e| CairnError::upstream(&url, e))?;
        Ok(Some(text))
    }

    /// Directory listing via the contents API.
    pub fn contents_dir(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<Vec<ContentEntry>>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, owner, repo, path
        );
        self.get_json(&url)
    }

    /// Root README of a repository, raw.
    pub fn root_readme(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, owner, repo);
        let response = self.get(&url, RAW_ACCEPT)?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let text = response.text().map_err(|e| CairnError::upstream(&url, e))?;
        Ok(Some(text))
    }

    /// Full-repository snapshot archive for a ref.
    pub fn zipball(&self, owner: &str, repo: &str, git_ref: &str) -> Result<Option<Vec<u8>>> {
        let url = format!(
            "{}/repos/{}/{}/zipball/{}",
            self.api_base, owner, repo, git_ref
        );
        let response = self.get(&url, JSON_ACCEPT)?;
        if !response.status().is_success() {
            tracing::debug!("GET {} -> {}", url, response.status());
            return Ok(None);
        }
        let bytes = response
            .bytes()
            .map_err(|e| CairnError::upstream(&url, e))?;
        Ok(Some(bytes.to_vec()))
    }

    /// Whether the owner resolves as an organization.
    pub fn org_exists(&self, owner: &str) -> Result<bool> {
        let url = format!("{}/orgs/{}", self.api_base, owner);
        let response = self.get(&url, JSON_ACCEPT)?;
        Ok(response.status().is_success())
    }

    /// Whether the owner resolves as a user account.
    pub fn user_exists(&self, owner: &str) -> Result<bool> {
        let url = format!("{}/users/{}", self.api_base, owner);
        let response = self.get(&url, JSON_ACCEPT)?;
        Ok(response.status().is_success())
    }
}
