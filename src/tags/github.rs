//! GitHub REST API tag listing.

use super::TagSource;
use crate::config::EnvConfig;
use crate::error::{ReleaseError, Result, ServiceError};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;

/// Entries per page requested from the API (GitHub's maximum)
pub const PER_PAGE: usize = 100;

/// Upper bound on pages walked for a single listing; a listing still full
/// at this page is an error, never a partial result.
pub const MAX_PAGES: usize = 100;

const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Tag source backed by `GET /repos/{owner}/{repo}/tags`
#[derive(Debug, Clone)]
pub struct GitHubTagClient {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubTagClient {
    /// Create a client from environment configuration
    pub fn new(env_config: &EnvConfig) -> Result<Self> {
        Self::with_api_url(
            env_config.github_api_url(),
            env_config.github_token(),
            env_config.http_timeout(),
        )
    }

    /// Create a client against an explicit API base URL
    pub fn with_api_url(
        api_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_url = api_url.into().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ReleaseError::Service(ServiceError::RequestFailed {
                    url: api_url.clone(),
                    reason: format!("Invalid GitHub token: {}", e),
                })
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ReleaseError::Service(ServiceError::RequestFailed {
                    url: api_url.clone(),
                    reason: format!("Failed to build HTTP client: {}", e),
                })
            })?;

        Ok(Self { client, api_url })
    }

    fn tags_url(&self, owner: &str, project: &str, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/tags?per_page={}&page={}",
            self.api_url, owner, project, PER_PAGE, page
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<Vec<serde_json::Value>> {
        log::debug!("url: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            ReleaseError::Service(ServiceError::RequestFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
        })?;

        let status = response.status();
        log::debug!("status code: {}", status.as_u16());
        if !status.is_success() {
            return Err(ReleaseError::Service(ServiceError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            ReleaseError::Service(ServiceError::MalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })
        })?;

        match body {
            serde_json::Value::Array(items) => Ok(items),
            other => Err(ReleaseError::Service(ServiceError::MalformedResponse {
                url: url.to_string(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            })),
        }
    }
}

impl TagSource for GitHubTagClient {
    async fn list_tags(&self, owner: &str, project: &str) -> Result<Vec<String>> {
        let mut tags = Vec::new();

        for page in 1..=MAX_PAGES {
            let url = self.tags_url(owner, project, page);
            let items = self.fetch_page(&url).await?;
            let count = items.len();

            tags.extend(tag_names(items));

            if count < PER_PAGE {
                log::debug!("Fetched {} tags for {}/{}", tags.len(), owner, project);
                return Ok(tags);
            }
        }

        Err(ReleaseError::Service(ServiceError::Truncated {
            repository: format!("{}/{}", owner, project),
            pages: MAX_PAGES,
        }))
    }
}

/// Extract tag names from API entries, skipping entries without a `name`.
fn tag_names(items: Vec<serde_json::Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<TagEntry>(item.clone()) {
            Ok(entry) => Some(entry.name),
            Err(_) => {
                log::warn!("No key 'name' in GitHub API response: {}", item);
                None
            }
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
