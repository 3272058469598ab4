//! Environment-driven configuration.
//!
//! The process environment is captured once at startup so that library code
//! never reads `std::env` directly and tests can supply their own values.

use std::collections::HashMap;
use std::time::Duration;

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Snapshot of the environment variables this tool understands
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable, treating empty values as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Token for the GitHub API (`GH_TOKEN`, then `GITHUB_TOKEN`)
    pub fn github_token(&self) -> Option<String> {
        self.get("GH_TOKEN").or_else(|| self.get("GITHUB_TOKEN"))
    }

    /// GitHub API base URL without trailing slash
    pub fn github_api_url(&self) -> String {
        self.get("GITHUB_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string())
    }

    /// HTTP timeout from `CENTRAL_UPLOADER_HTTP_TIMEOUT`, clamped to [1, 300] seconds
    pub fn http_timeout(&self) -> Duration {
        let secs = self
            .get("CENTRAL_UPLOADER_HTTP_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(|v| v.clamp(1, MAX_HTTP_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}
