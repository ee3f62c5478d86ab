// SPDX-License-Identifier: AGPL-3.0
// GoMate Core - Client configuration
//
// Defaults target the public dummyjson.com demo API.
// Every value can be overridden from the environment.

use crate::types::AppError;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";
pub const DEFAULT_LIST_FETCH_LIMIT: usize = 30;
pub const DEFAULT_LIST_CAP: usize = 20;
pub const DEFAULT_SEARCH_CAP: usize = 10;

/// Runtime configuration shared by the remote client and the stores
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the remote catalog service, without trailing slash
    pub api_base_url: String,
    /// `limit` query parameter sent with the listing request
    pub list_fetch_limit: usize,
    /// Maximum number of listing records mapped for display
    pub list_cap: usize,
    /// Maximum number of search records mapped for display
    pub search_cap: usize,
    /// Location of the key-value storage file
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            list_fetch_limit: DEFAULT_LIST_FETCH_LIMIT,
            list_cap: DEFAULT_LIST_CAP,
            search_cap: DEFAULT_SEARCH_CAP,
            storage_path: default_storage_path(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from `GOMATE_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("GOMATE_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(cap) = parse_usize_var("GOMATE_LIST_CAP") {
            config.list_cap = cap;
        }
        if let Some(cap) = parse_usize_var("GOMATE_SEARCH_CAP") {
            config.search_cap = cap;
        }
        if let Ok(path) = env::var("GOMATE_STORAGE_PATH") {
            config.storage_path = PathBuf::from(path);
        }

        config
    }

    /// Point the client at another base URL, e.g. a local mock server
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(AppError::InvalidConfig(format!(
                "API base URL must be http(s): {}",
                self.api_base_url
            )));
        }
        if self.list_cap == 0 || self.search_cap == 0 {
            return Err(AppError::InvalidConfig(
                "Result caps must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_usize_var(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}, using default: {}", name, raw, e);
            None
        }
    }
}

/// Get the default path of the storage file
fn default_storage_path() -> PathBuf {
    directories::ProjectDirs::from("com", "gomate", "gomate")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storage.json")
}
