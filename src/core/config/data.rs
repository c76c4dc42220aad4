use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::book::BookInfo;
use crate::core::constants::{
    DEFAULT_BOOK_TAGLINE, DEFAULT_BOOK_TITLE, DEFAULT_MAX_RESULTS, DEFAULT_TEMPERATURE,
};
use crate::core::config::io::ConfigError;
use crate::core::endpoint::{Endpoint, EndpointTable, QueryMode, QueryOptions, RequestShape};
use crate::utils::url::validate_endpoint_url;

/// Name of the endpoint answering full-book queries.
pub const FULL_BOOK_ENDPOINT: &str = "full-book";
/// Name of the endpoint answering selected-text queries.
pub const SELECTED_TEXT_ENDPOINT: &str = "selected-text";
/// Name of the single `{question}` endpoint serving every mode.
pub const LEGACY_ENDPOINT: &str = "legacy";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Identifier of the book indexed by the full-book endpoint
    pub book_id: Option<String>,
    pub book_title: Option<String>,
    pub book_tagline: Option<String>,
    /// Query mode active when a session starts ("full" or "selected")
    pub default_mode: Option<QueryMode>,
    /// Result-count limit sent with full-book queries
    pub max_results: Option<u32>,
    pub temperature: Option<f64>,
    /// Optional TOML file replacing the built-in navigation tree
    pub nav_file: Option<PathBuf>,
    /// Endpoints in priority order; the first one serving a mode wins
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

/// Shape an endpoint gets when it is created by one of the well-known names.
pub fn shape_for_endpoint_name(name: &str) -> Option<RequestShape> {
    match name {
        FULL_BOOK_ENDPOINT => Some(RequestShape::FullBook),
        SELECTED_TEXT_ENDPOINT => Some(RequestShape::SelectedText),
        LEGACY_ENDPOINT => Some(RequestShape::Question),
        _ => None,
    }
}

impl Config {
    pub fn mode(&self) -> QueryMode {
        self.default_mode.unwrap_or_default()
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            book_id: self
                .book_id
                .as_ref()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }

    pub fn endpoint_table(&self) -> EndpointTable {
        let endpoints = self
            .endpoints
            .iter()
            .filter(|endpoint| !endpoint.url.trim().is_empty())
            .cloned()
            .collect();
        EndpointTable::new(endpoints, self.query_options())
    }

    pub fn book_info(&self) -> BookInfo {
        BookInfo {
            title: self
                .book_title
                .clone()
                .unwrap_or_else(|| DEFAULT_BOOK_TITLE.to_string()),
            tagline: self
                .book_tagline
                .clone()
                .unwrap_or_else(|| DEFAULT_BOOK_TAGLINE.to_string()),
        }
    }

    pub fn get_endpoint(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Replace the URL of `name`, or append a new endpoint with `shape`.
    pub fn set_endpoint(&mut self, name: &str, url: impl Into<String>, shape: RequestShape) {
        let url = url.into();
        match self
            .endpoints
            .iter_mut()
            .find(|e| e.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.url = url,
            None => self.endpoints.push(Endpoint::new(name, url, shape)),
        }
    }

    pub fn remove_endpoint(&mut self, name: &str) -> bool {
        let before = self.endpoints.len();
        self.endpoints.retain(|e| !e.name.eq_ignore_ascii_case(name));
        self.endpoints.len() != before
    }
}

/// Values layered over the file: environment first, then command-line flags.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigOverrides {
    pub book_id: Option<String>,
    pub mode: Option<QueryMode>,
    pub full_endpoint: Option<String>,
    pub selected_endpoint: Option<String>,
    pub legacy_endpoint: Option<String>,
}

impl ConfigOverrides {
    pub const ENV_BOOK_ID: &'static str = "BOOKCHAT_BOOK_ID";
    pub const ENV_MODE: &'static str = "BOOKCHAT_MODE";
    pub const ENV_FULL_ENDPOINT: &'static str = "BOOKCHAT_FULL_ENDPOINT";
    pub const ENV_SELECTED_ENDPOINT: &'static str = "BOOKCHAT_SELECTED_ENDPOINT";
    pub const ENV_LEGACY_ENDPOINT: &'static str = "BOOKCHAT_LEGACY_ENDPOINT";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`. Blank variables count as unset.
    ///
    /// An unknown mode is ignored with a warning; a malformed endpoint URL is an
    /// error, matching what `bookchat set` accepts.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let endpoint = |key: &str| {
            get(key)
                .map(|value| {
                    validate_endpoint_url(&value).map_err(|message| ConfigError::InvalidEnv {
                        var: key.to_string(),
                        message,
                    })
                })
                .transpose()
        };

        let mode = get(Self::ENV_MODE).and_then(|value| match value.parse::<QueryMode>() {
            Ok(mode) => Some(mode),
            Err(error) => {
                warn!(var = Self::ENV_MODE, %value, %error, "ignoring invalid query mode");
                None
            }
        });

        Ok(Self {
            book_id: get(Self::ENV_BOOK_ID),
            mode,
            full_endpoint: endpoint(Self::ENV_FULL_ENDPOINT)?,
            selected_endpoint: endpoint(Self::ENV_SELECTED_ENDPOINT)?,
            legacy_endpoint: endpoint(Self::ENV_LEGACY_ENDPOINT)?,
        })
    }

    /// Fields set in `other` win over fields set in `self`.
    pub fn merged_with(self, other: ConfigOverrides) -> Self {
        Self {
            book_id: other.book_id.or(self.book_id),
            mode: other.mode.or(self.mode),
            full_endpoint: other.full_endpoint.or(self.full_endpoint),
            selected_endpoint: other.selected_endpoint.or(self.selected_endpoint),
            legacy_endpoint: other.legacy_endpoint.or(self.legacy_endpoint),
        }
    }

    pub fn apply(&self, config: &mut Config) {
        if let Some(book_id) = &self.book_id {
            config.book_id = Some(book_id.clone());
        }
        if let Some(mode) = self.mode {
            config.default_mode = Some(mode);
        }
        for (name, url) in [
            (FULL_BOOK_ENDPOINT, &self.full_endpoint),
            (SELECTED_TEXT_ENDPOINT, &self.selected_endpoint),
            (LEGACY_ENDPOINT, &self.legacy_endpoint),
        ] {
            if let (Some(url), Some(shape)) = (url, shape_for_endpoint_name(name)) {
                config.set_endpoint(name, url.clone(), shape);
            }
        }
    }
}
