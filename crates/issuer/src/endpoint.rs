//! Relay server URL construction.

use common::protocol::{ApiType, ServerSection};

/// Location of the relay API, captured from the `server` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    host: String,
    port: u16,
    base_path: String,
}

impl RelayEndpoint {
    pub fn from_section(section: &ServerSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port,
            base_path: section.base_path.trim_end_matches('/').to_owned(),
        }
    }

    /// `<host>:<port>`, without the API base path.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full URL of `path` under the API base path.
    ///
    /// An empty `path` yields [`Self::base_url`]. A leading `/` is added to
    /// `path` when missing.
    pub fn url(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url();
        }
        let sep = if path.starts_with('/') { "" } else { "/" };
        format!("{}{}{sep}{path}", self.base_url(), self.base_path)
    }

    /// Health check URL; served outside the API base path.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url())
    }

    /// URL of `api_type` carrying `token` as its `token` query parameter.
    ///
    /// Tokens are base64url without padding, so no escaping is needed.
    pub fn url_with_token(&self, token: &str, api_type: ApiType) -> String {
        format!("{}?token={}", self.url(api_type.path()), token.trim())
    }
}
