//! API base URL resolution.
//!
//! The backend base URL comes from configuration. When a page is served over
//! https and the configured base points at the same host over http, browsers
//! block the request as mixed content. The base is then either dropped in
//! favour of same-origin relative paths or upgraded to https, depending on
//! [`MixedContentPolicy`].

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Adjustment applied when an https page would call an http backend on its
/// own host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedContentPolicy {
    /// Use relative paths on the page origin.
    #[default]
    SameOrigin,
    /// Keep host, port and path but switch the scheme to https.
    UpgradeScheme,
}

/// Origin of the page that will issue requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrigin {
    pub secure: bool,
    /// Hostname without port.
    pub host: String,
}

/// Resolved base for composing request URLs. Empty means same-origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiBase(String);

impl ApiBase {
    pub fn resolve(
        configured: Option<&str>,
        page: Option<&PageOrigin>,
        policy: MixedContentPolicy,
    ) -> Self {
        let raw = configured.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Self::default();
        }
        let as_is = Self(raw.trim_end_matches('/').to_string());

        let Some(page) = page.filter(|page| page.secure) else {
            return as_is;
        };
        let Ok(mut url) = Url::parse(raw) else {
            return as_is;
        };
        if url.host_str() != Some(page.host.as_str()) {
            return as_is;
        }

        match policy {
            MixedContentPolicy::SameOrigin => Self::default(),
            MixedContentPolicy::UpgradeScheme if url.scheme() == "http" => {
                if url.set_scheme("https").is_err() {
                    return as_is;
                }
                Self(url.as_str().trim_end_matches('/').to_string())
            }
            MixedContentPolicy::UpgradeScheme => as_is,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when requests use paths relative to the page origin.
    pub fn is_relative(&self) -> bool {
        self.0.is_empty()
    }

    /// Joins `path` onto the base, adding a leading `/` when missing.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }
}
