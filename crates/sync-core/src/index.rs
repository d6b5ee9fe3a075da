//! Public package index lookups
//!
//! The resolver only needs to know whether the public plugin/theme directory
//! lists a slug; if it does, the mirror at wpackagist serves it under a
//! predictable package id.

use std::collections::HashSet;
use std::time::Duration;

use crate::component::ComponentKind;
use crate::error::{Error, Result};

/// Default lookup URL. `{kind}` is `plugin` or `theme`.
pub const DEFAULT_API_URL: &str = "https://api.wordpress.org/{kind}s/info/1.0/{slug}.json";

/// Repository added to composer.json when the index resolved anything.
pub const DEFAULT_REPOSITORY_URL: &str = "https://wpackagist.org";

/// Answers whether a slug is published on the public index.
pub trait PackageIndex {
    /// `false` covers both "not listed" and "could not ask".
    fn exists(&self, kind: ComponentKind, slug: &str) -> bool;
}

/// Blocking HTTP client against the public index.
#[derive(Debug, Clone)]
pub struct HttpPackageIndex {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl HttpPackageIndex {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("composer-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Expand the URL template for one component.
    pub fn lookup_url(&self, kind: ComponentKind, slug: &str) -> String {
        expand_template(&self.api_url, kind, slug)
    }
}

impl PackageIndex for HttpPackageIndex {
    fn exists(&self, kind: ComponentKind, slug: &str) -> bool {
        let url = self.lookup_url(kind, slug);
        match self.client.get(&url).send() {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(%url, %status, "package index responded");
                status == reqwest::StatusCode::OK
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "package index lookup failed");
                false
            }
        }
    }
}

/// Index used with `--offline`: nothing is ever found.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineIndex;

impl PackageIndex for OfflineIndex {
    fn exists(&self, _kind: ComponentKind, _slug: &str) -> bool {
        false
    }
}

/// Index backed by a fixed set of published slugs.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    published: HashSet<(ComponentKind, String)>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a slug as published for `kind`.
    pub fn with(mut self, kind: ComponentKind, slug: impl Into<String>) -> Self {
        self.published.insert((kind, slug.into()));
        self
    }
}

impl PackageIndex for StaticIndex {
    fn exists(&self, kind: ComponentKind, slug: &str) -> bool {
        self.published.contains(&(kind, slug.to_string()))
    }
}

fn expand_template(template: &str, kind: ComponentKind, slug: &str) -> String {
    template
        .replace("{kind}", kind.as_str())
        .replace("{slug}", slug)
}
