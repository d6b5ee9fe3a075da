//! Known private ("pro") repositories
//!
//! Commercial plugins are not on the public index, and a public package with
//! the same slug must never stand in for them. A pro-repository manifest maps
//! plugin display names (and optionally slugs) to package ids served from a
//! private composer repository:
//!
//! ```json
//! {
//!   "repositories": [
//!     {
//!       "url": "https://connect.advancedcustomfields.com",
//!       "type": "composer",
//!       "plugins": {
//!         "Advanced Custom Fields Pro": "advanced-custom-fields/advanced-custom-fields-pro",
//!         "ACF Extended Pro": { "package": "acf-extended/acf-extended-pro", "slug": "acf-extended-pro" }
//!       }
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sync_fs::{NormalizedPath, io};

use crate::component::RepositoryDescriptor;

/// Operator-owned override, checked first.
pub const OVERRIDE_FILENAME: &str = "pro-plugins.json";

/// Shipped default template, checked second.
pub const DEFAULT_FILENAME: &str = "pro-plugins.default.json";

/// One private repository and the plugins it serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProRepository {
    pub url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Display name -> package id, or `{package, slug}`. Kept as raw JSON so
    /// one malformed entry does not invalidate the rest.
    #[serde(default)]
    pub plugins: Map<String, Value>,
}

impl ProRepository {
    fn descriptor(&self) -> RepositoryDescriptor {
        match &self.kind {
            Some(kind) => RepositoryDescriptor {
                kind: kind.clone(),
                url: self.url.clone(),
            },
            None => RepositoryDescriptor::composer(&self.url),
        }
    }
}

/// A plugin entry in either of its two accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum PluginEntry {
    Package(String),
    Detailed {
        package: String,
        #[serde(default)]
        slug: Option<String>,
    },
}

impl PluginEntry {
    fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    fn package(&self) -> &str {
        match self {
            Self::Package(package) | Self::Detailed { package, .. } => package,
        }
    }

    fn slug(&self) -> Option<&str> {
        match self {
            Self::Package(_) => None,
            Self::Detailed { slug, .. } => slug.as_deref().filter(|s| !s.is_empty()),
        }
    }
}

/// A match from the pro-repository manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProRepoMatch {
    pub package: String,
    pub repository: RepositoryDescriptor,
}

/// The ordered list of known private repositories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProRepoManifest {
    /// Definitions that fail to parse (no `url`, `plugins` not an object)
    /// are dropped one by one; the rest of the file still applies.
    #[serde(default, deserialize_with = "lenient_repositories")]
    pub repositories: Vec<ProRepository>,
}

fn lenient_repositories<'de, D>(deserializer: D) -> std::result::Result<Vec<ProRepository>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, definition)| {
            serde_json::from_value(definition)
                .map_err(|e| {
                    tracing::warn!(position, error = %e, "skipping malformed pro-repository definition");
                })
                .ok()
        })
        .collect())
}

impl ProRepoManifest {
    /// Parse a manifest from JSON content.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// The minimal mapping used when no manifest file is available.
    pub fn builtin() -> Self {
        let mut plugins = Map::new();
        plugins.insert(
            "Advanced Custom Fields Pro".to_string(),
            Value::String("advanced-custom-fields/advanced-custom-fields-pro".to_string()),
        );
        Self {
            repositories: vec![ProRepository {
                url: "https://connect.advancedcustomfields.com".to_string(),
                kind: Some("composer".to_string()),
                plugins,
            }],
        }
    }

    /// Load the manifest from `dir`.
    ///
    /// The first existing file among [`OVERRIDE_FILENAME`] and
    /// [`DEFAULT_FILENAME`] wins. A missing directory, no file, or a file that
    /// cannot be read or parsed all fall back to [`ProRepoManifest::builtin`].
    pub fn load(dir: Option<&NormalizedPath>) -> Self {
        let Some(dir) = dir else {
            return Self::builtin();
        };

        let Some(path) = [OVERRIDE_FILENAME, DEFAULT_FILENAME]
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
        else {
            tracing::debug!(dir = %dir, "no pro-repository manifest found, using built-in map");
            return Self::builtin();
        };

        let parsed = io::read_text(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::parse(&content).map_err(|e| e.to_string()));

        match parsed {
            Ok(manifest) => {
                tracing::info!(
                    path = %path,
                    repositories = manifest.repositories.len(),
                    "loaded pro-repository manifest"
                );
                manifest
            }
            Err(message) => {
                tracing::warn!(path = %path, %message, "ignoring unreadable pro-repository manifest");
                Self::builtin()
            }
        }
    }

    /// Look up a plugin by display name, then by slug.
    ///
    /// Definitions and their entries are scanned in order and the first entry
    /// that matches wins. Within one entry a name match is checked before a
    /// slug match; an earlier entry always beats a later one.
    pub fn find(&self, name: &str, slug: Option<&str>) -> Option<ProRepoMatch> {
        let slug = slug.filter(|s| !s.is_empty());

        for repository in &self.repositories {
            for (entry_name, value) in &repository.plugins {
                let Some(entry) = PluginEntry::from_value(value) else {
                    tracing::debug!(entry = %entry_name, "skipping malformed pro-repository entry");
                    continue;
                };

                let name_match = entry_name == name;
                let slug_match = matches!((slug, entry.slug()), (Some(q), Some(e)) if q == e);

                if name_match || slug_match {
                    return Some(ProRepoMatch {
                        package: entry.package().to_string(),
                        repository: repository.descriptor(),
                    });
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> ProRepoManifest {
        ProRepoManifest::parse(
            r#"{
                "repositories": [
                    {
                        "url": "https://first.example.com",
                        "plugins": {
                            "Gravity Forms": "gravity/gravityforms",
                            "Search Pro": {"package": "first/search-pro", "slug": "search"}
                        }
                    },
                    {
                        "url": "https://second.example.com",
                        "type": "vcs",
                        "plugins": {
                            "Other Search": {"package": "second/search", "slug": "search"},
                            "Broken": 42,
                            "Gravity Forms Alt": {"package": "second/gravity", "slug": "gravityforms"}
                        }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_matches_acf_pro() {
        let found = ProRepoManifest::builtin()
            .find("Advanced Custom Fields Pro", Some("advanced-custom-fields-pro"))
            .unwrap();
        assert_eq!(found.package, "advanced-custom-fields/advanced-custom-fields-pro");
        assert_eq!(found.repository.url, "https://connect.advancedcustomfields.com");
        assert_eq!(found.repository.kind, "composer");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(ProRepoManifest::builtin().find("Akismet", Some("akismet")), None);
    }

    #[test]
    fn test_match_by_name_uses_default_type() {
        let found = sample().find("Gravity Forms", None).unwrap();
        assert_eq!(found.package, "gravity/gravityforms");
        assert_eq!(found.repository, RepositoryDescriptor::composer("https://first.example.com"));
    }

    #[test]
    fn test_match_by_slug() {
        let found = sample().find("Renamed Display Name", Some("gravityforms")).unwrap();
        assert_eq!(found.package, "second/gravity");
        assert_eq!(found.repository.kind, "vcs");
    }

    #[test]
    fn test_earlier_definition_wins_over_later_name_match() {
        // "search" slug matches in the first definition before the second is scanned
        let found = sample().find("Other Search", Some("search")).unwrap();
        assert_eq!(found.package, "first/search-pro");
    }

    #[test]
    fn test_name_match_in_first_beats_slug_match_in_later() {
        let found = sample().find("Gravity Forms", Some("gravityforms")).unwrap();
        assert_eq!(found.package, "gravity/gravityforms");
    }

    #[test]
    fn test_plain_entries_never_match_by_slug() {
        assert_eq!(sample().find("Unknown", Some("gravity/gravityforms")), None);
    }

    #[test]
    fn test_empty_slug_is_ignored() {
        let manifest = ProRepoManifest::parse(
            r#"{"repositories":[{"url":"https://x.example","plugins":{"A":{"package":"x/a","slug":""}}}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.find("B", Some("")), None);
    }

    #[test]
    fn test_malformed_definition_skipped_individually() {
        let manifest = ProRepoManifest::parse(
            r#"{"repositories": [
                {"type": "composer", "plugins": {"No Url": "x/no-url"}},
                {"type": "composer", "plugins": []},
                {"url": "https://good.example", "plugins": {"Gravity Forms": "gravity/gravityforms"}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(manifest.repositories.len(), 1);
        assert_eq!(manifest.find("No Url", None), None);
        let found = manifest.find("Gravity Forms", None).unwrap();
        assert_eq!(found.repository.url, "https://good.example");
    }

    #[test]
    fn test_load_keeps_good_definitions_next_to_bad_ones() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(OVERRIDE_FILENAME),
            r#"{"repositories":[{"type":"composer","plugins":[]},{"url":"https://override.example","plugins":{"A":"o/a"}}]}"#,
        )
        .unwrap();

        let manifest = ProRepoManifest::load(Some(&NormalizedPath::new(temp.path())));
        assert_eq!(manifest.find("A", None).unwrap().package, "o/a");
        assert!(manifest.find("Advanced Custom Fields Pro", None).is_none());
    }

    #[test]
    fn test_load_prefers_override() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(OVERRIDE_FILENAME),
            r#"{"repositories":[{"url":"https://override.example","plugins":{"A":"o/a"}}]}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join(DEFAULT_FILENAME),
            r#"{"repositories":[{"url":"https://default.example","plugins":{"A":"d/a"}}]}"#,
        )
        .unwrap();

        let manifest = ProRepoManifest::load(Some(&NormalizedPath::new(temp.path())));
        assert_eq!(manifest.find("A", None).unwrap().package, "o/a");
    }

    #[test]
    fn test_load_falls_back_to_default_template() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(DEFAULT_FILENAME),
            r#"{"repositories":[{"url":"https://default.example","plugins":{"A":"d/a"}}]}"#,
        )
        .unwrap();

        let manifest = ProRepoManifest::load(Some(&NormalizedPath::new(temp.path())));
        assert_eq!(manifest.find("A", None).unwrap().package, "d/a");
    }

    #[test]
    fn test_load_without_files_uses_builtin() {
        let temp = TempDir::new().unwrap();
        let manifest = ProRepoManifest::load(Some(&NormalizedPath::new(temp.path())));
        assert!(manifest.find("Advanced Custom Fields Pro", None).is_some());
    }

    #[test]
    fn test_load_malformed_override_uses_builtin() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(OVERRIDE_FILENAME), "{ not json").unwrap();
        fs::write(
            temp.path().join(DEFAULT_FILENAME),
            r#"{"repositories":[{"url":"https://default.example","plugins":{"A":"d/a"}}]}"#,
        )
        .unwrap();

        let manifest = ProRepoManifest::load(Some(&NormalizedPath::new(temp.path())));
        assert!(manifest.find("A", None).is_none());
        assert!(manifest.find("Advanced Custom Fields Pro", None).is_some());
    }
}
