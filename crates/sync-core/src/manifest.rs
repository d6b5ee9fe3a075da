//! The project's composer.json
//!
//! The manifest is kept as a raw JSON object so that every field this tool
//! does not manage (`name`, `autoload`, `extra`, `config`, ...) is written back
//! unchanged. Only `require` and `repositories` are ever replaced.

use serde::Serialize;
use serde_json::{Map, Value};
use sync_fs::{NormalizedPath, io};

use crate::component::RepositoryDescriptor;
use crate::error::{Error, Result};

/// A dependency section of composer.json.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Require,
    RequireDev,
}

impl Section {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::RequireDev => "require-dev",
        }
    }
}

/// An in-memory composer.json.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerManifest {
    path: NormalizedPath,
    data: Map<String, Value>,
}

impl ComposerManifest {
    /// Load and parse the manifest at `path`.
    ///
    /// Fails with [`Error::ManifestNotFound`] or [`Error::ManifestParse`]; both
    /// are fatal for a sync run.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_optional(path)?.ok_or_else(|| Error::ManifestNotFound {
            path: path.to_native(),
        })?;
        Self::parse(path.clone(), &content)
    }

    /// Parse manifest content that claims to come from `path`.
    pub fn parse(path: NormalizedPath, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|e| Error::ManifestParse {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(data) => Ok(Self { path, data }),
            _ => Err(Error::ManifestShape {
                path: path.to_native(),
            }),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// The raw JSON object.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }

    /// The entries of a dependency section, in file order.
    ///
    /// Missing or non-object sections read as empty.
    pub fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        self.data.get(section.key()).and_then(Value::as_object)
    }

    /// Whether `package` is declared in `section`.
    pub fn declares(&self, section: Section, package: &str) -> bool {
        self.section(section).is_some_and(|map| map.contains_key(package))
    }

    /// The declared constraint for `package`, when it is a string.
    pub fn constraint(&self, section: Section, package: &str) -> Option<&str> {
        self.section(section)?.get(package).and_then(Value::as_str)
    }

    /// Package ids declared in `require` then `require-dev`, without repeats.
    pub fn declared_packages(&self) -> Vec<&str> {
        let mut packages: Vec<&str> = Vec::new();
        for section in [Section::Require, Section::RequireDev] {
            for package in self.section(section).into_iter().flat_map(|m| m.keys()) {
                if !packages.contains(&package.as_str()) {
                    packages.push(package);
                }
            }
        }
        packages
    }

    /// The raw `repositories` entries, in file order.
    ///
    /// Composer accepts both a list and an object keyed by repository name;
    /// for the object form the values are returned.
    pub fn repositories(&self) -> Vec<&Value> {
        match self.data.get("repositories") {
            Some(Value::Array(entries)) => entries.iter().collect(),
            Some(Value::Object(entries)) => entries.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Urls of the existing repositories. Entries without a url are skipped.
    pub fn repository_urls(&self) -> Vec<&str> {
        self.repositories()
            .into_iter()
            .filter_map(|repo| repo.get("url").and_then(Value::as_str))
            .collect()
    }

    /// Replace a dependency section. Keeps the key's position if it exists.
    pub fn set_section(&mut self, section: Section, entries: Map<String, Value>) {
        self.data.insert(section.key().to_string(), Value::Object(entries));
    }

    /// Add repositories after the existing entries.
    ///
    /// A list gets them appended. An object keyed by name gets them keyed by
    /// url, and an existing key is never replaced.
    pub fn append_repositories(&mut self, repositories: &[RepositoryDescriptor]) -> Result<()> {
        if repositories.is_empty() {
            return Ok(());
        }
        match self.data.get_mut("repositories") {
            Some(Value::Object(entries)) => {
                for repo in repositories {
                    if !entries.contains_key(&repo.url) {
                        entries.insert(repo.url.clone(), serde_json::to_value(repo)?);
                    }
                }
            }
            Some(Value::Array(entries)) => {
                for repo in repositories {
                    entries.push(serde_json::to_value(repo)?);
                }
            }
            _ => {
                let entries = repositories
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<serde_json::Result<Vec<_>>>()?;
                self.data.insert("repositories".to_string(), Value::Array(entries));
            }
        }
        Ok(())
    }

    /// Pretty-printed JSON with four-space indentation and a trailing newline.
    ///
    /// Forward slashes are never escaped.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.data.serialize(&mut serializer)?;
        buf.push(b'\n');
        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the manifest back to its path atomically.
    pub fn save(&self) -> Result<()> {
        io::write_text(&self.path, &self.to_pretty_string()?)?;
        tracing::info!(path = %self.path, "wrote composer manifest");
        Ok(())
    }
}
