//! Discovered components and what they resolve to

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::constraint_for;

/// Vendor prefix for plugins published on the public index mirror.
pub const INDEX_PLUGIN_VENDOR: &str = "wpackagist-plugin";

/// Vendor prefix for themes published on the public index mirror.
pub const INDEX_THEME_VENDOR: &str = "wpackagist-theme";

/// What part of the installation a component came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// The WordPress core itself
    Core,
    /// A regular, conditionally active plugin
    Plugin,
    /// An always-loaded (must-use) plugin
    MuPlugin,
    /// The active theme, or its parent
    Theme,
}

impl ComponentKind {
    /// Stable lowercase name, as shown in reports and index URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Plugin => "plugin",
            Self::MuPlugin => "mu-plugin",
            Self::Theme => "theme",
        }
    }

    /// Must-use plugins are pinned to `major.minor` without a caret.
    pub fn is_exact_pinned(&self) -> bool {
        matches!(self, Self::MuPlugin)
    }

    /// Vendor prefix used for packages synthesized from the public index.
    ///
    /// Only plugins and themes are published there.
    pub fn index_vendor(&self) -> Option<&'static str> {
        match self {
            Self::Plugin => Some(INDEX_PLUGIN_VENDOR),
            Self::Theme => Some(INDEX_THEME_VENDOR),
            Self::Core | Self::MuPlugin => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered runtime component, consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    pub kind: ComponentKind,
    /// Display name from the plugin or theme header
    pub name: String,
    /// Installed version, dotted numeric in the normal case
    pub version: String,
    /// Directory-derived identifier
    pub slug: String,
    /// A must-use plugin living directly in the mu-plugins directory
    pub single_file: bool,
}

impl ComponentDescriptor {
    pub fn new(
        kind: ComponentKind,
        name: impl Into<String>,
        version: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            version: version.into(),
            slug: slug.into(),
            single_file: false,
        }
    }

    /// The constraint this component's installed version maps to.
    pub fn constraint(&self) -> String {
        constraint_for(&self.version, self.kind.is_exact_pinned())
    }
}

fn default_repository_type() -> String {
    "composer".to_string()
}

/// A `repositories` entry in composer.json. The url is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    #[serde(rename = "type", default = "default_repository_type")]
    pub kind: String,
    pub url: String,
}

impl RepositoryDescriptor {
    /// A repository of the default `composer` type.
    pub fn composer(url: impl Into<String>) -> Self {
        Self {
            kind: default_repository_type(),
            url: url.into(),
        }
    }
}

/// A successful resolution.
///
/// `repository` is `None` when the package needs no extra repository entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub package: String,
    pub constraint: String,
    pub repository: Option<RepositoryDescriptor>,
}

/// A component no strategy could map to a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedItem {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub slug: String,
    #[serde(skip)]
    pub single_file: bool,
}

impl UnresolvedItem {
    /// Constraint for this item, computed the same way as for resolved ones.
    pub fn constraint(&self) -> String {
        constraint_for(&self.version, self.kind.is_exact_pinned())
    }
}

impl From<&ComponentDescriptor> for UnresolvedItem {
    fn from(component: &ComponentDescriptor) -> Self {
        Self {
            name: component.name.clone(),
            version: component.version.clone(),
            kind: component.kind,
            slug: component.slug.clone(),
            single_file: component.single_file,
        }
    }
}
