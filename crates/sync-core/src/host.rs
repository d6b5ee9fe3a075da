//! What is installed on the WordPress host
//!
//! The engine does not talk to WordPress directly. It asks a
//! [`HostInventory`] for a snapshot and turns that into component
//! descriptors. [`InventoryFile`] reads the snapshot from a JSON file, e.g.
//! one exported with `wp eval`.

use serde::{Deserialize, Serialize};
use sync_fs::{NormalizedPath, io};

use crate::component::{ComponentDescriptor, ComponentKind, UnresolvedItem};
use crate::error::{Error, Result};

/// Suffix appended to the name of a must-use plugin that is a lone file.
pub const SINGLE_FILE_SUFFIX: &str = " (single file)";

/// Source of the host's installed components.
pub trait HostInventory {
    fn inventory(&self) -> Result<Inventory>;
}

/// An installed plugin, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPlugin {
    /// Main file relative to the plugins directory, e.g. `akismet/akismet.php`
    pub file: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub active: bool,
}

/// An installed must-use plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledMuPlugin {
    pub file: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// The active theme, with its parent when it is a child theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledTheme {
    pub name: String,
    #[serde(default)]
    pub version: String,
    /// Theme directory name
    pub stylesheet: String,
    #[serde(default)]
    pub parent: Option<Box<InstalledTheme>>,
}

/// A snapshot of the host installation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub core_version: Option<String>,
    #[serde(default)]
    pub plugins: Vec<InstalledPlugin>,
    #[serde(default)]
    pub mu_plugins: Vec<InstalledMuPlugin>,
    #[serde(default)]
    pub theme: Option<InstalledTheme>,
}

/// Must-use plugins split by whether they can be resolved at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuPluginScan {
    pub components: Vec<ComponentDescriptor>,
    /// Single-file plugins, unresolved from the start
    pub single_files: Vec<UnresolvedItem>,
}

impl Inventory {
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// The core component, when the host reported a version.
    pub fn core_component(&self) -> Option<ComponentDescriptor> {
        self.core_version
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|version| ComponentDescriptor::new(ComponentKind::Core, "WordPress", version, ""))
    }

    /// Active plugins, slugged by their directory.
    pub fn active_plugins(&self) -> Vec<ComponentDescriptor> {
        self.plugins
            .iter()
            .filter(|plugin| plugin.active)
            .map(|plugin| {
                let (dir, stem) = split_plugin_file(&plugin.file);
                ComponentDescriptor::new(
                    ComponentKind::Plugin,
                    &plugin.name,
                    &plugin.version,
                    dir.unwrap_or(stem),
                )
            })
            .collect()
    }

    pub fn mu_plugins(&self) -> MuPluginScan {
        let mut scan = MuPluginScan::default();
        for plugin in &self.mu_plugins {
            match split_plugin_file(&plugin.file) {
                (Some(dir), _) => scan.components.push(ComponentDescriptor::new(
                    ComponentKind::MuPlugin,
                    &plugin.name,
                    &plugin.version,
                    dir,
                )),
                (None, stem) => scan.single_files.push(UnresolvedItem {
                    name: format!("{}{SINGLE_FILE_SUFFIX}", plugin.name),
                    version: plugin.version.clone(),
                    kind: ComponentKind::MuPlugin,
                    slug: stem.to_string(),
                    single_file: true,
                }),
            }
        }
        scan
    }

    /// The theme to resolve: the parent of a child theme, else the active one.
    pub fn theme_component(&self) -> Option<ComponentDescriptor> {
        let active = self.theme.as_ref()?;
        let theme = active.parent.as_deref().unwrap_or(active);
        Some(ComponentDescriptor::new(
            ComponentKind::Theme,
            &theme.name,
            &theme.version,
            &theme.stylesheet,
        ))
    }
}

impl HostInventory for Inventory {
    fn inventory(&self) -> Result<Inventory> {
        Ok(self.clone())
    }
}

/// Split `dir/file.php` into its directory and file stem.
///
/// The directory is everything before the last `/`, so a nested main file
/// such as `vendor/pkg/main.php` is slugged `vendor/pkg`.
fn split_plugin_file(file: &str) -> (Option<&str>, &str) {
    let file = file.trim_start_matches('/');
    let (dir, name) = match file.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, file),
    };
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    (dir, stem)
}

/// An inventory snapshot stored as JSON.
#[derive(Debug, Clone)]
pub struct InventoryFile {
    path: NormalizedPath,
}

impl InventoryFile {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }
}

impl HostInventory for InventoryFile {
    fn inventory(&self) -> Result<Inventory> {
        let content = io::read_text(&self.path).map_err(|e| Error::Inventory {
            path: self.path.to_native(),
            message: e.to_string(),
        })?;
        let inventory = Inventory::parse(&content).map_err(|e| Error::Inventory {
            path: self.path.to_native(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            path = %self.path,
            plugins = inventory.plugins.len(),
            mu_plugins = inventory.mu_plugins.len(),
            "loaded host inventory"
        );
        Ok(inventory)
    }
}
