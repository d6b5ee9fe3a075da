//! `composer-sync.toml` configuration
//!
//! Every field is optional; a project without the file gets the layout of a
//! stock WordPress install with `composer.json` at its root:
//!
//! ```toml
//! manifest = "composer.json"
//!
//! [wordpress]
//! plugin_dir = "wp-content/plugins"
//! mu_plugin_dir = "wp-content/mu-plugins"
//! theme_dir = "wp-content/themes"
//! inventory = "wp-inventory.json"
//!
//! [pro_repositories]
//! dir = "/etc/composer-sync"
//!
//! [index]
//! enabled = true
//! api_url = "https://api.wordpress.org/{kind}s/info/1.0/{slug}.json"
//! repository_url = "https://wpackagist.org"
//! timeout_secs = 10
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sync_fs::{NormalizedPath, io};

use crate::component::ComponentKind;
use crate::error::{Error, Result};
use crate::index::{DEFAULT_API_URL, DEFAULT_REPOSITORY_URL};

/// Config file looked up in the project root.
pub const CONFIG_FILENAME: &str = "composer-sync.toml";

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "composer-sync";

fn default_manifest() -> String {
    "composer.json".to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Composer manifest, relative to the project root
    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default)]
    pub wordpress: WordPressSection,

    #[serde(default)]
    pub pro_repositories: ProRepositoriesSection,

    #[serde(default)]
    pub index: IndexSection,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            wordpress: WordPressSection::default(),
            pro_repositories: ProRepositoriesSection::default(),
            index: IndexSection::default(),
        }
    }
}

/// Where the WordPress installation keeps its components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressSection {
    pub plugin_dir: String,
    pub mu_plugin_dir: String,
    pub theme_dir: String,
    /// Host inventory snapshot (JSON)
    pub inventory: String,
}

impl Default for WordPressSection {
    fn default() -> Self {
        Self {
            plugin_dir: "wp-content/plugins".to_string(),
            mu_plugin_dir: "wp-content/mu-plugins".to_string(),
            theme_dir: "wp-content/themes".to_string(),
            inventory: "wp-inventory.json".to_string(),
        }
    }
}

/// Location of `pro-plugins.json` / `pro-plugins.default.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProRepositoriesSection {
    /// Defaults to `<config dir>/composer-sync` when unset
    #[serde(default)]
    pub dir: Option<String>,
}

/// Public package index settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSection {
    pub enabled: bool,
    pub api_url: String,
    pub repository_url: String,
    pub timeout_secs: u64,
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: DEFAULT_API_URL.to_string(),
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl IndexSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SyncConfig {
    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load `composer-sync.toml` from `root`, or defaults if it is absent.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = root.join(CONFIG_FILENAME);
        match io::read_optional(&path)? {
            Some(content) => {
                let config = Self::parse(&content).map_err(|e| Error::ConfigParse {
                    path: path.to_native(),
                    message: e.to_string(),
                })?;
                tracing::debug!(path = %path, "loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn manifest_path(&self, root: &NormalizedPath) -> NormalizedPath {
        NormalizedPath::new(&self.manifest).resolve_against(root)
    }

    pub fn inventory_path(&self, root: &NormalizedPath) -> NormalizedPath {
        NormalizedPath::new(&self.wordpress.inventory).resolve_against(root)
    }

    pub fn component_dirs(&self, root: &NormalizedPath) -> ComponentDirs {
        let resolve = |dir: &str| NormalizedPath::new(dir).resolve_against(root);
        ComponentDirs {
            plugins: resolve(&self.wordpress.plugin_dir),
            mu_plugins: resolve(&self.wordpress.mu_plugin_dir),
            themes: resolve(&self.wordpress.theme_dir),
        }
    }

    /// Directory searched for the pro-repository manifest.
    ///
    /// `None` when nothing is configured and the platform has no config dir.
    pub fn pro_repositories_dir(&self, root: &NormalizedPath) -> Option<NormalizedPath> {
        match &self.pro_repositories.dir {
            Some(dir) => Some(NormalizedPath::new(dir).resolve_against(root)),
            None => dirs::config_dir()
                .map(|dir: PathBuf| NormalizedPath::new(dir.join(APP_DIR_NAME))),
        }
    }
}

/// Base directories for local component manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDirs {
    pub plugins: NormalizedPath,
    pub mu_plugins: NormalizedPath,
    pub themes: NormalizedPath,
}

impl ComponentDirs {
    /// Base directory for `kind`. The core has none.
    pub fn base_for(&self, kind: ComponentKind) -> Option<&NormalizedPath> {
        match kind {
            ComponentKind::Plugin => Some(&self.plugins),
            ComponentKind::MuPlugin => Some(&self.mu_plugins),
            ComponentKind::Theme => Some(&self.themes),
            ComponentKind::Core => None,
        }
    }
}
