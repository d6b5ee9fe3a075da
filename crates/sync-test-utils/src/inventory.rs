//! Builder for host inventory snapshots.

use serde_json::{Value, json};

/// Builds the JSON snapshot read by the `InventoryFile` host.
///
/// # Example
///
/// ```rust
/// use sync_test_utils::InventoryBuilder;
///
/// let inventory = InventoryBuilder::new()
///     .core("6.4.2")
///     .plugin("akismet/akismet.php", "Akismet", "5.0")
///     .build();
/// assert_eq!(inventory["plugins"][0]["active"], true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InventoryBuilder {
    core_version: Option<String>,
    plugins: Vec<Value>,
    mu_plugins: Vec<Value>,
    theme: Option<Value>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn core(mut self, version: &str) -> Self {
        self.core_version = Some(version.to_string());
        self
    }

    /// Add an active plugin.
    pub fn plugin(self, file: &str, name: &str, version: &str) -> Self {
        self.plugin_with_state(file, name, version, true)
    }

    pub fn inactive_plugin(self, file: &str, name: &str, version: &str) -> Self {
        self.plugin_with_state(file, name, version, false)
    }

    fn plugin_with_state(mut self, file: &str, name: &str, version: &str, active: bool) -> Self {
        self.plugins.push(json!({
            "file": file,
            "name": name,
            "version": version,
            "active": active,
        }));
        self
    }

    pub fn mu_plugin(mut self, file: &str, name: &str, version: &str) -> Self {
        self.mu_plugins.push(json!({"file": file, "name": name, "version": version}));
        self
    }

    pub fn theme(mut self, stylesheet: &str, name: &str, version: &str) -> Self {
        self.theme = Some(json!({"name": name, "version": version, "stylesheet": stylesheet}));
        self
    }

    /// Give the current theme a parent. Call after [`theme`](Self::theme).
    ///
    /// # Panics
    /// Panics if no theme was set.
    pub fn parent_theme(mut self, stylesheet: &str, name: &str, version: &str) -> Self {
        let theme = self
            .theme
            .as_mut()
            .expect("InventoryBuilder::parent_theme: call theme() first");
        theme["parent"] = json!({"name": name, "version": version, "stylesheet": stylesheet});
        self
    }

    pub fn build(self) -> Value {
        let mut inventory = json!({
            "plugins": self.plugins,
            "mu_plugins": self.mu_plugins,
        });
        if let Some(version) = self.core_version {
            inventory["core_version"] = Value::String(version);
        }
        if let Some(theme) = self.theme {
            inventory["theme"] = theme;
        }
        inventory
    }
}
