//! [`TestProject`] fixture for composer-sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// Default inventory snapshot file name inside a test project.
pub const INVENTORY_FILE: &str = "wp-inventory.json";

/// A temporary project directory laid out like a Bedrock-style WordPress
/// site, with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use serde_json::json;
/// use sync_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_manifest(&json!({"require": {}}));
/// project.add_local_package("wp-content/plugins", "acme-forms", "acme/forms");
/// project.assert_file_exists("wp-content/plugins/acme-forms/composer.json");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the project.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Read `relative` as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", path.display()))
    }

    /// Write `composer.json` from a JSON value.
    pub fn write_manifest(&self, manifest: &Value) -> PathBuf {
        self.write("composer.json", &serde_json::to_string_pretty(manifest).unwrap())
    }

    /// Parse `composer.json` back into a JSON value.
    pub fn manifest(&self) -> Value {
        serde_json::from_str(&self.read("composer.json")).unwrap()
    }

    /// Write the host inventory snapshot.
    pub fn write_inventory(&self, inventory: &Value) -> PathBuf {
        self.write(INVENTORY_FILE, &serde_json::to_string_pretty(inventory).unwrap())
    }

    /// Give a component its own `composer.json` declaring `package`.
    pub fn add_local_package(&self, base_dir: &str, slug: &str, package: &str) -> PathBuf {
        let manifest = serde_json::json!({"name": package, "type": "wordpress-plugin"});
        self.write(
            &format!("{base_dir}/{slug}/composer.json"),
            &serde_json::to_string_pretty(&manifest).unwrap(),
        )
    }

    /// Write a pro-repository manifest named `file_name` into `dir`.
    pub fn write_pro_plugins(&self, dir: &str, file_name: &str, manifest: &Value) -> PathBuf {
        self.write(
            &format!("{dir}/{file_name}"),
            &serde_json::to_string_pretty(manifest).unwrap(),
        )
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read(relative);
        assert!(
            file_content.contains(content),
            "File {relative} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }
}
