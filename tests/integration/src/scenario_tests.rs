//! Cross-crate scenarios for a full sync run
//!
//! Each test builds a project on disk (config, manifest, inventory snapshot,
//! pro-repository file, component manifests), runs the engine the way the
//! CLI does, and inspects the written composer.json.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sync_core::{
    ComponentKind, InventoryFile, ScriptedOperator, StaticIndex, SyncConfig, SyncEngine,
    SyncOutcome, SyncReport,
};
use sync_fs::NormalizedPath;
use sync_test_utils::{InventoryBuilder, TestProject};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Run the engine over `project` the same way `composer-sync sync` does,
/// with the package index replaced by `index`.
fn run(project: &TestProject, index: StaticIndex, operator: &mut ScriptedOperator) -> SyncReport {
    let root = NormalizedPath::new(project.root());
    let config = SyncConfig::load(&root).unwrap();
    let host = InventoryFile::new(config.inventory_path(&root));
    SyncEngine::from_config(&config, &root)
        .unwrap()
        .with_index(Box::new(index))
        .run(&host, operator, false)
        .unwrap()
}

/// A site with a pro plugin, a locally packaged plugin, an index plugin, a
/// must-use plugin and a child theme.
fn agency_site() -> TestProject {
    let project = TestProject::new();
    project.write(
        "composer-sync.toml",
        "[pro_repositories]\ndir = \"config/pro\"\n",
    );
    project.write_pro_plugins(
        "config/pro",
        "pro-plugins.json",
        &json!({"repositories": [
            {"url": "https://connect.advancedcustomfields.com", "type": "composer",
             "plugins": {"Advanced Custom Fields PRO": "wpengine/advanced-custom-fields-pro"}},
            {"url": "https://composer.gravity.io", "type": "composer",
             "plugins": {"Gravity Forms": {"package": "gravity/gravityforms", "slug": "gravityforms"}}}
        ]}),
    );
    project.add_local_package("wp-content/plugins", "agency-tools", "agency/tools");
    project.write_manifest(&json!({
        "name": "agency/site",
        "type": "project",
        "repositories": [{"type": "composer", "url": "https://wpackagist.org", "only": ["wpackagist-plugin/*"]}],
        "require": {"php": ">=8.1", "composer/installers": "^2.2"},
        "require-dev": {"wpackagist-plugin/query-monitor": "^3.0"},
        "extra": {"installer-paths": {"web/app/plugins/{$name}/": ["type:wordpress-plugin"]}}
    }));
    project.write_inventory(
        &InventoryBuilder::new()
            .core("6.4.2")
            .plugin("advanced-custom-fields-pro/acf.php", "Advanced Custom Fields PRO", "6.2.4")
            .plugin("gravityforms/gravityforms.php", "Gravity Forms", "2.8.1")
            .plugin("agency-tools/agency-tools.php", "Agency Tools", "1.0.3")
            .plugin("akismet/akismet.php", "Akismet", "5.3")
            .plugin("query-monitor/query-monitor.php", "Query Monitor", "3.15.0")
            .inactive_plugin("hello-dolly/hello.php", "Hello Dolly", "1.7.2")
            .mu_plugin("object-cache.php", "Object Cache", "0.9")
            .theme("agency-child", "Agency Child", "1.0.0")
            .parent_theme("twentytwentyfour", "Twenty Twenty-Four", "1.1")
            .build(),
    );
    project
}

fn agency_index() -> StaticIndex {
    StaticIndex::new()
        .with(ComponentKind::Plugin, "akismet")
        .with(ComponentKind::Plugin, "query-monitor")
        .with(ComponentKind::Plugin, "hello-dolly")
        .with(ComponentKind::Theme, "twentytwentyfour")
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_full_site_sync() {
    let project = agency_site();
    let mut operator = ScriptedOperator::approving();

    let report = run(&project, agency_index(), &mut operator);

    assert_eq!(report.outcome, SyncOutcome::Applied);
    let manifest = project.manifest();
    assert_eq!(
        manifest["require"],
        json!({
            "php": ">=8.1",
            "composer/installers": "^2.2",
            "roots/wordpress": "^6.4",
            "wpengine/advanced-custom-fields-pro": "^6.2",
            "gravity/gravityforms": "^2.8",
            "agency/tools": "^1.0",
            "wpackagist-plugin/akismet": "^5.3",
            "wpackagist-theme/twentytwentyfour": "^1.1"
        })
    );
    assert_eq!(
        manifest["require-dev"],
        json!({"wpackagist-plugin/query-monitor": "^3.0"})
    );
    // The existing wpackagist entry keeps its extra keys
    assert_eq!(
        manifest["repositories"],
        json!([
            {"type": "composer", "url": "https://wpackagist.org", "only": ["wpackagist-plugin/*"]},
            {"type": "composer", "url": "https://connect.advancedcustomfields.com"},
            {"type": "composer", "url": "https://composer.gravity.io"}
        ])
    );
    assert_eq!(manifest["extra"], json!({"installer-paths": {"web/app/plugins/{$name}/": ["type:wordpress-plugin"]}}));

    let unresolved: Vec<&str> = report.unresolved.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(unresolved, vec!["Object Cache (single file)"]);
}

#[test]
fn test_require_order_is_stable() {
    let project = agency_site();
    run(&project, agency_index(), &mut ScriptedOperator::approving());

    let manifest = project.manifest();
    let keys: Vec<&String> = manifest["require"].as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec![
            "php",
            "composer/installers",
            "roots/wordpress",
            "wpengine/advanced-custom-fields-pro",
            "gravity/gravityforms",
            "agency/tools",
            "wpackagist-plugin/akismet",
            "wpackagist-theme/twentytwentyfour",
        ]
    );
}

#[test]
fn test_second_run_is_up_to_date() {
    let project = agency_site();
    run(&project, agency_index(), &mut ScriptedOperator::approving());
    let written = project.read("composer.json");

    let mut operator = ScriptedOperator::approving();
    let report = run(&project, agency_index(), &mut operator);

    assert_eq!(report.outcome, SyncOutcome::UpToDate);
    assert!(operator.shown_changes().is_none());
    assert_eq!(project.read("composer.json"), written);
}

#[test]
fn test_output_format() {
    let project = agency_site();
    run(&project, agency_index(), &mut ScriptedOperator::approving());

    let written = project.read("composer.json");
    assert!(written.ends_with("}\n"));
    assert!(written.starts_with("{\n    \"name\": \"agency/site\","));
    assert!(written.contains("\"url\": \"https://wpackagist.org\""));
    assert!(!written.contains("\\/"));
}

#[test]
fn test_declined_run_leaves_bytes_identical() {
    let project = agency_site();
    let before = project.read("composer.json");
    let mut operator = ScriptedOperator::new();

    let report = run(&project, agency_index(), &mut operator);

    assert_eq!(report.outcome, SyncOutcome::Declined);
    assert!(!report.changes.is_empty());
    assert_eq!(project.read("composer.json"), before);
}

#[test]
fn test_bumped_versions_only_rewrite_unsatisfied_entries() {
    let project = agency_site();
    run(&project, agency_index(), &mut ScriptedOperator::approving());

    // Minor bump inside the caret range, and a major bump outside it
    let mut inventory: Value = serde_json::from_str(&project.read("wp-inventory.json")).unwrap();
    inventory["core_version"] = json!("6.5.0");
    inventory["plugins"][3]["version"] = json!("6.0");
    project.write_inventory(&inventory);

    let report = run(&project, agency_index(), &mut ScriptedOperator::approving());

    let lines: Vec<String> = report.changes.requires.iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["MODIFY: wpackagist-plugin/akismet: ^5.3 -> ^6.0"]);
    let manifest = project.manifest();
    assert_eq!(manifest["require"]["roots/wordpress"], "^6.4");
    assert_eq!(manifest["require"]["wpackagist-plugin/akismet"], "^6.0");
}

#[test]
fn test_confirmed_match_for_vendor_package() {
    let project = TestProject::new();
    project.write_manifest(&json!({
        "require": {"searchwp/searchwp": "^4.0", "roots/wordpress": "^6.0"}
    }));
    project.write_inventory(
        &InventoryBuilder::new()
            .core("6.4.2")
            .plugin("searchwp/index.php", "SearchWP", "4.3.1")
            .build(),
    );
    project.write("composer-sync.toml", "[pro_repositories]\ndir = \"none\"\n");
    let mut operator = ScriptedOperator::approving().answer_match(true);

    let report = run(&project, StaticIndex::new(), &mut operator);

    assert!(report.unresolved.is_empty());
    assert_eq!(project.manifest()["require"]["searchwp/searchwp"], "^4.3");
    assert_eq!(project.manifest()["require"]["roots/wordpress"], "^6.0");
}
