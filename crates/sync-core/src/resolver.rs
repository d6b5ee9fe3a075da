//! Package resolution strategy chain
//!
//! Each discovered component is offered to an ordered list of strategies and
//! the first one that answers wins. The standard order is fixed:
//!
//! 1. [`ProRepoStrategy`]: known private repositories
//! 2. [`LocalManifestStrategy`]: a `composer.json` shipped inside the component
//! 3. [`PackageIndexStrategy`]: the public plugin/theme index
//! 4. [`CorePackageStrategy`]: the WordPress core package
//!
//! The pro-repository map comes first so that a commercial package is never
//! silently swapped for a public mirror of the same slug.

use serde_json::Value;
use sync_fs::io;

use crate::component::{ComponentDescriptor, ComponentKind, RepositoryDescriptor, ResolvedPackage};
use crate::config::ComponentDirs;
use crate::index::PackageIndex;
use crate::pro_repo::ProRepoManifest;

/// Packages that provide WordPress core, in order of preference.
pub const CORE_PACKAGES: &[&str] = &["roots/wordpress", "johnpbloch/wordpress"];

/// File name of a component's own manifest.
pub const LOCAL_MANIFEST_FILENAME: &str = "composer.json";

/// State shared across one run of the resolver.
#[derive(Debug, Default)]
pub struct ResolutionSession {
    public_index_used: bool,
}

impl ResolutionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that at least one package came from the public index.
    pub fn mark_public_index_used(&mut self) {
        self.public_index_used = true;
    }

    /// Whether the public index repository must be added to composer.json.
    pub fn public_index_used(&self) -> bool {
        self.public_index_used
    }
}

/// One way of mapping a component to a package.
pub trait ResolveStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Try to resolve `component`. `constraint` is already computed for it.
    fn resolve(
        &self,
        component: &ComponentDescriptor,
        constraint: &str,
        session: &mut ResolutionSession,
    ) -> Option<ResolvedPackage>;
}

/// Matches against the pro-repository manifest.
pub struct ProRepoStrategy<'a> {
    manifest: &'a ProRepoManifest,
}

impl<'a> ProRepoStrategy<'a> {
    pub fn new(manifest: &'a ProRepoManifest) -> Self {
        Self { manifest }
    }
}

impl ResolveStrategy for ProRepoStrategy<'_> {
    fn name(&self) -> &'static str {
        "pro-repository"
    }

    fn resolve(
        &self,
        component: &ComponentDescriptor,
        constraint: &str,
        _session: &mut ResolutionSession,
    ) -> Option<ResolvedPackage> {
        // The core package is chosen from the manifest, never from the pro map
        if component.kind == ComponentKind::Core {
            return None;
        }
        let found = self
            .manifest
            .find(&component.name, Some(component.slug.as_str()))?;
        Some(ResolvedPackage {
            package: found.package,
            constraint: constraint.to_string(),
            repository: Some(found.repository),
        })
    }
}

/// Reads `{base}/{slug}/composer.json` and uses its `name`.
pub struct LocalManifestStrategy<'a> {
    dirs: &'a ComponentDirs,
}

impl<'a> LocalManifestStrategy<'a> {
    pub fn new(dirs: &'a ComponentDirs) -> Self {
        Self { dirs }
    }
}

impl ResolveStrategy for LocalManifestStrategy<'_> {
    fn name(&self) -> &'static str {
        "local-manifest"
    }

    fn resolve(
        &self,
        component: &ComponentDescriptor,
        constraint: &str,
        _session: &mut ResolutionSession,
    ) -> Option<ResolvedPackage> {
        if component.slug.is_empty() {
            return None;
        }
        let base = self.dirs.base_for(component.kind)?;
        let path = base.join(&component.slug).join(LOCAL_MANIFEST_FILENAME);

        let content = match io::read_optional(&path) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "unreadable component manifest");
                return None;
            }
        };

        let name = serde_json::from_str::<Value>(&content)
            .ok()?
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())?
            .to_string();

        Some(ResolvedPackage {
            package: name,
            constraint: constraint.to_string(),
            repository: None,
        })
    }
}

/// Asks the public index whether the slug is published.
pub struct PackageIndexStrategy<'a> {
    index: &'a dyn PackageIndex,
}

impl<'a> PackageIndexStrategy<'a> {
    pub fn new(index: &'a dyn PackageIndex) -> Self {
        Self { index }
    }
}

impl ResolveStrategy for PackageIndexStrategy<'_> {
    fn name(&self) -> &'static str {
        "package-index"
    }

    fn resolve(
        &self,
        component: &ComponentDescriptor,
        constraint: &str,
        session: &mut ResolutionSession,
    ) -> Option<ResolvedPackage> {
        let vendor = component.kind.index_vendor()?;
        if component.slug.is_empty() || !self.index.exists(component.kind, &component.slug) {
            return None;
        }

        session.mark_public_index_used();
        Some(ResolvedPackage {
            package: format!("{vendor}/{}", component.slug),
            constraint: constraint.to_string(),
            repository: None,
        })
    }
}

/// Maps the core component to the configured core package.
pub struct CorePackageStrategy {
    package: String,
}

impl CorePackageStrategy {
    /// Prefer a core package already required by the project, else the
    /// first of [`CORE_PACKAGES`].
    pub fn for_existing<'b>(required: impl IntoIterator<Item = &'b str>) -> Self {
        let required: Vec<&str> = required.into_iter().collect();
        let package = CORE_PACKAGES
            .iter()
            .find(|candidate| required.contains(candidate))
            .unwrap_or(&CORE_PACKAGES[0]);
        Self {
            package: (*package).to_string(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }
}

impl ResolveStrategy for CorePackageStrategy {
    fn name(&self) -> &'static str {
        "core-package"
    }

    fn resolve(
        &self,
        component: &ComponentDescriptor,
        constraint: &str,
        _session: &mut ResolutionSession,
    ) -> Option<ResolvedPackage> {
        (component.kind == ComponentKind::Core).then(|| ResolvedPackage {
            package: self.package.clone(),
            constraint: constraint.to_string(),
            repository: None,
        })
    }
}

/// Ordered strategy chain.
pub struct PackageResolver<'a> {
    strategies: Vec<Box<dyn ResolveStrategy + 'a>>,
}

impl<'a> PackageResolver<'a> {
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy + 'a>>) -> Self {
        Self { strategies }
    }

    /// The standard chain in its fixed priority order.
    pub fn standard(
        pro_manifest: &'a ProRepoManifest,
        dirs: &'a ComponentDirs,
        index: &'a dyn PackageIndex,
        core: CorePackageStrategy,
    ) -> Self {
        Self::new(vec![
            Box::new(ProRepoStrategy::new(pro_manifest)),
            Box::new(LocalManifestStrategy::new(dirs)),
            Box::new(PackageIndexStrategy::new(index)),
            Box::new(core),
        ])
    }

    /// Names of the strategies, in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve one component. `None` means every strategy declined.
    pub fn resolve(
        &self,
        component: &ComponentDescriptor,
        session: &mut ResolutionSession,
    ) -> Option<ResolvedPackage> {
        let constraint = component.constraint();

        for strategy in &self.strategies {
            if let Some(resolved) = strategy.resolve(component, &constraint, session) {
                tracing::debug!(
                    component = %component.name,
                    strategy = strategy.name(),
                    package = %resolved.package,
                    "resolved component"
                );
                return Some(resolved);
            }
        }

        tracing::debug!(component = %component.name, slug = %component.slug, "no strategy resolved component");
        None
    }
}

/// Repository entry for the public index mirror.
pub fn public_index_repository(url: &str) -> RepositoryDescriptor {
    RepositoryDescriptor::composer(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::StaticIndex;
    use pretty_assertions::assert_eq;
    use std::fs;
    use sync_fs::NormalizedPath;
    use tempfile::TempDir;

    fn dirs_in(temp: &TempDir) -> ComponentDirs {
        let root = NormalizedPath::new(temp.path());
        ComponentDirs {
            plugins: root.join("plugins"),
            mu_plugins: root.join("mu-plugins"),
            themes: root.join("themes"),
        }
    }

    fn write_local_manifest(temp: &TempDir, sub: &str, content: &str) {
        let dir = temp.path().join(sub);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(LOCAL_MANIFEST_FILENAME), content).unwrap();
    }

    fn default_core() -> CorePackageStrategy {
        CorePackageStrategy::for_existing([])
    }

    fn plugin(name: &str, version: &str, slug: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(ComponentKind::Plugin, name, version, slug)
    }

    #[test]
    fn test_pro_repo_wins_over_local_and_index() {
        let temp = TempDir::new().unwrap();
        write_local_manifest(&temp, "plugins/acf-pro", r#"{"name": "local/acf"}"#);
        let pro = ProRepoManifest::builtin();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new().with(ComponentKind::Plugin, "acf-pro");
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());
        let mut session = ResolutionSession::new();

        let resolved = resolver
            .resolve(&plugin("Advanced Custom Fields Pro", "6.2.4", "acf-pro"), &mut session)
            .unwrap();

        assert_eq!(resolved.package, "advanced-custom-fields/advanced-custom-fields-pro");
        assert_eq!(resolved.constraint, "^6.2");
        assert_eq!(
            resolved.repository,
            Some(RepositoryDescriptor::composer("https://connect.advancedcustomfields.com"))
        );
        assert!(!session.public_index_used());
    }

    #[test]
    fn test_local_manifest_wins_over_index() {
        let temp = TempDir::new().unwrap();
        write_local_manifest(&temp, "plugins/forms", r#"{"name": "acme/forms"}"#);
        let pro = ProRepoManifest::default();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new().with(ComponentKind::Plugin, "forms");
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());
        let mut session = ResolutionSession::new();

        let resolved = resolver.resolve(&plugin("Forms", "2.3.1", "forms"), &mut session).unwrap();

        assert_eq!(resolved.package, "acme/forms");
        assert_eq!(resolved.repository, None);
        assert!(!session.public_index_used());
    }

    #[test]
    fn test_local_manifest_without_name_falls_through() {
        let temp = TempDir::new().unwrap();
        write_local_manifest(&temp, "plugins/akismet", r#"{"name": ""}"#);
        let dirs = dirs_in(&temp);
        let strategy = LocalManifestStrategy::new(&dirs);

        let resolved = strategy.resolve(&plugin("Akismet", "5.0", "akismet"), "^5.0", &mut ResolutionSession::new());
        assert_eq!(resolved, None);
    }

    #[test]
    fn test_local_manifest_invalid_json_falls_through() {
        let temp = TempDir::new().unwrap();
        write_local_manifest(&temp, "themes/astra", "{ nope");
        let dirs = dirs_in(&temp);
        let strategy = LocalManifestStrategy::new(&dirs);
        let theme = ComponentDescriptor::new(ComponentKind::Theme, "Astra", "4.1", "astra");

        assert_eq!(strategy.resolve(&theme, "^4.1", &mut ResolutionSession::new()), None);
    }

    #[test]
    fn test_mu_plugin_local_manifest_is_exact() {
        let temp = TempDir::new().unwrap();
        write_local_manifest(&temp, "mu-plugins/loader", r#"{"name": "acme/loader"}"#);
        let pro = ProRepoManifest::default();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new();
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());
        let component = ComponentDescriptor::new(ComponentKind::MuPlugin, "Loader", "1.4.2", "loader");

        let resolved = resolver.resolve(&component, &mut ResolutionSession::new()).unwrap();
        assert_eq!(resolved.constraint, "1.4");
    }

    #[test]
    fn test_index_synthesizes_package_and_marks_session() {
        let temp = TempDir::new().unwrap();
        let pro = ProRepoManifest::default();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new().with(ComponentKind::Theme, "twentytwentyfour");
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());
        let mut session = ResolutionSession::new();
        let theme = ComponentDescriptor::new(ComponentKind::Theme, "Twenty Twenty-Four", "1.2", "twentytwentyfour");

        let resolved = resolver.resolve(&theme, &mut session).unwrap();

        assert_eq!(resolved.package, "wpackagist-theme/twentytwentyfour");
        assert_eq!(resolved.constraint, "^1.2");
        assert!(session.public_index_used());
    }

    #[test]
    fn test_mu_plugins_never_use_index() {
        let index = StaticIndex::new().with(ComponentKind::MuPlugin, "loader");
        let strategy = PackageIndexStrategy::new(&index);
        let mut session = ResolutionSession::new();
        let component = ComponentDescriptor::new(ComponentKind::MuPlugin, "Loader", "1.0", "loader");

        assert_eq!(strategy.resolve(&component, "1.0", &mut session), None);
        assert!(!session.public_index_used());
    }

    #[test]
    fn test_core_is_never_taken_from_pro_repositories() {
        let temp = TempDir::new().unwrap();
        let pro = ProRepoManifest::parse(
            r#"{"repositories":[{"url":"https://pro.example","plugins":{"WordPress":"acme/wordpress-fork"}}]}"#,
        )
        .unwrap();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new();
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());
        let core = ComponentDescriptor::new(ComponentKind::Core, "WordPress", "6.4.2", "");

        let resolved = resolver.resolve(&core, &mut ResolutionSession::new()).unwrap();

        assert_eq!(resolved.package, "roots/wordpress");
        assert_eq!(resolved.repository, None);
    }

    #[test]
    fn test_unresolvable_plugin() {
        let temp = TempDir::new().unwrap();
        let pro = ProRepoManifest::default();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new();
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());

        assert_eq!(
            resolver.resolve(&plugin("SearchWP", "4.3.1", "searchwp"), &mut ResolutionSession::new()),
            None
        );
    }

    #[test]
    fn test_core_prefers_existing_package() {
        let core = CorePackageStrategy::for_existing(["acme/site", "johnpbloch/wordpress"]);
        assert_eq!(core.package(), "johnpbloch/wordpress");

        let core = CorePackageStrategy::for_existing([]);
        assert_eq!(core.package(), "roots/wordpress");
    }

    #[test]
    fn test_core_resolution() {
        let temp = TempDir::new().unwrap();
        let pro = ProRepoManifest::default();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new();
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());
        let core = ComponentDescriptor::new(ComponentKind::Core, "WordPress", "6.0.0", "wordpress");

        let resolved = resolver.resolve(&core, &mut ResolutionSession::new()).unwrap();
        assert_eq!(resolved.package, "roots/wordpress");
        assert_eq!(resolved.constraint, "^6.0");
    }

    #[test]
    fn test_strategy_order() {
        let temp = TempDir::new().unwrap();
        let pro = ProRepoManifest::default();
        let dirs = dirs_in(&temp);
        let index = StaticIndex::new();
        let resolver = PackageResolver::standard(&pro, &dirs, &index, default_core());

        assert_eq!(
            resolver.strategy_names(),
            vec!["pro-repository", "local-manifest", "package-index", "core-package"]
        );
    }
}
