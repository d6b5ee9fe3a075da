//! The sync pipeline
//!
//! One run goes through these phases in order:
//!
//! 1. Load composer.json. A missing or broken manifest stops the run before
//!    anything else happens.
//! 2. Resolve the core, active plugins, must-use plugins and the theme.
//! 3. Add the public index repository if the index resolved anything.
//! 4. Offer declared packages for components that are still unresolved.
//! 5. Merge, diff, confirm and write.

use sync_fs::NormalizedPath;

use crate::component::{ComponentDescriptor, UnresolvedItem};
use crate::config::{ComponentDirs, SyncConfig};
use crate::error::Result;
use crate::existing::match_existing;
use crate::host::HostInventory;
use crate::index::{HttpPackageIndex, OfflineIndex, PackageIndex};
use crate::manifest::{ComposerManifest, Section};
use crate::merge::{ChangeSet, PendingChanges, diff, merge};
use crate::operator::Operator;
use crate::pro_repo::ProRepoManifest;
use crate::resolver::{CorePackageStrategy, PackageResolver, ResolutionSession, public_index_repository};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to change
    UpToDate,
    /// Changes were confirmed and written
    Applied,
    /// The operator declined; the manifest was not touched
    Declined,
    /// Changes were computed but writing was disabled
    DryRun,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub changes: ChangeSet,
    /// Components nothing could be matched to, for the final report
    pub unresolved: Vec<UnresolvedItem>,
    pub manifest_path: NormalizedPath,
}

/// Resolves a host inventory against composer.json.
pub struct SyncEngine {
    manifest_path: NormalizedPath,
    dirs: ComponentDirs,
    pro_manifest: ProRepoManifest,
    index: Box<dyn PackageIndex>,
    repository_url: String,
}

impl SyncEngine {
    pub fn new(
        manifest_path: NormalizedPath,
        dirs: ComponentDirs,
        pro_manifest: ProRepoManifest,
        index: Box<dyn PackageIndex>,
        repository_url: impl Into<String>,
    ) -> Self {
        Self {
            manifest_path,
            dirs,
            pro_manifest,
            index,
            repository_url: repository_url.into(),
        }
    }

    /// Build an engine from configuration, with paths relative to `root`.
    pub fn from_config(config: &SyncConfig, root: &NormalizedPath) -> Result<Self> {
        let index: Box<dyn PackageIndex> = if config.index.enabled {
            Box::new(HttpPackageIndex::new(
                config.index.api_url.clone(),
                config.index.timeout(),
            )?)
        } else {
            tracing::info!("package index lookups disabled");
            Box::new(OfflineIndex)
        };
        let pro_dir = config.pro_repositories_dir(root);

        Ok(Self::new(
            config.manifest_path(root),
            config.component_dirs(root),
            ProRepoManifest::load(pro_dir.as_ref()),
            index,
            config.index.repository_url.clone(),
        ))
    }

    /// Replace the package index, e.g. with a test double.
    pub fn with_index(mut self, index: Box<dyn PackageIndex>) -> Self {
        self.index = index;
        self
    }

    pub fn manifest_path(&self) -> &NormalizedPath {
        &self.manifest_path
    }

    /// Run the whole pipeline. With `dry_run` the manifest is never written
    /// and the operator is not asked to confirm the change set.
    pub fn run(
        &self,
        host: &dyn HostInventory,
        operator: &mut dyn Operator,
        dry_run: bool,
    ) -> Result<SyncReport> {
        let original = ComposerManifest::load(&self.manifest_path)?;
        let inventory = host.inventory()?;

        let core_strategy = CorePackageStrategy::for_existing(
            original
                .section(Section::Require)
                .into_iter()
                .flat_map(|require| require.keys().map(String::as_str)),
        );
        let resolver = PackageResolver::standard(&self.pro_manifest, &self.dirs, self.index.as_ref(), core_strategy);
        let mut session = ResolutionSession::new();
        let mut pending = PendingChanges::new();
        let mut unresolved: Vec<UnresolvedItem> = Vec::new();

        operator.progress("Scanning WordPress core...");
        let core = inventory.core_component();
        resolve_all(&resolver, core, &mut session, &mut pending, &mut unresolved);

        operator.progress("Scanning active plugins...");
        let plugins = inventory.active_plugins();
        resolve_all(&resolver, plugins, &mut session, &mut pending, &mut unresolved);

        operator.progress("Scanning must-use plugins...");
        let mu = inventory.mu_plugins();
        unresolved.extend(mu.single_files);
        resolve_all(&resolver, mu.components, &mut session, &mut pending, &mut unresolved);

        operator.progress("Scanning active theme...");
        let theme = inventory.theme_component();
        resolve_all(&resolver, theme, &mut session, &mut pending, &mut unresolved);

        if session.public_index_used() {
            pending.add_repository(public_index_repository(&self.repository_url));
        }

        tracing::info!(
            resolved = pending.requires().count(),
            unresolved = unresolved.len(),
            "resolution finished"
        );

        let mut still_unresolved = Vec::with_capacity(unresolved.len());
        for item in unresolved {
            match match_existing(&item, &original, operator)? {
                Some((package, constraint)) => pending.add_confirmed(package, constraint),
                None => still_unresolved.push(item),
            }
        }

        let merged = merge(&original, &pending)?;
        let changes = diff(&original, &merged, &pending);

        let outcome = if changes.is_empty() {
            SyncOutcome::UpToDate
        } else if dry_run {
            SyncOutcome::DryRun
        } else if operator.confirm_changes(&changes)? {
            merged.save()?;
            SyncOutcome::Applied
        } else {
            tracing::info!("changes declined, manifest left untouched");
            SyncOutcome::Declined
        };

        Ok(SyncReport {
            outcome,
            changes,
            unresolved: still_unresolved,
            manifest_path: self.manifest_path.clone(),
        })
    }
}

fn resolve_all(
    resolver: &PackageResolver<'_>,
    components: impl IntoIterator<Item = ComponentDescriptor>,
    session: &mut ResolutionSession,
    pending: &mut PendingChanges,
    unresolved: &mut Vec<UnresolvedItem>,
) {
    for component in components {
        match resolver.resolve(&component, session) {
            Some(resolved) => pending.add_resolved(resolved),
            None => unresolved.push(UnresolvedItem::from(&component)),
        }
    }
}
