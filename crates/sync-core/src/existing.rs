//! Secondary matching against packages the manifest already declares
//!
//! A component no strategy could resolve may still be a package the project
//! already requires under a vendor the resolver cannot guess, such as
//! `searchwp/searchwp` for the `searchwp` plugin. The slug is compared with
//! the name half of every declared package; a single hit is offered to the
//! operator.

use crate::component::UnresolvedItem;
use crate::error::Result;
use crate::manifest::ComposerManifest;
use crate::operator::Operator;
use crate::resolver::CORE_PACKAGES;

/// A declared package proposed for an unresolved component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingMatch {
    pub item: UnresolvedItem,
    pub package: String,
    /// Constraint that will be written if the operator accepts
    pub constraint: String,
}

/// Declared packages whose name segment equals the item's slug, ignoring case.
///
/// Core packages are never candidates. Ids without exactly one `/` are
/// skipped.
pub fn find_candidates<'m>(item: &UnresolvedItem, manifest: &'m ComposerManifest) -> Vec<&'m str> {
    if item.slug.is_empty() {
        return Vec::new();
    }

    manifest
        .declared_packages()
        .into_iter()
        .filter(|package| !CORE_PACKAGES.contains(package))
        .filter(|package| {
            let mut parts = package.split('/');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(_vendor), Some(name), None) => name.eq_ignore_ascii_case(&item.slug),
                _ => false,
            }
        })
        .collect()
}

/// Offer the single candidate for `item`, if there is exactly one.
///
/// Returns the accepted package id and constraint, or `None` when there are
/// zero or several candidates or the operator declines.
pub fn match_existing(
    item: &UnresolvedItem,
    manifest: &ComposerManifest,
    operator: &mut dyn Operator,
) -> Result<Option<(String, String)>> {
    let candidates = find_candidates(item, manifest);
    let [package] = candidates.as_slice() else {
        tracing::debug!(
            slug = %item.slug,
            candidates = candidates.len(),
            "no unique existing package for unresolved component"
        );
        return Ok(None);
    };

    let candidate = ExistingMatch {
        item: item.clone(),
        package: package.to_string(),
        constraint: item.constraint(),
    };

    if operator.confirm_match(&candidate)? {
        tracing::info!(package = %candidate.package, slug = %item.slug, "matched existing package");
        Ok(Some((candidate.package, candidate.constraint)))
    } else {
        Ok(None)
    }
}
