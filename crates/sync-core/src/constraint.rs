//! Constraint satisfaction heuristic
//!
//! Decides whether a constraint already declared in `composer.json` covers a
//! newly observed version, so that routine minor and patch upgrades do not
//! rewrite the manifest.
//!
//! This is deliberately not a range solver. Each declared constraint is
//! classified by its leading syntax and checked with one rule:
//!
//! | Form | Covered when |
//! |---|---|
//! | `^X.Y` | `X` is the target major, or `X.Y` is at or above the target `major.minor` |
//! | `~X.Y[.Z]` | majors equal and `Y` is at or above the target minor |
//! | `>=X.Y` | `X.Y` is at or below the target, or `X` is a later major |
//! | `>X.Y` | `X.Y` is below the target, or `X` is a later major |
//! | `X.Y.Z` | `X.Y.Z` is at or above the target |
//! | anything else | always covered |
//!
//! Anything the classifier cannot read (wildcards, `||` lists, hyphen or
//! space separated ranges, stability flags, branch names) is reported as
//! covered, so a constraint we do not understand is never rewritten. The same
//! applies when the target itself is not numeric.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::{compare, parse_numeric};

static BARE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("static regex"));

/// A declared constraint reduced to the forms the heuristic understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintForm {
    /// `^X.Y`
    Caret(Vec<u64>),
    /// `~X.Y[.Z]`
    Tilde(Vec<u64>),
    /// `>=X.Y`
    AtLeast(Vec<u64>),
    /// `>X.Y`
    Above(Vec<u64>),
    /// `X.Y.Z` with no operator
    Exact(Vec<u64>),
    /// Too complex to judge
    Opaque,
}

impl ConstraintForm {
    /// Classify a declared constraint by its leading syntax.
    pub fn classify(constraint: &str) -> Self {
        let constraint = constraint.trim();
        if constraint.is_empty()
            || constraint.contains(['*', '|', ',', '@'])
            || constraint.contains(char::is_whitespace)
        {
            return Self::Opaque;
        }

        let (build, rest): (fn(Vec<u64>) -> Self, &str) =
            if let Some(rest) = constraint.strip_prefix('^') {
                (ConstraintForm::Caret, rest)
            } else if let Some(rest) = constraint.strip_prefix('~') {
                (ConstraintForm::Tilde, rest)
            } else if let Some(rest) = constraint.strip_prefix(">=") {
                (ConstraintForm::AtLeast, rest)
            } else if let Some(rest) = constraint.strip_prefix('>') {
                (ConstraintForm::Above, rest)
            } else if BARE_VERSION.is_match(constraint) {
                (ConstraintForm::Exact, constraint)
            } else {
                return Self::Opaque;
            };

        parse_numeric(rest).map(build).unwrap_or(Self::Opaque)
    }

    /// Check this form against a numeric target version.
    fn covers(&self, target: &[u64]) -> bool {
        let major = |v: &[u64]| v.first().copied().unwrap_or(0);
        let minor = |v: &[u64]| v.get(1).copied().unwrap_or(0);

        match self {
            Self::Caret(declared) => {
                let target_minor = [major(target), minor(target)];
                major(declared) == major(target)
                    || compare(declared, &target_minor) != Ordering::Less
            }
            Self::Tilde(declared) => {
                major(declared) == major(target) && minor(declared) >= minor(target)
            }
            Self::AtLeast(declared) => {
                compare(declared, target) != Ordering::Greater || major(declared) > major(target)
            }
            Self::Above(declared) => {
                compare(declared, target) == Ordering::Less || major(declared) > major(target)
            }
            Self::Exact(declared) => compare(declared, target) != Ordering::Less,
            Self::Opaque => true,
        }
    }
}

/// Whether `existing` already covers `target`.
///
/// `target` may be a bare version (`"5.5"`) or a computed constraint
/// (`"^5.5"`); any leading operator characters are ignored.
pub fn satisfies(existing: &str, target: &str) -> bool {
    let target = target.trim_start_matches(|c: char| !c.is_ascii_digit());
    let Some(target) = parse_numeric(target) else {
        tracing::debug!(existing, "target is not numeric, keeping existing constraint");
        return true;
    };

    let form = ConstraintForm::classify(existing);
    let covered = form.covers(&target);
    tracing::debug!(existing, ?form, ?target, covered, "checked constraint");
    covered
}
