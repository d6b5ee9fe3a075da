//! Version normalization
//!
//! Installed versions are reduced to `major.minor` before they become
//! constraints, so a patch release never produces a manifest change.

use std::cmp::Ordering;

/// Reduce a dotted version to `major.minor`, or `major` when there is no
/// minor segment.
///
/// Input is not validated: `"beta"` comes back as `"beta"`.
///
/// ```
/// use sync_core::version::to_minor;
///
/// assert_eq!(to_minor("6.4.2"), "6.4");
/// assert_eq!(to_minor("7"), "7");
/// ```
pub fn to_minor(version: &str) -> String {
    let mut segments = version.split('.');
    let major = segments.next().unwrap_or_default();
    match segments.next() {
        Some(minor) => format!("{major}.{minor}"),
        None => major.to_string(),
    }
}

/// Format the constraint written for an installed version.
///
/// Exact-pinned components get the bare `major.minor`; everything else gets a
/// caret range.
pub fn constraint_for(version: &str, exact: bool) -> String {
    let minor = to_minor(version);
    if exact { minor } else { format!("^{minor}") }
}

/// Parse a purely numeric dotted version (`"5"`, `"5.3"`, `"1.2.3"`).
///
/// Returns `None` for anything containing a non-digit segment.
pub(crate) fn parse_numeric(version: &str) -> Option<Vec<u64>> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }
    version
        .split('.')
        .map(|segment| {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                segment.parse::<u64>().ok()
            }
        })
        .collect()
}

/// Compare numeric versions segment by segment; missing segments count as 0.
pub(crate) fn compare(left: &[u64], right: &[u64]) -> Ordering {
    let len = left.len().max(right.len());
    (0..len)
        .map(|i| {
            let l = left.get(i).copied().unwrap_or(0);
            let r = right.get(i).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
