//! Normalized path handling

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Component directories and manifest locations are built by string joins
/// (`{base}/{slug}/composer.json`), so keeping one separator makes them
/// comparable and printable the same way on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An empty base yields the segment itself, so relative joins stay relative.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            segment
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Whether the path is absolute (leading slash or a drive letter).
    pub fn is_absolute(&self) -> bool {
        let bytes = self.inner.as_bytes();
        self.inner.starts_with('/')
            || (bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && &bytes[1..3] == b":/")
    }

    /// Resolve this path against `root` unless it is already absolute.
    pub fn resolve_against(&self, root: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            root.join(&self.inner)
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// File name without its last extension (`akismet.php` -> `akismet`).
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_normalized() {
        let path = NormalizedPath::new("wp-content\\plugins\\akismet");
        assert_eq!(path.as_str(), "wp-content/plugins/akismet");
    }

    #[test]
    fn test_join_empty_base() {
        let path = NormalizedPath::new("").join("composer.json");
        assert_eq!(path.as_str(), "composer.json");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(NormalizedPath::new("mu/loader.php").file_stem(), Some("loader"));
        assert_eq!(NormalizedPath::new("README").file_stem(), Some("README"));
        assert_eq!(NormalizedPath::new(".hidden").file_stem(), Some(".hidden"));
    }

    #[test]
    fn test_resolve_against() {
        let root = NormalizedPath::new("/srv/site");
        assert_eq!(
            NormalizedPath::new("wp-content/plugins").resolve_against(&root).as_str(),
            "/srv/site/wp-content/plugins"
        );
        assert_eq!(
            NormalizedPath::new("/opt/plugins").resolve_against(&root).as_str(),
            "/opt/plugins"
        );
        assert_eq!(
            NormalizedPath::new("C:\\wp\\plugins").resolve_against(&root).as_str(),
            "C:/wp/plugins"
        );
    }

    #[test]
    fn test_parent() {
        assert_eq!(
            NormalizedPath::new("/srv/site/composer.json").parent(),
            Some(NormalizedPath::new("/srv/site"))
        );
        assert_eq!(NormalizedPath::new("/srv").parent(), Some(NormalizedPath::new("/")));
        assert_eq!(NormalizedPath::new("composer.json").parent(), None);
    }
}
