use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error reported to the walk callback.
///
/// Every failure the walker encounters is handed to the callback first, which
/// decides whether to ignore it, prune a subtree, or abort the walk by
/// returning [`crate::WalkControl::Abort`]. Errors therefore never terminate a
/// traversal on their own.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct WalkError {
    kind: WalkErrorKind,
}

impl WalkError {
    pub(crate) fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) fn root_metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::RootMetadata { path, source })
    }

    pub(crate) fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDir { path, source })
    }

    pub(crate) fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDirEntry { path, source })
    }

    pub(crate) fn resolve(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Resolve { path, source })
    }

    pub(crate) fn cycle(path: PathBuf) -> Self {
        Self::new(WalkErrorKind::Cycle { path })
    }

    pub(crate) fn close(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Close { path, source })
    }

    /// Combines two optional errors so that neither is lost.
    ///
    /// When both are present the result is a [`WalkErrorKind::Multiple`]
    /// holding the primary error first. Nested aggregates are flattened.
    #[must_use]
    pub fn combine(primary: Option<Self>, secondary: Option<Self>) -> Option<Self> {
        match primary {
            Some(primary) => Some(primary.append(secondary)),
            None => secondary,
        }
    }

    pub(crate) fn append(self, other: Option<Self>) -> Self {
        match other {
            None => self,
            Some(other) => {
                let mut errors = self.into_errors();
                errors.extend(other.into_errors());
                Self::new(WalkErrorKind::Multiple(errors))
            }
        }
    }

    fn into_errors(self) -> Vec<Self> {
        match self.kind {
            WalkErrorKind::Multiple(errors) => errors,
            kind => vec![Self::new(kind)],
        }
    }

    /// Returns the specific failure.
    #[must_use]
    pub fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> WalkErrorKind {
        self.kind
    }

    /// Reports whether the walker found a symlink cycle.
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self.kind, WalkErrorKind::Cycle { .. })
    }

    /// Returns the filesystem path associated with the error.
    ///
    /// For aggregated errors this is the path of the first contained error.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }

    /// Returns the individual errors wrapped by this error.
    ///
    /// Aggregates yield their members; any other error yields itself.
    #[must_use]
    pub fn errors(&self) -> &[Self] {
        match &self.kind {
            WalkErrorKind::Multiple(errors) => errors,
            _ => std::slice::from_ref(self),
        }
    }
}

/// Classification of traversal failures.
#[derive(Debug, Error)]
pub enum WalkErrorKind {
    /// Failed to query metadata for the traversal root.
    #[error("failed to inspect traversal root '{}': {source}", path.display())]
    RootMetadata {
        /// Path that failed to provide metadata.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to retrieve metadata for an entry.
    #[error("failed to inspect metadata for '{}': {source}", path.display())]
    Metadata {
        /// Path whose metadata could not be retrieved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to open or list a directory.
    #[error("failed to read directory '{}': {source}", path.display())]
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to obtain a directory entry during iteration.
    #[error("failed to read entry in '{}': {source}", path.display())]
    ReadDirEntry {
        /// Directory containing the problematic entry.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Failed to resolve the target of a symbolic link.
    #[error("failed to resolve symlink '{}': {source}", path.display())]
    Resolve {
        /// Symlink whose target could not be resolved.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A resolved path was reached a second time while following symlinks.
    #[error("found a symlink loop at: {}", path.display())]
    Cycle {
        /// Resolved path that was already visited.
        path: PathBuf,
    },
    /// Failed to release a directory handle.
    #[error("failed to close directory '{}': {source}", path.display())]
    Close {
        /// Directory whose handle failed to close.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Several failures reported together.
    #[error("{}", display_all(.0))]
    Multiple(Vec<WalkError>),
}

impl WalkErrorKind {
    /// Returns the filesystem path tied to the failure.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootMetadata { path, .. }
            | Self::Metadata { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Resolve { path, .. }
            | Self::Cycle { path }
            | Self::Close { path, .. } => path,
            Self::Multiple(errors) => errors.first().map_or(Path::new(""), WalkError::path),
        }
    }
}

fn display_all(errors: &[WalkError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn io_error(message: &'static str) -> io::Error {
        io::Error::other(message)
    }

    #[test]
    fn walk_error_path_matches_variant_path() {
        let root = WalkError::root_metadata(PathBuf::from("root"), io_error("root"));
        assert_eq!(Path::new("root"), root.path());

        let read_dir = WalkError::read_dir(PathBuf::from("dir"), io_error("dir"));
        assert_eq!(Path::new("dir"), read_dir.path());

        let resolve = WalkError::resolve(PathBuf::from("link"), io_error("link"));
        assert_eq!(Path::new("link"), resolve.path());

        let cycle = WalkError::cycle(PathBuf::from("loop"));
        assert_eq!(Path::new("loop"), cycle.path());
    }

    #[test]
    fn walk_error_display_is_specific_per_variant() {
        let metadata = WalkError::metadata(PathBuf::from("meta"), io_error("boom"));
        assert_eq!(
            "failed to inspect metadata for 'meta': boom",
            metadata.to_string()
        );

        let read_dir_entry = WalkError::read_dir_entry(PathBuf::from("entry"), io_error("boom"));
        assert_eq!(
            "failed to read entry in 'entry': boom",
            read_dir_entry.to_string()
        );

        let cycle = WalkError::cycle(PathBuf::from("/r/a"));
        assert_eq!("found a symlink loop at: /r/a", cycle.to_string());

        let close = WalkError::close(PathBuf::from("dir"), io_error("boom"));
        assert_eq!("failed to close directory 'dir': boom", close.to_string());
    }

    #[test]
    fn cycle_is_identified_by_kind() {
        assert!(WalkError::cycle(PathBuf::from("a")).is_cycle());
        assert!(!WalkError::resolve(PathBuf::from("a"), io_error("x")).is_cycle());
    }

    #[test]
    fn combine_keeps_single_error() {
        let only = WalkError::combine(None, Some(WalkError::cycle(PathBuf::from("a"))))
            .expect("error present");
        assert!(only.is_cycle());
        assert!(WalkError::combine(None, None).is_none());
    }

    #[test]
    fn combine_preserves_both_errors_in_order() {
        let primary = WalkError::read_dir(PathBuf::from("dir"), io_error("list"));
        let secondary = WalkError::close(PathBuf::from("dir"), io_error("close"));
        let combined = WalkError::combine(Some(primary), Some(secondary)).expect("combined");

        let errors = combined.errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0].kind(), WalkErrorKind::ReadDir { .. }));
        assert!(matches!(errors[1].kind(), WalkErrorKind::Close { .. }));
        assert_eq!(
            combined.to_string(),
            "failed to read directory 'dir': list; failed to close directory 'dir': close"
        );
        assert_eq!(combined.path(), Path::new("dir"));
    }

    #[test]
    fn combine_flattens_nested_aggregates() {
        let first = WalkError::combine(
            Some(WalkError::cycle(PathBuf::from("a"))),
            Some(WalkError::cycle(PathBuf::from("b"))),
        );
        let all = WalkError::combine(first, Some(WalkError::cycle(PathBuf::from("c"))))
            .expect("combined");
        let paths: Vec<_> = all.errors().iter().map(WalkError::path).collect();
        assert_eq!(paths, vec![Path::new("a"), Path::new("b"), Path::new("c")]);
    }

    #[test]
    fn walk_error_source_refers_to_underlying_io_error() {
        let error = WalkError::read_dir(PathBuf::from("dir"), io_error("source"));
        let source_ref = error
            .source()
            .and_then(|err| err.downcast_ref::<io::Error>())
            .expect("walk error should expose the underlying io::Error");
        assert_eq!(source_ref.to_string(), "source");
    }
}
