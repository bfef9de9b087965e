use crate::control::WalkControl;
use crate::error::WalkError;
use crate::fs::{DirectoryHandle, EntryMetadata, FileSystem};
use crate::options::WalkOptions;
use crate::resolve::{Unresolved, optionally_resolve_symlink};
use rustc_hash::FxHashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Per-call traversal state.
///
/// `visited` holds resolved paths seen so far and is only populated when
/// symlinks are followed.
pub(crate) struct Walker<'a, F: FileSystem, C> {
    fs: &'a F,
    callback: C,
    follow_symlinks: bool,
    visited: FxHashSet<PathBuf>,
}

impl<'a, F, C, E> Walker<'a, F, C>
where
    F: FileSystem,
    C: FnMut(&Path, Option<&F::Metadata>, Option<WalkError>) -> WalkControl<E>,
{
    pub(crate) fn new(fs: &'a F, callback: C, options: WalkOptions) -> Self {
        Self {
            fs,
            callback,
            follow_symlinks: options.follow_symlinks(),
            visited: FxHashSet::default(),
        }
    }

    /// Probes and resolves the root, then walks it.
    pub(crate) fn run(mut self, root: &Path) -> WalkControl<E> {
        debug!(root = %root.display(), follow_symlinks = self.follow_symlinks, "walking");

        let metadata = match self.fs.symlink_metadata(root) {
            Ok(metadata) => metadata,
            Err(source) => {
                let error = WalkError::root_metadata(root.to_path_buf(), source);
                return (self.callback)(root, None, Some(error));
            }
        };

        let (resolved, metadata) = match optionally_resolve_symlink(
            self.fs,
            root.to_path_buf(),
            metadata,
            self.follow_symlinks,
        ) {
            Ok(resolved) => resolved,
            Err(Unresolved { error, .. }) => return (self.callback)(root, None, Some(error)),
        };

        match self.canonical_root(resolved) {
            Ok(resolved) => self.walk(root, &resolved, &metadata),
            Err(error) => (self.callback)(root, None, Some(error)),
        }
    }

    /// Resolved children are canonical, so the root must be too for the
    /// visited set to recognise links back to it.
    fn canonical_root(&self, resolved: PathBuf) -> Result<PathBuf, WalkError> {
        if !self.follow_symlinks {
            return Ok(resolved);
        }
        self.fs
            .canonicalize(&resolved)
            .map_err(|source| WalkError::resolve(resolved, source))
    }

    /// `logical` is handed to the callback; `resolved` is what gets read.
    fn walk(&mut self, logical: &Path, resolved: &Path, metadata: &F::Metadata) -> WalkControl<E> {
        if self.follow_symlinks {
            if self.visited.contains(resolved) {
                debug!(path = %logical.display(), resolved = %resolved.display(), "symlink cycle");
                let error = WalkError::cycle(resolved.to_path_buf());
                return (self.callback)(logical, Some(metadata), Some(error));
            }
            self.visited.insert(resolved.to_path_buf());
        }

        if !metadata.is_directory() {
            return (self.callback)(logical, Some(metadata), None);
        }

        let listing = read_dir_names(self.fs, resolved);
        let (names, listing_error) = match listing {
            Ok(names) => (Some(names), None),
            Err(error) => (None, Some(error)),
        };
        // The callback may swallow the listing error, but without names there
        // is nothing to descend into either way.
        let control = (self.callback)(logical, Some(metadata), listing_error);
        let names = match (names, control) {
            (Some(names), WalkControl::Continue) => names,
            (_, control) => return control,
        };

        debug!(path = %logical.display(), entries = names.len(), "entering directory");
        for name in names {
            let child_logical = logical.join(&name);
            let child_resolved = resolved.join(&name);

            let child_metadata = match self.fs.symlink_metadata(&child_resolved) {
                Ok(child_metadata) => child_metadata,
                Err(source) => {
                    let error = WalkError::metadata(child_resolved, source);
                    match (self.callback)(&child_logical, None, Some(error)) {
                        WalkControl::Abort(error) => return WalkControl::Abort(error),
                        WalkControl::Continue | WalkControl::SkipChildren => continue,
                    }
                }
            };

            let (child_resolved, child_metadata) = match optionally_resolve_symlink(
                self.fs,
                child_resolved,
                child_metadata,
                self.follow_symlinks,
            ) {
                Ok(resolved) => resolved,
                Err(Unresolved { metadata, error }) => {
                    match (self.callback)(&child_logical, Some(&metadata), Some(error)) {
                        WalkControl::Abort(error) => return WalkControl::Abort(error),
                        WalkControl::Continue | WalkControl::SkipChildren => continue,
                    }
                }
            };

            match self.walk(&child_logical, &child_resolved, &child_metadata) {
                WalkControl::Continue => {}
                WalkControl::SkipChildren if child_metadata.is_directory() => {
                    trace!(path = %child_logical.display(), "skipped directory");
                }
                // A skip from a leaf ends this directory; the parent absorbs it.
                control => return control,
            }
        }

        WalkControl::Continue
    }
}

/// Lists `path` and returns its entry names in sorted order.
///
/// The handle is closed on every path after a successful open. A close
/// failure is combined with any earlier error rather than replacing it.
pub(crate) fn read_dir_names<F: FileSystem>(
    fs: &F,
    path: &Path,
) -> Result<Vec<OsString>, WalkError> {
    let mut directory = fs
        .open_dir(path)
        .map_err(|error| WalkError::read_dir(path.to_path_buf(), error))?;

    let names = directory
        .read_names()
        .map_err(|error| WalkError::read_dir_entry(path.to_path_buf(), error));
    let close_error = directory
        .close()
        .err()
        .map(|error| WalkError::close(path.to_path_buf(), error));

    match names {
        Ok(mut names) => match close_error {
            Some(error) => Err(error),
            None => {
                names.sort();
                trace!(path = %path.display(), entries = names.len(), "listed directory");
                Ok(names)
            }
        },
        Err(error) => Err(error.append(close_error)),
    }
}
