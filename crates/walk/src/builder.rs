use crate::control::WalkControl;
use crate::error::WalkError;
use crate::fs::{FileSystem, StdFileSystem};
use crate::options::{WalkOption, WalkOptions};
use crate::walker::Walker;
use std::path::{Path, PathBuf};

/// Configures a filesystem traversal rooted at a specific path.
///
/// The builder is a convenience over [`crate::walk`] that also allows the
/// filesystem backend to be replaced.
#[derive(Clone, Debug)]
pub struct WalkBuilder<F = StdFileSystem> {
    root: PathBuf,
    options: WalkOptions,
    fs: F,
}

impl WalkBuilder {
    /// Creates a new builder that will traverse the provided root path.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            options: WalkOptions::new(),
            fs: StdFileSystem,
        }
    }
}

impl<F: FileSystem> WalkBuilder<F> {
    /// Configures whether symlinks are resolved and their targets traversed.
    ///
    /// Callbacks always receive the logical path built from the root, even
    /// when the data is read from a resolved target.
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.options.apply(WalkOption::FollowSymlinks(follow));
        self
    }

    /// Applies a sequence of options in order.
    #[must_use]
    pub fn options<I: IntoIterator<Item = WalkOption>>(mut self, options: I) -> Self {
        self.options.extend(options);
        self
    }

    /// Replaces the filesystem backend.
    #[must_use]
    pub fn filesystem<G: FileSystem>(self, fs: G) -> WalkBuilder<G> {
        WalkBuilder {
            root: self.root,
            options: self.options,
            fs,
        }
    }

    /// Returns the root the walk starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the options collected so far.
    #[must_use]
    pub const fn walk_options(&self) -> WalkOptions {
        self.options
    }

    /// Runs the walk, invoking `callback` for every entry.
    ///
    /// Returns `Ok(())` when the walk completes or the root was skipped, and
    /// the first [`WalkControl::Abort`] value otherwise.
    pub fn walk<C, E>(&self, callback: C) -> Result<(), E>
    where
        C: FnMut(&Path, Option<&F::Metadata>, Option<WalkError>) -> WalkControl<E>,
    {
        Walker::new(&self.fs, callback, self.options)
            .run(&self.root)
            .into_result()
    }
}
