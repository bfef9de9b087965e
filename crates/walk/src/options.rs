/// Immutable configuration for a single walk.
///
/// Options are built once per call from a sequence of [`WalkOption`] values
/// and never change while the traversal runs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkOptions {
    follow_symlinks: bool,
}

impl WalkOptions {
    /// Creates the default options: symlinks are reported, not followed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            follow_symlinks: false,
        }
    }

    /// Applies a single option.
    pub fn apply(&mut self, option: WalkOption) {
        match option {
            WalkOption::FollowSymlinks(follow) => self.follow_symlinks = follow,
        }
    }

    /// Reports whether symlinks are resolved during traversal.
    #[must_use]
    pub const fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }
}

/// A single configuration change applied to [`WalkOptions`].
///
/// Options apply in order, so a later value overrides an earlier one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkOption {
    /// Resolve symlinks and descend into their targets.
    ///
    /// The callback still receives the logical path built from the root
    /// argument, but the metadata describes the link target. Resolved paths
    /// are tracked so that links pointing back at already-visited locations
    /// are reported as cycles instead of being walked again.
    FollowSymlinks(bool),
}

impl WalkOption {
    /// Shorthand for `WalkOption::FollowSymlinks(true)`.
    #[must_use]
    pub const fn follow_symlinks() -> Self {
        Self::FollowSymlinks(true)
    }
}

impl FromIterator<WalkOption> for WalkOptions {
    fn from_iter<I: IntoIterator<Item = WalkOption>>(iter: I) -> Self {
        let mut options = Self::new();
        for option in iter {
            options.apply(option);
        }
        options
    }
}

impl Extend<WalkOption> for WalkOptions {
    fn extend<I: IntoIterator<Item = WalkOption>>(&mut self, iter: I) {
        for option in iter {
            self.apply(option);
        }
    }
}
