use crate::error::WalkError;

/// Decision returned by the walk callback for each entry.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum WalkControl<E = WalkError> {
    /// Keep walking.
    Continue,
    /// Do not descend into the current directory.
    ///
    /// Returned for a directory, its descendants are skipped and the walk
    /// carries on with the directory's next sibling. Returned for a
    /// non-directory entry, the remaining siblings of that entry are skipped
    /// and the walk resumes after its parent directory. Returned for the
    /// root, the walk ends successfully.
    SkipChildren,
    /// Stop the walk; the value becomes the result of the walk.
    Abort(E),
}

impl<E> WalkControl<E> {
    /// Reports whether this is [`WalkControl::Continue`].
    pub const fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Reports whether this is [`WalkControl::Abort`].
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }

    /// Converts the final outcome of a walk into a result.
    ///
    /// A skip request that reached the top of the walk is not a failure.
    pub(crate) fn into_result(self) -> Result<(), E> {
        match self {
            Self::Continue | Self::SkipChildren => Ok(()),
            Self::Abort(error) => Err(error),
        }
    }
}

impl<E> From<Result<(), E>> for WalkControl<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Continue,
            Err(error) => Self::Abort(error),
        }
    }
}
