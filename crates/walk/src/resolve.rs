use crate::error::WalkError;
use crate::fs::{EntryMetadata, FileSystem};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Symlink resolution that failed.
///
/// Carries the metadata of the original, unresolved entry alongside the error
/// so the callback can still describe the link itself.
#[derive(Debug)]
pub(crate) struct Unresolved<M> {
    pub(crate) metadata: M,
    pub(crate) error: WalkError,
}

/// Replaces a symlink with its resolved target when following is enabled.
///
/// Non-symlinks and walks that do not follow symlinks pass through unchanged.
/// On success the target is probed again without dereferencing, so the caller
/// always sees the freshest metadata for the path it will read from.
pub(crate) fn optionally_resolve_symlink<F: FileSystem>(
    fs: &F,
    path: PathBuf,
    metadata: F::Metadata,
    follow_symlinks: bool,
) -> Result<(PathBuf, F::Metadata), Unresolved<F::Metadata>> {
    if !follow_symlinks || !metadata.is_symlink() {
        return Ok((path, metadata));
    }

    let resolved = match fs.canonicalize(&path) {
        Ok(resolved) => resolved,
        Err(source) => {
            return Err(Unresolved {
                metadata,
                error: WalkError::resolve(path, source),
            });
        }
    };

    match fs.symlink_metadata(&resolved) {
        Ok(target) => {
            trace_resolution(&path, &resolved);
            Ok((resolved, target))
        }
        Err(source) => Err(Unresolved {
            metadata,
            error: WalkError::metadata(resolved, source),
        }),
    }
}

fn trace_resolution(link: &Path, target: &Path) {
    trace!(link = %link.display(), target = %target.display(), "resolved symlink");
}
