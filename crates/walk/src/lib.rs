#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `symwalk` provides a deterministic, depth-first filesystem traversal that
//! behaves like a conventional non-following walk by default and can
//! optionally resolve symbolic links as it descends. When symlinks are
//! followed, every resolved path is remembered for the duration of the walk so
//! links that lead back to an already-visited location are reported as cycles
//! instead of being walked forever.
//!
//! # Design
//!
//! - [`walk`] and [`WalkBuilder`] start a traversal and invoke a callback for
//!   every entry. The callback receives the *logical* path, built purely from
//!   the root argument and entry names, together with the entry's metadata and
//!   any error encountered while inspecting it.
//! - The callback answers with a [`WalkControl`]: continue, skip the current
//!   directory's children, or abort the walk with a value of its choosing.
//! - [`FileSystem`] abstracts the three primitives the walker needs: a
//!   non-dereferencing metadata probe, a directory lister, and a symlink
//!   resolver. [`StdFileSystem`] implements them on top of [`std::fs`].
//! - [`WalkError`] describes every failure handed to the callback. Symlink
//!   cycles are a distinct [`WalkErrorKind::Cycle`] variant.
//!
//! # Invariants
//!
//! - Siblings are visited in lexicographic order of their names and every
//!   directory is reported before its children.
//! - Disk reads use the resolved path; callbacks always see the logical path.
//! - A resolved path is walked at most once per call when following symlinks.
//!   The root is canonicalized for this check; its logical path is not.
//! - Errors never end the walk on their own. Only [`WalkControl::Abort`] does.
//!
//! # Examples
//!
//! ```
//! use symwalk::{walk, WalkControl, WalkOption};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("r");
//! fs::create_dir_all(root.join("a"))?;
//! fs::write(root.join("a").join("x"), b"data")?;
//! fs::write(root.join("b"), b"data")?;
//!
//! let mut seen = Vec::new();
//! walk(
//!     &root,
//!     |path, _metadata, error| match error {
//!         Some(error) => WalkControl::Abort(error),
//!         None => {
//!             seen.push(path.strip_prefix(&root).unwrap().to_path_buf());
//!             WalkControl::Continue
//!         }
//!     },
//!     [WalkOption::follow_symlinks()],
//! )?;
//!
//! let seen: Vec<_> = seen.iter().map(|p| p.to_str().unwrap()).collect();
//! assert_eq!(seen, ["", "a", "a/x", "b"]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod control;
mod error;
pub mod fs;
mod options;
mod resolve;
mod walker;

pub use builder::WalkBuilder;
pub use control::WalkControl;
pub use error::{WalkError, WalkErrorKind};
pub use fs::{DirectoryHandle, EntryMetadata, EntryType, FileSystem, StdFileSystem};
pub use options::{WalkOption, WalkOptions};

use std::path::Path;

/// Walks the tree rooted at `root`, invoking `callback` for every entry.
///
/// The callback is called once for the root, once for every entry below it,
/// and once for every entry that could not be inspected (with `None`
/// metadata). Directories are reported after they have been listed, together
/// with any listing error. Returning [`WalkControl::SkipChildren`] for a
/// directory prunes it; returning [`WalkControl::Abort`] stops the walk and
/// makes its value the result.
///
/// `options` are applied in order to the defaults described by
/// [`WalkOptions::new`].
pub fn walk<P, C, E, I>(root: P, callback: C, options: I) -> Result<(), E>
where
    P: AsRef<Path>,
    C: FnMut(&Path, Option<&std::fs::Metadata>, Option<WalkError>) -> WalkControl<E>,
    I: IntoIterator<Item = WalkOption>,
{
    let options: WalkOptions = options.into_iter().collect();
    walker::Walker::new(&StdFileSystem, callback, options)
        .run(root.as_ref())
        .into_result()
}
