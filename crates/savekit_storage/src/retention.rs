//! Retention: keep the newest N save files in a directory.

use crate::backend::{StorageBackend, StoredFile};
use crate::error::StorageResult;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lists matching files newest first.
///
/// Files with equal modification times are ordered by path, descending, so
/// the order is stable.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn newest_first(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
) -> StorageResult<Vec<StoredFile>> {
    let mut files = backend.list(dir, extension)?;
    files.sort_by(|a, b| {
        (Reverse(a.modified), Reverse(&a.path)).cmp(&(Reverse(b.modified), Reverse(&b.path)))
    });
    Ok(files)
}

/// Returns the most recently modified matching file.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn latest(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
) -> StorageResult<Option<StoredFile>> {
    Ok(newest_first(backend, dir, extension)?.into_iter().next())
}

/// Returns the files [`prune`] would delete, oldest last.
///
/// A `keep` of zero means unlimited retention and never selects anything.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn prune_candidates(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
    keep: usize,
) -> StorageResult<Vec<StoredFile>> {
    select(backend, dir, extension, keep, None)
}

/// Like [`prune_candidates`], but `pinned` is ranked newest and never
/// selected, whatever its modification time says.
///
/// File systems with coarse timestamps can give a file that was just
/// written the same time as an older one; pinning keeps it in the
/// retained set.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn prune_candidates_pinned(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
    keep: usize,
    pinned: &Path,
) -> StorageResult<Vec<StoredFile>> {
    select(backend, dir, extension, keep, Some(pinned))
}

fn select(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
    keep: usize,
    pinned: Option<&Path>,
) -> StorageResult<Vec<StoredFile>> {
    if keep == 0 {
        return Ok(Vec::new());
    }
    let mut files = newest_first(backend, dir, extension)?;
    if let Some(pinned) = pinned {
        if let Some(at) = files.iter().position(|f| f.path == pinned) {
            let file = files.remove(at);
            files.insert(0, file);
        }
    }
    Ok(if files.len() > keep {
        files.split_off(keep)
    } else {
        Vec::new()
    })
}

/// Deletes all but the `keep` most recently modified files with
/// `extension` in `dir`. Returns the deleted paths.
///
/// There is no locking against other writers in the directory; a file
/// that disappears before it is deleted is not an error.
///
/// # Errors
///
/// Returns the first error from listing or deleting.
pub fn prune(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
    keep: usize,
) -> StorageResult<Vec<PathBuf>> {
    let victims = prune_candidates(backend, dir, extension, keep)?;
    remove_all(backend, dir, keep, victims)
}

/// Like [`prune`], but never deletes `pinned`, which counts as the newest
/// file. Used after a save so the file just written always survives.
///
/// # Errors
///
/// Returns the first error from listing or deleting.
pub fn prune_pinned(
    backend: &dyn StorageBackend,
    dir: &Path,
    extension: &str,
    keep: usize,
    pinned: &Path,
) -> StorageResult<Vec<PathBuf>> {
    let victims = prune_candidates_pinned(backend, dir, extension, keep, pinned)?;
    remove_all(backend, dir, keep, victims)
}

fn remove_all(
    backend: &dyn StorageBackend,
    dir: &Path,
    keep: usize,
    victims: Vec<StoredFile>,
) -> StorageResult<Vec<PathBuf>> {
    let mut removed = Vec::with_capacity(victims.len());
    for file in victims {
        debug!(path = %file.path.display(), "pruning old save");
        backend.remove(&file.path)?;
        removed.push(file.path);
    }
    if !removed.is_empty() {
        info!(dir = %dir.display(), removed = removed.len(), keep, "pruned old saves");
    }
    Ok(removed)
}
