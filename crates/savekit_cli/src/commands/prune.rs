//! Prune command implementation.

use super::{format_size, CmdResult};
use savekit_storage::{retention, FileBackend};
use std::path::Path;

/// Runs the prune command.
pub fn run(dir: &Path, extension: &str, keep: usize, dry_run: bool) -> CmdResult<()> {
    if !dir.is_dir() {
        return Err(format!("No save directory at {}", dir.display()).into());
    }
    let extension = extension.trim_start_matches('.');
    let backend = FileBackend::new();

    if dry_run {
        let candidates = retention::prune_candidates(&backend, dir, extension, keep)?;
        println!("Dry run - would remove {} file(s):", candidates.len());
        for file in &candidates {
            println!("  {} ({})", file.path.display(), format_size(file.len));
        }
        return Ok(());
    }

    let removed = retention::prune(&backend, dir, extension, keep)?;
    println!("Removed {} file(s)", removed.len());
    for path in &removed {
        println!("  {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use savekit_storage::StorageBackend;

    #[test]
    fn dry_run_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            std::fs::write(dir.path().join(format!("s{i}.sav")), "{}").unwrap();
        }
        run(dir.path(), "sav", 1, true).unwrap();
        assert_eq!(FileBackend::new().list(dir.path(), "sav").unwrap().len(), 3);
    }

    #[test]
    fn prunes_to_limit() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            std::fs::write(dir.path().join(format!("s{i}.sav")), "{}").unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
        run(dir.path(), ".sav", 1, false).unwrap();
        assert_eq!(FileBackend::new().list(dir.path(), "sav").unwrap().len(), 1);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("gone"), "sav", 1, false).is_err());
    }
}
