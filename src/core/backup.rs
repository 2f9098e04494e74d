use crate::config::{ARK_FOLDER, ArkPaths, ROOTS_CFG_FILENAME};
use crate::utils::error::{ArkError, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct BackupReport {
    pub backup_dir: PathBuf,
    pub copied_roots: Vec<PathBuf>,
}

/// Only roots that carry an `.ark` folder have anything worth copying.
pub fn storages_exist(root: &Path) -> bool {
    root.join(ARK_FOLDER).exists()
}

pub fn partition_by_storages(roots: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut with_storages = Vec::new();
    let mut without = Vec::new();
    for root in roots {
        if storages_exist(root) {
            with_storages.push(root.clone());
        } else {
            without.push(root.clone());
        }
    }
    (with_storages, without)
}

pub fn run_backup(paths: &ArkPaths, roots: &[PathBuf]) -> Result<BackupReport> {
    let timestamp_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    run_backup_at(paths, roots, timestamp_secs)
}

/// Copy each root's `.ark` folder into `<backups>/<timestamp>/<index>`. The
/// timestamp has second resolution, so two backups in the same second collide.
pub fn run_backup_at(
    paths: &ArkPaths,
    roots: &[PathBuf],
    timestamp_secs: u64,
) -> Result<BackupReport> {
    let backup_dir = paths.backups_dir().join(timestamp_secs.to_string());
    if backup_dir.exists() {
        return Err(ArkError::BackupCollision);
    }
    fs::create_dir_all(&backup_dir)?;

    let mut manifest = String::new();
    for root in roots {
        manifest.push_str(&format!("{}\n", root.display()));
    }
    fs::write(backup_dir.join(ROOTS_CFG_FILENAME), manifest)?;

    let mut copied_roots = Vec::new();
    for (i, root) in roots.iter().enumerate() {
        let target = backup_dir.join(i.to_string());
        match copy_dir_recursive(&root.join(ARK_FOLDER), &target) {
            Ok(()) => copied_roots.push(root.clone()),
            Err(e) => tracing::warn!("Skipping {} in backup: {}", root.display(), e),
        }
    }

    Ok(BackupReport {
        backup_dir,
        copied_roots,
    })
}

// 備份要連隱藏檔一起複製
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    let walker = WalkBuilder::new(src)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    for entry in walker {
        let entry = entry.map_err(std::io::Error::other)?;
        let rel = entry.path().strip_prefix(src).map_err(std::io::Error::other)?;
        let target = dst.join(rel);

        if entry.file_type().is_some_and(|t| t.is_dir()) {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_some_and(|t| t.is_file()) {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partition_by_storages() {
        let dir = TempDir::new().unwrap();
        let with = dir.path().join("with");
        let without = dir.path().join("without");
        fs::create_dir_all(with.join(ARK_FOLDER)).unwrap();
        fs::create_dir_all(&without).unwrap();

        let (good, bad) = partition_by_storages(&[with.clone(), without.clone()]);
        assert_eq!(good, vec![with]);
        assert_eq!(bad, vec![without]);
    }

    #[test]
    fn test_copy_dir_recursive_keeps_structure() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("top.txt"), "top").unwrap();
        fs::write(src.join("nested/deep.txt"), "deep").unwrap();
        fs::write(src.join(".hidden"), "still copied").unwrap();

        let dst = dir.path().join("dst");
        copy_dir_recursive(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("top.txt")).unwrap(), "top");
        assert_eq!(
            fs::read_to_string(dst.join("nested/deep.txt")).unwrap(),
            "deep"
        );
        assert_eq!(
            fs::read_to_string(dst.join(".hidden")).unwrap(),
            "still copied"
        );
    }
}
