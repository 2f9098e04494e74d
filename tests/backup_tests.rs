use anyhow::Result;
use ark_cli::config::ArkPaths;
use ark_cli::core::backup::{run_backup_at, storages_exist};
use ark_cli::ArkError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_run_backup_copies_every_root() -> Result<()> {
    let base = TempDir::new()?;
    let paths = ArkPaths::rooted_at(base.path());

    let root_a = base.path().join("root-a");
    let root_b = base.path().join("root-b");
    fs::create_dir_all(root_a.join(".ark"))?;
    fs::create_dir_all(root_b.join(".ark/previews"))?;
    fs::write(root_a.join(".ark/index"), "index-a")?;
    fs::write(root_b.join(".ark/tags"), "tags-b")?;
    fs::write(root_b.join(".ark/previews/1-2.png"), "png")?;

    let report = run_backup_at(&paths, &[root_a.clone(), root_b.clone()], 1_700_000_000)?;

    let backup_dir = paths.backups_dir().join("1700000000");
    assert_eq!(report.backup_dir, backup_dir);
    assert_eq!(report.copied_roots, vec![root_a.clone(), root_b.clone()]);

    // roots keep their ordinal subfolder
    assert_eq!(fs::read_to_string(backup_dir.join("0/index"))?, "index-a");
    assert_eq!(fs::read_to_string(backup_dir.join("1/tags"))?, "tags-b");
    assert_eq!(
        fs::read_to_string(backup_dir.join("1/previews/1-2.png"))?,
        "png"
    );

    let manifest = fs::read_to_string(backup_dir.join("roots"))?;
    assert!(manifest.contains(&root_a.display().to_string()));
    assert!(manifest.contains(&root_b.display().to_string()));
    Ok(())
}

#[test]
fn test_backup_in_same_second_collides() -> Result<()> {
    let base = TempDir::new()?;
    let paths = ArkPaths::rooted_at(base.path());

    let root = base.path().join("root");
    fs::create_dir_all(root.join(".ark"))?;
    fs::write(root.join(".ark/index"), "x")?;

    run_backup_at(&paths, &[root.clone()], 42)?;
    let second = run_backup_at(&paths, &[root.clone()], 42);
    assert!(matches!(second, Err(ArkError::BackupCollision)));

    // a later second is fine again
    run_backup_at(&paths, &[root], 43)?;
    Ok(())
}

#[test]
fn test_backup_skips_roots_it_cannot_copy() -> Result<()> {
    let base = TempDir::new()?;
    let paths = ArkPaths::rooted_at(base.path());

    let good = base.path().join("good");
    let missing = base.path().join("missing");
    fs::create_dir_all(good.join(".ark"))?;
    fs::write(good.join(".ark/index"), "x")?;
    assert!(storages_exist(&good));
    assert!(!storages_exist(&missing));

    let report = run_backup_at(&paths, &[missing, good.clone()], 7)?;
    assert_eq!(report.copied_roots, vec![good]);

    // the good root still landed under its own ordinal
    let backup_dir = paths.backups_dir().join("7");
    assert!(backup_dir.join("1/index").exists());
    assert!(!backup_dir.join("0/index").exists());
    Ok(())
}
