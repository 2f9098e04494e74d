use crate::config::{discover_roots, ArkPaths};
use crate::core::backup::{partition_by_storages, run_backup};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Back up every discovered root's `.ark` folder. Returns the backup
/// directory, or `None` when there was nothing to copy.
pub fn run_backup_command(paths: &ArkPaths, roots_cfg: Option<&Path>) -> Result<Option<PathBuf>> {
    println!("Preparing backup:");
    let roots = discover_roots(paths, roots_cfg)?;
    let (valid, invalid) = partition_by_storages(&roots);

    if !invalid.is_empty() {
        println!("These folders don't contain any storages:");
        for root in &invalid {
            println!("\t{}", root.display());
        }
    }

    if valid.is_empty() {
        println!("Nothing to backup. Bye!");
        return Ok(None);
    }

    println!("Performing backups:");
    for root in &valid {
        println!("\tRoot {}", root.display());
    }

    let report = run_backup(paths, &valid)?;
    tracing::info!(
        "Backed up {} of {} roots to {}",
        report.copied_roots.len(),
        valid.len(),
        report.backup_dir.display()
    );
    println!("Backup created:\n\t{}", report.backup_dir.display());
    Ok(Some(report.backup_dir))
}
