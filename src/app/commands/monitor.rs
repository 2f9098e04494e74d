use crate::core::index::ResourceIndex;
use crate::utils::error::Result;
use crate::utils::monitor::ScanMonitor;
use std::path::Path;
use std::time::Duration;

/// One-shot collision report for the root.
pub fn run_collisions(root: &Path) -> Result<String> {
    let index = ResourceIndex::provide(root)?;
    let collisions = index.collisions();

    if collisions.is_empty() {
        return Ok(format!("No collisions among {} resources.", index.len()));
    }

    let mut pairs: Vec<_> = collisions.iter().collect();
    pairs.sort_by_key(|(id, _)| **id);

    let mut out = format!("Current collisions ({} ids):\n", pairs.len());
    for (id, count) in pairs {
        out.push_str(&format!("\t{}: {} paths\n", id, count));
    }
    Ok(out)
}

/// Rescan the root forever, printing every change. Only returns on error.
pub async fn run_monitor(root: &Path, interval_ms: u64) -> Result<()> {
    let mut index = ResourceIndex::provide(root)?;
    let mut monitor = ScanMonitor::new(true);
    println!(
        "Watching {} ({} resources, every {}ms)",
        root.display(),
        index.len(),
        interval_ms
    );

    loop {
        tokio::time::sleep(Duration::from_millis(interval_ms)).await;

        match index.update_all() {
            Ok(update) => {
                if !update.is_empty() {
                    index.store()?;
                    for (path, id) in &update.deleted {
                        println!("Deleted: {} ({})", path.display(), id);
                    }
                    for (path, id) in &update.added {
                        println!("Added: {} ({})", path.display(), id);
                    }
                }
                monitor.log_pass(
                    update.added.len(),
                    update.deleted.len(),
                    index.collisions().len(),
                );
            }
            // 暫時性掃描錯誤不該終止監看
            Err(e) => tracing::warn!("Scan failed, will retry: {}", e),
        }
    }
}
