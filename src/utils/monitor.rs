#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ScanStats {
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
    pub passes: u64,
}

#[cfg(feature = "cli")]
pub struct ScanMonitor {
    system: System,
    pid: Pid,
    start_time: Instant,
    peak_memory: u64,
    passes: u64,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl ScanMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());

        let pid = sysinfo::get_current_pid().expect("Failed to get current PID");

        // 初始刷新
        system.refresh_all();

        Self {
            system,
            pid,
            start_time: Instant::now(),
            peak_memory: 0,
            passes: 0,
            enabled,
        }
    }

    pub fn record_pass(&mut self) -> Option<ScanStats> {
        self.passes += 1;
        if !self.enabled {
            return None;
        }

        self.system.refresh_all();

        let process = self.system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024; // Convert bytes to MB

        // 更新峰值記憶體
        if memory_mb > self.peak_memory {
            self.peak_memory = memory_mb;
        }

        Some(ScanStats {
            memory_usage_mb: memory_mb,
            peak_memory_mb: self.peak_memory,
            elapsed_time: self.start_time.elapsed(),
            passes: self.passes,
        })
    }

    pub fn log_pass(&mut self, added: usize, deleted: usize, collisions: usize) {
        if let Some(stats) = self.record_pass() {
            tracing::info!(
                "📊 Pass #{} - added: {}, deleted: {}, collisions: {}, Memory: {}MB (peak {}MB), Time: {:?}",
                stats.passes,
                added,
                deleted,
                collisions,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for ScanMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 為非CLI環境提供空實現
#[cfg(not(feature = "cli"))]
pub struct ScanMonitor;

#[cfg(not(feature = "cli"))]
impl ScanMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_pass(&mut self, _added: usize, _deleted: usize, _collisions: usize) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
