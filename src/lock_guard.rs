//! Lock Guard
//!
//! Advisory check run before reading a freshly written upload. Every process
//! holding an open handle on the file costs one fixed wait; the guard never
//! loops until the handle is released.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LockGuard {
    wait: Duration,
}

impl LockGuard {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Wait once per process that holds `path` open. Returns the wait notices
    /// that should be shown to the user.
    pub async fn wait_for_release(&self, path: &Path) -> Vec<String> {
        let target = path.to_path_buf();
        let holders = match tokio::task::spawn_blocking(move || find_holders(&target)).await {
            Ok(pids) => pids,
            Err(e) => {
                warn!(error = %e, "Lock scan task failed");
                Vec::new()
            }
        };

        let mut notices = Vec::with_capacity(holders.len());
        for pid in holders {
            let message = format!(
                "File {} is locked by process {}, waiting...",
                path.display(),
                pid
            );
            debug!(pid, path = %path.display(), "Upload held open by another process");
            notices.push(message);
            tokio::time::sleep(self.wait).await;
        }
        notices
    }
}

/// Pids of processes with an open handle whose path contains `target`.
/// Processes that vanish or deny access are skipped.
#[cfg(target_os = "linux")]
pub fn find_holders(target: &Path) -> Vec<u32> {
    let needle = target.to_string_lossy().into_owned();
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };

    let mut pids: Vec<u32> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .filter(|pid| holds_open(*pid, &needle))
        .collect();
    pids.sort_unstable();
    pids
}

#[cfg(target_os = "linux")]
fn holds_open(pid: u32, needle: &str) -> bool {
    let Ok(fds) = std::fs::read_dir(format!("/proc/{}/fd", pid)) else {
        return false;
    };

    fds.filter_map(|fd| fd.ok())
        .filter_map(|fd| std::fs::read_link(fd.path()).ok())
        .any(|link| link.to_string_lossy().contains(needle))
}

#[cfg(not(target_os = "linux"))]
pub fn find_holders(_target: &Path) -> Vec<u32> {
    Vec::new()
}
