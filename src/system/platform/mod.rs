use std::path::Path;

use super::counters::{DiskReading, MemoryReading};
use super::error::Result;

/// Host queries that go through system calls rather than `/proc` text.
pub trait HostCounters {
    fn memory() -> Result<MemoryReading>;
    fn disk(mount_path: &Path) -> Result<DiskReading>;
    fn ticks_per_second() -> Result<u64>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use unsupported as platform_impl;

pub fn read_memory_counters() -> Result<MemoryReading> {
    platform_impl::Platform::memory()
}

pub fn read_disk_counters(mount_path: &Path) -> Result<DiskReading> {
    platform_impl::Platform::disk(mount_path)
}

pub fn ticks_per_second() -> Result<u64> {
    platform_impl::Platform::ticks_per_second()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic() {
        let _ = read_memory_counters();
        let _ = read_disk_counters(Path::new("/"));
        let _ = ticks_per_second();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_host_reports_sane_values() {
        let mem = read_memory_counters().unwrap();
        assert!(mem.total > 0);
        assert!(mem.free <= mem.total);

        let disk = read_disk_counters(Path::new("/")).unwrap();
        assert!(disk.free <= disk.total);
        assert_eq!(disk.used, disk.total - disk.free);

        assert!(ticks_per_second().unwrap() > 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn missing_mount_path_is_io_unavailable() {
        let err = read_disk_counters(Path::new("/definitely/not/a/mount/point")).unwrap_err();
        assert!(matches!(
            err,
            crate::system::error::SampleError::IoUnavailable { .. }
        ));
    }
}
