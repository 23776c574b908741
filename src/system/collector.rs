use std::path::PathBuf;

use super::counters::{CpuCounters, read_cpu_counters, read_system_uptime};
use super::error::Result;
use super::history::HistorySet;
use super::platform;
use super::process::{ProcessScan, sample_all_processes};
use super::snapshot::{CpuUsage, DiskUsage, MemoryUsage, SystemSnapshot};
use super::usage::{CpuMode, cpu_ratio, cpu_ratio_delta, disk_ratio, memory_ratio};

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub proc_root: PathBuf,
    pub mount_path: PathBuf,
    pub cpu_mode: CpuMode,
    /// Overrides `sysconf(_SC_CLK_TCK)` when set.
    pub ticks_per_second: Option<u64>,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        CollectorSettings {
            proc_root: PathBuf::from("/proc"),
            mount_path: PathBuf::from("/"),
            cpu_mode: CpuMode::Cumulative,
            ticks_per_second: None,
        }
    }
}

/// Runs sampling passes and owns the history window.
pub struct Collector {
    settings: CollectorSettings,
    ticks_per_second: u64,
    history: HistorySet,
    prev_cpu: Option<CpuCounters>,
    tick: u64,
}

impl Collector {
    pub fn new(settings: CollectorSettings) -> Result<Self> {
        let ticks_per_second = match settings.ticks_per_second {
            Some(tps) => tps,
            None => platform::ticks_per_second()?,
        };
        tracing::debug!(
            proc_root = %settings.proc_root.display(),
            mount_path = %settings.mount_path.display(),
            cpu_mode = settings.cpu_mode.label(),
            ticks_per_second,
            "collector ready"
        );
        Ok(Collector {
            settings,
            ticks_per_second,
            history: HistorySet::default(),
            prev_cpu: None,
            tick: 0,
        })
    }

    pub fn history(&self) -> &HistorySet {
        &self.history
    }

    /// One full sampling pass. Never fails as a whole: each metric that
    /// cannot be read is logged and left out of this tick.
    pub fn sample(&mut self) -> SystemSnapshot {
        let _span = tracing::debug_span!("collector.sample", tick = self.tick + 1).entered();
        self.tick += 1;

        let cpu = self.sample_cpu();
        let memory = self.sample_memory();
        let disk = self.sample_disk();
        let scan = self.sample_processes();

        SystemSnapshot {
            tick: self.tick,
            cpu,
            memory,
            disk,
            history: self.history.clone(),
            processes: scan.ranked,
            skipped_processes: scan.skipped,
        }
    }

    fn sample_cpu(&mut self) -> Option<CpuUsage> {
        let counters = match read_cpu_counters(&self.settings.proc_root) {
            Ok(counters) => counters,
            Err(err) => {
                tracing::warn!(error = %err, "cpu sample skipped");
                return None;
            }
        };

        let prev = self.prev_cpu.replace(counters);
        let ratio = match (self.settings.cpu_mode, prev) {
            (CpuMode::Delta, Some(prev)) => match cpu_ratio_delta(&prev, &counters) {
                Some(ratio) => ratio,
                None => {
                    tracing::debug!("no cpu ticks elapsed since last sample");
                    return None;
                }
            },
            // first delta sample has nothing to diff against
            _ => cpu_ratio(&counters),
        };
        self.history.cpu.push(ratio);
        Some(CpuUsage { counters, ratio })
    }

    fn sample_memory(&mut self) -> Option<MemoryUsage> {
        match platform::read_memory_counters() {
            Ok(reading) => {
                let ratio = memory_ratio(&reading);
                self.history.memory.push(ratio);
                Some(MemoryUsage { reading, ratio })
            }
            Err(err) => {
                tracing::warn!(error = %err, "memory sample skipped");
                None
            }
        }
    }

    fn sample_disk(&mut self) -> Option<DiskUsage> {
        match platform::read_disk_counters(&self.settings.mount_path) {
            Ok(reading) => {
                let ratio = disk_ratio(&reading);
                self.history.disk.push(ratio);
                Some(DiskUsage { reading, ratio })
            }
            Err(err) => {
                tracing::warn!(error = %err, "disk sample skipped");
                None
            }
        }
    }

    fn sample_processes(&self) -> ProcessScan {
        let root = &self.settings.proc_root;
        let uptime = match read_system_uptime(root) {
            Ok(uptime) => uptime,
            Err(err) => {
                tracing::warn!(error = %err, "process scan skipped");
                return ProcessScan::default();
            }
        };

        match sample_all_processes(root, uptime, self.ticks_per_second) {
            Ok(scan) => {
                tracing::debug!(
                    ranked = scan.ranked.len(),
                    skipped = scan.skipped,
                    "process scan complete"
                );
                scan
            }
            Err(err) => {
                tracing::warn!(error = %err, "process scan skipped");
                ProcessScan::default()
            }
        }
    }
}
