use std::path::Path;

use serde::Serialize;

use super::counters::read_process_counters;
use super::error::{Result, SampleError};
use super::usage::process_cpu_percent;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub cpu_percent: f64,
    pub name: String,
}

/// Result of one pass over the process table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProcessScan {
    /// Sorted by `cpu_percent`, highest first.
    pub ranked: Vec<ProcessSample>,
    /// Pids that were enumerated but could not be sampled.
    pub skipped: usize,
}

pub fn enumerate_process_ids(proc_root: &Path) -> Result<Vec<u32>> {
    let entries = std::fs::read_dir(proc_root)
        .map_err(|e| SampleError::io(proc_root.display().to_string(), e))?;

    let pids = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            if !name.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            name.parse::<u32>().ok().filter(|&pid| pid > 0)
        })
        .collect();
    Ok(pids)
}

pub fn sample_process(
    proc_root: &Path,
    pid: u32,
    uptime_secs: f64,
    ticks_per_second: u64,
) -> Result<ProcessSample> {
    let stat = read_process_counters(proc_root, pid)?;
    let cpu_percent = process_cpu_percent(&stat, uptime_secs, ticks_per_second)?;
    Ok(ProcessSample {
        pid,
        cpu_percent,
        name: stat.name,
    })
}

pub fn sample_all_processes(
    proc_root: &Path,
    uptime_secs: f64,
    ticks_per_second: u64,
) -> Result<ProcessScan> {
    let _span = tracing::debug_span!("process.sample_all").entered();

    let pids = enumerate_process_ids(proc_root)?;
    let mut samples = Vec::with_capacity(pids.len());
    let mut skipped = 0;

    for pid in pids {
        match sample_process(proc_root, pid, uptime_secs, ticks_per_second) {
            Ok(sample) => samples.push(sample),
            Err(err) => {
                skipped += 1;
                if err.is_transient() {
                    tracing::trace!(pid, error = %err, "skipping process");
                } else {
                    tracing::debug!(pid, error = %err, "skipping unreadable process");
                }
            }
        }
    }

    Ok(ProcessScan {
        ranked: rank_processes(samples),
        skipped,
    })
}

/// Sort descending by CPU percentage. Entries that are not a finite,
/// non-negative percentage are dropped before sorting.
pub fn rank_processes(mut samples: Vec<ProcessSample>) -> Vec<ProcessSample> {
    samples.retain(|s| s.cpu_percent.is_finite() && s.cpu_percent >= 0.0);
    samples.sort_unstable_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pid: u32, cpu_percent: f64) -> ProcessSample {
        ProcessSample {
            pid,
            cpu_percent,
            name: format!("proc_{pid}"),
        }
    }

    #[test]
    fn ranks_descending() {
        let ranked = rank_processes(vec![sample(1, 2.0), sample(2, 30.0), sample(3, 7.5)]);
        let pids: Vec<u32> = ranked.iter().map(|s| s.pid).collect();
        assert_eq!(pids, vec![2, 3, 1]);
    }

    #[test]
    fn sentinels_never_enter_the_ranking() {
        let ranked = rank_processes(vec![
            sample(1, -1.0),
            sample(2, f64::NAN),
            sample(3, 4.0),
            sample(4, f64::INFINITY),
            sample(5, 0.0),
        ]);
        let pids: Vec<u32> = ranked.iter().map(|s| s.pid).collect();
        assert_eq!(pids, vec![3, 5]);
    }

    #[test]
    fn empty_input_ranks_to_empty() {
        assert!(rank_processes(Vec::new()).is_empty());
    }

    #[test]
    fn unreadable_root_is_io_unavailable() {
        let root = std::env::temp_dir().join("sysgauge_test_missing_proc_root");
        let err = enumerate_process_ids(&root).unwrap_err();
        assert!(matches!(err, SampleError::IoUnavailable { .. }));
    }
}
