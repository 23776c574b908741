use super::counters::{CpuCounters, DiskReading, MemoryReading, ProcessStat};
use super::error::{Result, SampleError};

/// How the host CPU ratio is derived from `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpuMode {
    /// Busy share of every tick since boot.
    #[default]
    Cumulative,
    /// Busy share of the ticks elapsed since the previous sample.
    Delta,
}

impl CpuMode {
    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "delta" => CpuMode::Delta,
            _ => CpuMode::Cumulative,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CpuMode::Cumulative => "cumulative",
            CpuMode::Delta => "delta",
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}

pub fn cpu_ratio(counters: &CpuCounters) -> f64 {
    ratio(counters.active(), counters.total())
}

/// CPU ratio over the interval between two samples. `None` when no ticks
/// elapsed or the counters went backwards.
pub fn cpu_ratio_delta(prev: &CpuCounters, current: &CpuCounters) -> Option<f64> {
    let active = current.active().checked_sub(prev.active())?;
    let total = current.total().checked_sub(prev.total())?;
    if total == 0 {
        return None;
    }
    Some(ratio(active, total))
}

pub fn memory_ratio(reading: &MemoryReading) -> f64 {
    ratio(reading.used(), reading.total)
}

pub fn disk_ratio(reading: &DiskReading) -> f64 {
    ratio(reading.total.saturating_sub(reading.free), reading.total)
}

/// Lifetime-average CPU percentage of a process: accumulated CPU seconds
/// divided by seconds since the process started.
pub fn process_cpu_percent(
    stat: &ProcessStat,
    uptime_secs: f64,
    ticks_per_second: u64,
) -> Result<f64> {
    if ticks_per_second == 0 {
        return Err(SampleError::parse("ticks per second", "zero"));
    }
    let tps = ticks_per_second as f64;
    let age_secs = uptime_secs - stat.start_ticks as f64 / tps;
    if !age_secs.is_finite() || age_secs <= 0.0 {
        return Err(SampleError::NonPositiveAge {
            pid: stat.pid,
            age_secs,
        });
    }

    let cpu_secs = stat.active_ticks as f64 / tps;
    Ok(cpu_secs / age_secs * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(active_ticks: u64, start_ticks: u64) -> ProcessStat {
        ProcessStat {
            pid: 42,
            name: "worker".into(),
            active_ticks,
            start_ticks,
        }
    }

    #[test]
    fn cpu_ratio_matches_worked_example() {
        let counters = CpuCounters {
            user: 100,
            nice: 0,
            system: 50,
            idle: 850,
        };
        assert!((cpu_ratio(&counters) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn all_zero_cpu_counters_yield_zero() {
        assert_eq!(cpu_ratio(&CpuCounters::default()), 0.0);
    }

    #[test]
    fn delta_ratio_uses_interval_only() {
        let prev = CpuCounters {
            user: 1000,
            nice: 0,
            system: 0,
            idle: 9000,
        };
        let current = CpuCounters {
            user: 1080,
            nice: 0,
            system: 20,
            idle: 9100,
        };
        let r = cpu_ratio_delta(&prev, &current).unwrap();
        assert!((r - 0.5).abs() < 1e-12);
        assert_eq!(cpu_ratio_delta(&current, &current), None);
        assert_eq!(cpu_ratio_delta(&current, &prev), None);
    }

    #[test]
    fn memory_ratio_matches_worked_example() {
        let mem = MemoryReading {
            total: 8_000_000_000,
            free: 2_000_000_000,
        };
        assert_eq!(mem.used(), 6_000_000_000);
        assert!((memory_ratio(&mem) - 0.75).abs() < 1e-12);
        assert_eq!(memory_ratio(&MemoryReading::default()), 0.0);
    }

    #[test]
    fn disk_ratio_of_half_full_disk() {
        let disk = DiskReading::from_blocks(100, 50, 4096);
        assert!((disk_ratio(&disk) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn process_cpu_percent_matches_worked_example() {
        let pct = process_cpu_percent(&stat(400, 1000), 50.0, 100).unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn process_started_now_or_in_future_is_rejected() {
        let err = process_cpu_percent(&stat(10, 5000), 50.0, 100).unwrap_err();
        assert!(matches!(err, SampleError::NonPositiveAge { pid: 42, .. }));
        let err = process_cpu_percent(&stat(10, 6000), 50.0, 100).unwrap_err();
        assert!(matches!(err, SampleError::NonPositiveAge { .. }));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        assert!(process_cpu_percent(&stat(10, 0), 50.0, 0).is_err());
    }

    #[test]
    fn cpu_mode_from_config() {
        assert_eq!(CpuMode::from_str_config("DELTA"), CpuMode::Delta);
        assert_eq!(CpuMode::from_str_config("cumulative"), CpuMode::Cumulative);
        assert_eq!(CpuMode::from_str_config("garbage"), CpuMode::Cumulative);
    }
}
