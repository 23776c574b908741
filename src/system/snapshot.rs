use serde::Serialize;

use super::counters::{CpuCounters, DiskReading, MemoryReading};
use super::history::HistorySet;
use super::process::ProcessSample;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CpuUsage {
    pub counters: CpuCounters,
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemoryUsage {
    pub reading: MemoryReading,
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiskUsage {
    pub reading: DiskReading,
    pub ratio: f64,
}

/// Everything one sampling pass produced. Metrics that failed this tick are
/// `None`, and their history series did not advance.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub tick: u64,
    pub cpu: Option<CpuUsage>,
    pub memory: Option<MemoryUsage>,
    pub disk: Option<DiskUsage>,
    pub history: HistorySet,
    pub processes: Vec<ProcessSample>,
    pub skipped_processes: usize,
}
