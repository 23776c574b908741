use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;

use super::error::{Result, SampleError};

/// Aggregate CPU tick counters from the first line of `/proc/stat`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
}

impl CpuCounters {
    pub fn active(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
    }

    pub fn total(&self) -> u64 {
        self.active().saturating_add(self.idle)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryReading {
    pub total: u64,
    pub free: u64,
}

impl MemoryReading {
    pub fn used(&self) -> u64 {
        self.total.saturating_sub(self.free)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiskReading {
    pub total: u64,
    pub free: u64,
    pub used: u64,
}

impl DiskReading {
    pub fn from_blocks(blocks: u64, free_blocks: u64, fragment_size: u64) -> Self {
        let total = blocks.saturating_mul(fragment_size);
        let free = free_blocks.saturating_mul(fragment_size);
        DiskReading {
            total,
            free,
            used: total.saturating_sub(free),
        }
    }
}

/// The parts of `/proc/<pid>/stat` needed for CPU accounting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessStat {
    pub pid: u32,
    pub name: String,
    /// utime + stime + cutime + cstime, in scheduler ticks.
    pub active_ticks: u64,
    /// Start time in scheduler ticks since boot.
    pub start_ticks: u64,
}

// Field positions counted from the state field that follows the comm.
const UTIME_FIELD: usize = 11;
const STIME_FIELD: usize = 12;
const CUTIME_FIELD: usize = 13;
const CSTIME_FIELD: usize = 14;
const STARTTIME_FIELD: usize = 19;

pub fn parse_cpu_counters(contents: &str) -> Result<CpuCounters> {
    const SOURCE: &str = "cpu stat record";

    let line = contents
        .lines()
        .next()
        .ok_or_else(|| SampleError::parse(SOURCE, "empty file"))?;
    let mut fields = line.split_whitespace();
    if fields.next() != Some("cpu") {
        return Err(SampleError::parse(SOURCE, "missing aggregate `cpu` line"));
    }

    let mut values = [0u64; 4];
    for (i, slot) in values.iter_mut().enumerate() {
        let raw = fields.next().ok_or_else(|| {
            SampleError::parse(SOURCE, format!("expected 4 tick fields, got {i}"))
        })?;
        *slot = raw
            .parse()
            .map_err(|_| SampleError::parse(SOURCE, format!("invalid tick count `{raw}`")))?;
    }

    Ok(CpuCounters {
        user: values[0],
        nice: values[1],
        system: values[2],
        idle: values[3],
    })
}

pub fn parse_uptime(contents: &str) -> Result<f64> {
    let raw = contents
        .split_whitespace()
        .next()
        .ok_or_else(|| SampleError::parse("uptime", "empty file"))?;
    let secs: f64 = raw
        .parse()
        .map_err(|_| SampleError::parse("uptime", format!("invalid seconds `{raw}`")))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(SampleError::parse("uptime", format!("out of range: {secs}")));
    }
    Ok(secs)
}

pub fn parse_process_stat(pid: u32, contents: &str) -> Result<ProcessStat> {
    let source = || format!("stat record of pid {pid}");

    // comm may contain spaces and parens, so anchor on the last ')'
    let open = contents
        .find('(')
        .ok_or_else(|| SampleError::parse(source(), "no opening paren"))?;
    let close = contents
        .rfind(')')
        .filter(|&close| close > open)
        .ok_or_else(|| SampleError::parse(source(), "no closing paren"))?;

    let name = contents[open + 1..close].to_string();
    let fields: Vec<&str> = contents[close + 1..].split_whitespace().collect();
    if fields.len() <= STARTTIME_FIELD {
        return Err(SampleError::parse(
            source(),
            format!(
                "expected at least {} fields after comm, got {}",
                STARTTIME_FIELD + 1,
                fields.len()
            ),
        ));
    }

    let unsigned = |idx: usize| -> Result<u64> {
        fields[idx].parse::<u64>().map_err(|_| {
            SampleError::parse(source(), format!("field {idx} is not a tick count"))
        })
    };
    // cutime/cstime are signed in the kernel ABI
    let signed = |idx: usize| -> Result<u64> {
        fields[idx]
            .parse::<i64>()
            .map(|v| v.max(0) as u64)
            .map_err(|_| SampleError::parse(source(), format!("field {idx} is not a tick count")))
    };

    let active_ticks = unsigned(UTIME_FIELD)?
        .saturating_add(unsigned(STIME_FIELD)?)
        .saturating_add(signed(CUTIME_FIELD)?)
        .saturating_add(signed(CSTIME_FIELD)?);

    Ok(ProcessStat {
        pid,
        name,
        active_ticks,
        start_ticks: unsigned(STARTTIME_FIELD)?,
    })
}

pub fn read_cpu_counters(proc_root: &Path) -> Result<CpuCounters> {
    let path = proc_root.join("stat");
    let contents =
        std::fs::read_to_string(&path).map_err(|e| SampleError::io(path.display().to_string(), e))?;
    parse_cpu_counters(&contents)
}

pub fn read_system_uptime(proc_root: &Path) -> Result<f64> {
    let path = proc_root.join("uptime");
    let contents =
        std::fs::read_to_string(&path).map_err(|e| SampleError::io(path.display().to_string(), e))?;
    parse_uptime(&contents)
}

pub fn read_process_counters(proc_root: &Path, pid: u32) -> Result<ProcessStat> {
    let path = proc_root.join(pid.to_string()).join("stat");
    let contents = std::fs::read_to_string(&path).map_err(|e| {
        if is_process_gone(&e) {
            SampleError::ProcessGone { pid }
        } else {
            SampleError::io(path.display().to_string(), e)
        }
    })?;
    parse_process_stat(pid, &contents)
}

fn is_process_gone(err: &std::io::Error) -> bool {
    // ESRCH shows up when the task exits while its stat file is being read
    const ESRCH: i32 = 3;
    err.kind() == ErrorKind::NotFound || err.raw_os_error() == Some(ESRCH)
}
