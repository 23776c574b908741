use std::fmt::Write;

use crate::format::{format_bytes, format_ratio, truncate_unicode};
use crate::system::snapshot::SystemSnapshot;

const NAME_WIDTH: usize = 32;

pub fn cpu_label(snapshot: &SystemSnapshot) -> String {
    match &snapshot.cpu {
        Some(cpu) => format!("CPU Usage: {}", format_ratio(cpu.ratio)),
        None => "CPU Usage: unavailable".to_string(),
    }
}

pub fn memory_label(snapshot: &SystemSnapshot) -> String {
    match &snapshot.memory {
        Some(mem) => format!(
            "Memory: {} Used / {} Free",
            format_bytes(mem.reading.used()),
            format_bytes(mem.reading.free)
        ),
        None => "Memory: unavailable".to_string(),
    }
}

pub fn disk_label(snapshot: &SystemSnapshot) -> String {
    match &snapshot.disk {
        Some(disk) => format!(
            "Disk: {} Used / {} Free",
            format_bytes(disk.reading.used),
            format_bytes(disk.reading.free)
        ),
        None => "Disk: unavailable".to_string(),
    }
}

/// Plain-text report: the three readings followed by the top `top` rows of
/// the ranked process table.
pub fn render_text(snapshot: &SystemSnapshot, top: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", cpu_label(snapshot));
    let _ = writeln!(out, "{}", memory_label(snapshot));
    let _ = writeln!(out, "{}", disk_label(snapshot));
    let _ = writeln!(out, "{:>7}  {:>7}  NAME", "PID", "CPU%");
    for process in snapshot.processes.iter().take(top) {
        let _ = writeln!(
            out,
            "{:>7}  {:>7.2}  {}",
            process.pid,
            process.cpu_percent,
            truncate_unicode(&process.name, NAME_WIDTH)
        );
    }
    let _ = write!(
        out,
        "({} ranked, {} skipped)",
        snapshot.processes.len(),
        snapshot.skipped_processes
    );
    out
}
