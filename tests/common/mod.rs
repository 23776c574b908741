#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A throwaway directory laid out like the parts of `/proc` the sampler reads.
pub struct FakeProc {
    pub dir: TempDir,
}

impl FakeProc {
    pub fn new(cpu_line: &str, uptime_secs: f64) -> Self {
        let dir = tempfile::tempdir().expect("create fake proc root");
        fs::write(dir.path().join("stat"), format!("{cpu_line}\ncpu0 1 2 3 4\n"))
            .expect("write stat");
        fs::write(
            dir.path().join("uptime"),
            format!("{uptime_secs:.2} 1000.00\n"),
        )
        .expect("write uptime");
        // entries the enumerator must ignore
        fs::create_dir(dir.path().join("self")).expect("create self");
        fs::create_dir(dir.path().join("net")).expect("create net");
        fs::write(dir.path().join("1x"), "").expect("write 1x");
        FakeProc { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn set_cpu_line(&self, cpu_line: &str) {
        fs::write(self.root().join("stat"), format!("{cpu_line}\n")).expect("rewrite stat");
    }

    /// Add a process whose stat record reports the given tick counts.
    pub fn add_process(&self, pid: u32, name: &str, utime: u64, stime: u64, start_ticks: u64) {
        self.add_raw_process(pid, &stat_line(pid, name, utime, stime, start_ticks));
    }

    pub fn add_raw_process(&self, pid: u32, contents: &str) {
        let dir = self.root().join(pid.to_string());
        fs::create_dir_all(&dir).expect("create pid dir");
        fs::write(dir.join("stat"), contents).expect("write pid stat");
    }

    /// A pid directory without a stat file, as left behind by an exiting task.
    pub fn add_vanished_process(&self, pid: u32) {
        fs::create_dir_all(self.root().join(pid.to_string())).expect("create pid dir");
    }
}

pub fn stat_line(pid: u32, name: &str, utime: u64, stime: u64, start_ticks: u64) -> String {
    format!(
        "{pid} ({name}) S 1 {pid} {pid} 0 -1 4194560 100 0 0 0 {utime} {stime} 0 0 20 0 1 0 \
         {start_ticks} 1000000 200 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0\n"
    )
}
