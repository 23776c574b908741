use std::io;
use std::path::Path;

use super::HostCounters;
use crate::system::counters::{DiskReading, MemoryReading};
use crate::system::error::{Result, SampleError};

pub struct Platform;

fn unsupported(source_name: &str) -> SampleError {
    SampleError::io(
        source_name,
        io::Error::new(io::ErrorKind::Unsupported, "only Linux hosts are supported"),
    )
}

impl HostCounters for Platform {
    fn memory() -> Result<MemoryReading> {
        Err(unsupported("sysinfo"))
    }

    fn disk(mount_path: &Path) -> Result<DiskReading> {
        Err(unsupported(&format!("statvfs({})", mount_path.display())))
    }

    fn ticks_per_second() -> Result<u64> {
        Err(unsupported("sysconf(_SC_CLK_TCK)"))
    }
}
