use std::ffi::CString;
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::HostCounters;
use crate::system::counters::{DiskReading, MemoryReading};
use crate::system::error::{Result, SampleError};

pub struct Platform;

impl HostCounters for Platform {
    fn memory() -> Result<MemoryReading> {
        let mut info = MaybeUninit::<libc::sysinfo>::zeroed();
        // SAFETY: sysinfo only writes into the provided struct
        let rc = unsafe { libc::sysinfo(info.as_mut_ptr()) };
        if rc != 0 {
            return Err(SampleError::io("sysinfo", io::Error::last_os_error()));
        }
        // SAFETY: rc == 0 means the kernel filled the struct
        let info = unsafe { info.assume_init() };
        let unit = u64::from(info.mem_unit.max(1));
        Ok(MemoryReading {
            total: (info.totalram as u64).saturating_mul(unit),
            free: (info.freeram as u64).saturating_mul(unit),
        })
    }

    fn disk(mount_path: &Path) -> Result<DiskReading> {
        let source_name = format!("statvfs({})", mount_path.display());
        let c_path = CString::new(mount_path.as_os_str().as_bytes()).map_err(|_| {
            SampleError::io(
                source_name.clone(),
                io::Error::new(io::ErrorKind::InvalidInput, "path contains a NUL byte"),
            )
        })?;

        let mut stat = MaybeUninit::<libc::statvfs>::zeroed();
        // SAFETY: c_path is NUL-terminated and stat points at writable memory
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if rc != 0 {
            return Err(SampleError::io(source_name, io::Error::last_os_error()));
        }
        // SAFETY: rc == 0 means statvfs filled the struct
        let stat = unsafe { stat.assume_init() };
        Ok(DiskReading::from_blocks(
            stat.f_blocks as u64,
            stat.f_bfree as u64,
            stat.f_frsize as u64,
        ))
    }

    fn ticks_per_second() -> Result<u64> {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if hz <= 0 {
            return Err(SampleError::io(
                "sysconf(_SC_CLK_TCK)",
                io::Error::last_os_error(),
            ));
        }
        Ok(hz as u64)
    }
}
