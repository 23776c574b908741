use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SampleError>;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("{source_name} unavailable: {source}")]
    IoUnavailable {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// The process exited between enumeration and the detailed read.
    #[error("process {pid} is gone")]
    ProcessGone { pid: u32 },

    #[error("process {pid} has non-positive age ({age_secs:.3}s)")]
    NonPositiveAge { pid: u32, age_secs: f64 },
}

impl SampleError {
    pub fn io(source_name: impl Into<String>, source: io::Error) -> Self {
        SampleError::IoUnavailable {
            source_name: source_name.into(),
            source,
        }
    }

    pub fn parse(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SampleError::Parse {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Errors that are expected during a process scan and not worth reporting.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SampleError::ProcessGone { .. } | SampleError::NonPositiveAge { .. }
        )
    }
}
