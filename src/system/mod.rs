pub mod collector;
pub mod counters;
pub mod error;
pub mod history;
pub mod platform;
pub mod process;
pub mod scheduler;
pub mod snapshot;
pub mod usage;
