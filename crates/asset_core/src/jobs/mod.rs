//! Background jobs on a single-threaded virtual clock
//!
//! Two logical timelines share one [`TaskScheduler`]: the cosmetic progress
//! ticker and the real completion timer of a compression job. Both carry the
//! job's [`Generation`], and only events of the live generation may touch
//! state.

mod compression_job;
mod scheduler;

pub use compression_job::{CompressionSimulator, Generation, JobCompletion, JobEvent};
pub use scheduler::{Fired, TaskScheduler, TimerId};
