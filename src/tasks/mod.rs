//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Rate limit sweep: forgets client identities idle for two windows

mod sweep;

pub use sweep::spawn_sweep_task;
