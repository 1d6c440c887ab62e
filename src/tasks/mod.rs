//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: evicts expired cache entries at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
