//! Background Tasks Module
//!
//! # Tasks
//! - Cache sweep: evicts expired cache records at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
