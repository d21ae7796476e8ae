//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired pastes from the in-memory store

mod cleanup;

pub use cleanup::spawn_cleanup_task;
