//! Orrery Test Harness - fixtures for exercising the full feed path
//!
//! This crate provides:
//! - A recording renderer that logs every proxy operation
//! - A recording notifier for connection notices
//! - A feed rig standing up broadcaster, transport, queue, and scene
//!   together on an ephemeral port

pub mod recorder;
pub mod rig;

pub use recorder::*;
pub use rig::*;
