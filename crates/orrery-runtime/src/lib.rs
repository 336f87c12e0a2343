//! Orrery Runtime - the loop that owns the scene
//!
//! This crate wires transport to scene under one rule: a single
//! consumer task drains a FIFO work queue, and only that task touches
//! `SceneState` or the renderer. Commands and transport events are all
//! enqueued as `WorkUnit`s, so ordering is the queue's ordering.
//!
//! - `SceneWorker` / `Pipeline`: the queue and its one consumer
//! - `Orchestrator`: connect/stop/scale commands and the phase machine
//! - `Notifier`: how connection notices reach the user

pub mod work;
pub mod notify;
pub mod orchestrator;

pub use work::*;
pub use notify::*;
pub use orchestrator::*;
