//! Orrery Core - Fundamental types for the particle feed client
//!
//! This crate defines the core types used throughout the orrery client:
//! - Identifiers (PointId, ProxyHandle, WorldHandle)
//! - Host time (Tick) and vector math (Vec3)
//! - Feed packets and particle kinds
//! - Distance tiers, style palette, and capability flags
//! - Error taxonomy

pub mod id;
pub mod time;
pub mod math;
pub mod packet;
pub mod class;
pub mod error;

pub use id::*;
pub use time::*;
pub use math::*;
pub use packet::*;
pub use class::*;
pub use error::*;
