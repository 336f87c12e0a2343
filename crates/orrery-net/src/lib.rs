//! Orrery Net - WebSocket transport for the particle feed
//!
//! This crate moves frames between a feed and the client:
//! - Address resolution with scheme/host/port defaults
//! - `FeedClient`: one connection, events over a channel, no reconnect
//! - `FeedBroadcaster`: the serving half, fan-out to every client

pub mod addr;
pub mod client;
pub mod broadcast;

pub use addr::*;
pub use client::*;
pub use broadcast::*;
