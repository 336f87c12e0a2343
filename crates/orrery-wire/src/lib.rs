//! Orrery Wire Protocol - JSON text frames
//!
//! This crate implements the feed's frame format:
//! - One WebSocket text frame = one JSON array of point objects
//! - `{"id": 3, "t": "e", "x": 1.0, "y": 2.0, "z": 3.0}` per point
//! - Whole-frame decoding: any bad element drops the entire frame

pub mod frame;

pub use frame::*;
