//! Orrery Scene - proxy map, styling, and eviction
//!
//! This crate keeps the client's picture of the feed:
//! - `ProxyRenderer`: the seam a host implements to draw proxies
//! - `StylePlan`: optional refinements probed once per renderer
//! - `SceneState`: id-to-proxy map, anchored origin, scale, TTL sweep
//!
//! Everything here is synchronous and single-owner; the runtime crate
//! provides the one loop that is allowed to touch it.

pub mod render;
pub mod proxy;
pub mod state;

pub use render::*;
pub use proxy::*;
pub use state::*;
