//! Renderer seam
//!
//! The scene manager drives visual proxies through this trait and
//! nothing else; the host decides what a proxy physically is (a block
//! display, a particle cluster, a glyph on a terminal). Optional
//! refinements are probed exactly once when a renderer is attached;
//! the update path never asks again.

use orrery_core::{
    Capability, OrreryError, OrreryResult, ProxyHandle, StyleDescriptor, Tick, Tint, Vec3,
    WorldHandle,
};

/// Which physical representation the host should build
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Solid per-point bodies, restyled in place
    #[default]
    Block,
    /// Clustered puffs re-emitted every update
    ParticleCloud,
    /// Fixed bodies; tier shows through glow tint only
    GlowOnly,
}

impl RenderMode {
    /// Parse a user-facing mode name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "block" => Some(RenderMode::Block),
            "cloud" => Some(RenderMode::ParticleCloud),
            "glow" => Some(RenderMode::GlowOnly),
            _ => None,
        }
    }
}

/// Host-side proxy driver
///
/// `register`, `move_to`, `unregister`, `current_tick`, and `supports`
/// are the required surface. `restyle`, `set_glow`, and `emit_trail`
/// are refinements a host may lack; the defaults reject or ignore them
/// and `supports` declares which ones are real.
pub trait ProxyRenderer {
    /// Create one proxy; the returned handle is opaque to the scene
    fn register(
        &mut self,
        world: WorldHandle,
        style: StyleDescriptor,
        position: Vec3,
    ) -> OrreryResult<ProxyHandle>;

    /// Reposition an existing proxy (absolute world coordinates)
    fn move_to(&mut self, handle: ProxyHandle, position: Vec3) -> OrreryResult<()>;

    /// Remove a proxy; must tolerate a handle that is already gone
    fn unregister(&mut self, handle: ProxyHandle);

    /// Host clock, in whole ticks
    fn current_tick(&self, world: WorldHandle) -> Tick;

    /// Does this host offer the given refinement?
    fn supports(&self, capability: Capability) -> bool;

    /// Swap a proxy's style (`Capability::Restyle`)
    fn restyle(&mut self, _handle: ProxyHandle, _style: StyleDescriptor) -> OrreryResult<()> {
        Err(OrreryError::CapabilityUnavailable(Capability::Restyle))
    }

    /// Tint a proxy's glow (`Capability::GlowTint`)
    fn set_glow(&mut self, _handle: ProxyHandle, _tint: Tint) -> OrreryResult<()> {
        Err(OrreryError::CapabilityUnavailable(Capability::GlowTint))
    }

    /// Emit a transient orbit highlight (`Capability::Trail`)
    fn emit_trail(&mut self, _world: WorldHandle, _position: Vec3) {}
}

/// Style strategy resolved once per attached renderer
///
/// The default is everything off, which degrades to "last known style":
/// proxies keep whatever they were created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StylePlan {
    pub restyle: bool,
    pub glow: bool,
    pub trail: bool,
}

impl StylePlan {
    /// Ask the renderer once; the answer holds for its lifetime
    pub fn probe(renderer: &dyn ProxyRenderer) -> Self {
        StylePlan {
            restyle: renderer.supports(Capability::Restyle),
            glow: renderer.supports(Capability::GlowTint),
            trail: renderer.supports(Capability::Trail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_names() {
        assert_eq!(RenderMode::from_name("block"), Some(RenderMode::Block));
        assert_eq!(RenderMode::from_name("cloud"), Some(RenderMode::ParticleCloud));
        assert_eq!(RenderMode::from_name("glow"), Some(RenderMode::GlowOnly));
        assert_eq!(RenderMode::from_name("neon"), None);
    }
}
