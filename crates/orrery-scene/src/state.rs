//! Scene state - the proxy map and its operations
//!
//! `SceneState` owns everything the feed paints: the anchored origin,
//! the display scale, and the id-to-proxy map. It is deliberately not
//! thread-safe; exactly one processing loop owns it and calls into the
//! renderer, so every operation here is plain synchronous code.
//!
//! Update order for each packet: expire stale proxies, create the
//! proxy if the id is new, move it, restyle it only if its tier style
//! actually changed, then stamp its last-seen tick.

use std::collections::HashMap;

use orrery_core::{classify, style_for, PointId, StylePalette, StylePolicy, Vec3, WorldHandle};
use orrery_core::{Packet, Tick};

use crate::{ProxyRenderer, StylePlan, VisualProxy};

/// Proxies unseen for more than this many ticks lose their slot
pub const DEFAULT_TTL_TICKS: u64 = 40;

/// Nudge applied on x/z so proxies sit on cell centers
pub const CENTER_NUDGE: Vec3 = Vec3 {
    x: 0.5,
    y: 0.0,
    z: 0.5,
};

/// Tunables for one scene
#[derive(Clone, Copy, Debug)]
pub struct SceneConfig {
    pub ttl_ticks: u64,
    pub palette: StylePalette,
    pub policy: StylePolicy,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            ttl_ticks: DEFAULT_TTL_TICKS,
            palette: StylePalette::default(),
            policy: StylePolicy::default(),
        }
    }
}

/// Counters for observers; never consulted by the update path
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneStats {
    pub created: u64,
    pub updated: u64,
    pub restyled: u64,
    pub evicted: u64,
    /// Updates dropped because no origin/world was anchored
    pub ignored: u64,
    pub clears: u64,
}

/// The client's picture of the feed
#[derive(Debug)]
pub struct SceneState {
    origin: Option<Vec3>,
    world: Option<WorldHandle>,
    scale: f64,
    proxies: HashMap<PointId, VisualProxy>,
    plan: StylePlan,
    config: SceneConfig,
    stats: SceneStats,
}

impl Default for SceneState {
    fn default() -> Self {
        SceneState::new(SceneConfig::default())
    }
}

impl SceneState {
    pub fn new(config: SceneConfig) -> Self {
        SceneState {
            origin: None,
            world: None,
            scale: 1.0,
            proxies: HashMap::new(),
            plan: StylePlan::default(),
            config,
            stats: SceneStats::default(),
        }
    }

    /// Install the style strategy probed from the attached renderer
    pub fn attach_plan(&mut self, plan: StylePlan) {
        self.plan = plan;
    }

    /// Anchor the scene: all later positions are relative to `origin`
    ///
    /// Existing proxies keep their handles and positions until their
    /// next packet; callers wanting a visual reset clear first.
    pub fn set_origin(&mut self, world: WorldHandle, origin: Vec3) {
        tracing::debug!("anchor {:?} at {:?}", world, origin);
        self.world = Some(world);
        self.origin = Some(origin);
    }

    /// Change the display scale for subsequent updates
    ///
    /// Non-positive (or non-finite) factors are ignored.
    pub fn set_scale(&mut self, factor: f64) {
        if !(factor > 0.0) || !factor.is_finite() {
            tracing::debug!("ignoring scale {}", factor);
            return;
        }
        self.scale = factor;
    }

    /// Apply one packet
    ///
    /// Without an anchored origin and world this is a silent no-op.
    pub fn update(&mut self, renderer: &mut dyn ProxyRenderer, packet: &Packet) {
        let (world, origin) = match (self.world, self.origin) {
            (Some(world), Some(origin)) => (world, origin),
            _ => {
                self.stats.ignored += 1;
                tracing::debug!("no anchor, dropping {:?}", packet.id);
                return;
            }
        };

        let now = renderer.current_tick(world);
        self.sweep(renderer, now);

        let scaled = packet.position * self.scale;
        let classification = classify(scaled);
        let style = style_for(
            &self.config.palette,
            self.config.policy,
            packet.kind,
            classification.tier,
        );
        let absolute = origin + scaled + CENTER_NUDGE;

        if let Some(proxy) = self.proxies.get_mut(&packet.id) {
            if let Err(e) = renderer.move_to(proxy.handle, absolute) {
                tracing::warn!("move failed for {:?}: {}", packet.id, e);
                let handle = proxy.handle;
                renderer.unregister(handle);
                self.proxies.remove(&packet.id);
                return;
            }
            if style != proxy.style {
                // remember the style only if some channel accepted it,
                // otherwise the proxy stays on its last known style
                let mut applied = false;
                if self.plan.restyle {
                    match renderer.restyle(proxy.handle, style) {
                        Ok(()) => {
                            applied = true;
                            self.stats.restyled += 1;
                        }
                        Err(e) => tracing::warn!("restyle failed for {:?}: {}", packet.id, e),
                    }
                }
                if self.plan.glow {
                    match renderer.set_glow(proxy.handle, style.tint()) {
                        Ok(()) => applied = true,
                        Err(e) => tracing::warn!("glow failed for {:?}: {}", packet.id, e),
                    }
                }
                if applied {
                    proxy.style = style;
                }
            }
            proxy.last_seen = now;
            self.stats.updated += 1;
        } else {
            let handle = match renderer.register(world, style, absolute) {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!("register failed for {:?}: {}", packet.id, e);
                    return;
                }
            };
            if self.plan.glow {
                if let Err(e) = renderer.set_glow(handle, style.tint()) {
                    tracing::warn!("glow failed for {:?}: {}", packet.id, e);
                }
            }
            self.proxies.insert(
                packet.id,
                VisualProxy {
                    id: packet.id,
                    handle,
                    style,
                    last_seen: now,
                },
            );
            self.stats.created += 1;
        }

        // orbit highlight, phase-staggered so the swarm does not pulse in sync
        if self.plan.trail && now.as_u64() % 4 == packet.id.as_i64().rem_euclid(4) as u64 {
            renderer.emit_trail(world, absolute);
        }
    }

    /// Remove every proxy and unset the world; safe to repeat
    pub fn clear(&mut self, renderer: &mut dyn ProxyRenderer) {
        for (_, proxy) in self.proxies.drain() {
            renderer.unregister(proxy.handle);
        }
        self.world = None;
        self.stats.clears += 1;
        tracing::debug!("scene cleared");
    }

    fn sweep(&mut self, renderer: &mut dyn ProxyRenderer, now: Tick) {
        let ttl = self.config.ttl_ticks;
        let expired: Vec<PointId> = self
            .proxies
            .iter()
            .filter(|(_, proxy)| now.age_since(proxy.last_seen) > ttl)
            .map(|(id, _)| *id)
            .collect();

        for id in expired {
            if let Some(proxy) = self.proxies.remove(&id) {
                renderer.unregister(proxy.handle);
                self.stats.evicted += 1;
                tracing::debug!(
                    "evicted {:?} after {} ticks",
                    id,
                    now.age_since(proxy.last_seen)
                );
            }
        }
    }

    #[inline]
    pub fn origin(&self) -> Option<Vec3> {
        self.origin
    }

    #[inline]
    pub fn world(&self) -> Option<WorldHandle> {
        self.world
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.proxies.contains_key(&id)
    }

    pub fn get(&self, id: PointId) -> Option<&VisualProxy> {
        self.proxies.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PointId, &VisualProxy)> {
        self.proxies.iter()
    }

    #[inline]
    pub fn stats(&self) -> SceneStats {
        self.stats
    }
}
