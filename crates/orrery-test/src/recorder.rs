//! Recording doubles for the renderer and notifier seams
//!
//! Both are cheap clones over shared state: the client stack owns one
//! clone, the test keeps another and reads the log. The renderer clock
//! is manual, so TTL behavior is steered from the test.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use orrery_core::{
    Capability, OrreryError, OrreryResult, ProxyHandle, StyleDescriptor, Tick, Tint, Vec3,
    WorldHandle,
};
use orrery_runtime::{Notice, Notifier};
use orrery_scene::ProxyRenderer;

/// One renderer call, as observed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderOp {
    Register {
        handle: ProxyHandle,
        style: StyleDescriptor,
        position: Vec3,
    },
    Move {
        handle: ProxyHandle,
        position: Vec3,
    },
    Restyle {
        handle: ProxyHandle,
        style: StyleDescriptor,
    },
    Glow {
        handle: ProxyHandle,
        tint: Tint,
    },
    Trail {
        position: Vec3,
    },
    Unregister {
        handle: ProxyHandle,
    },
}

#[derive(Default)]
struct RecorderInner {
    next_handle: u64,
    tick: u64,
    live: HashMap<ProxyHandle, (StyleDescriptor, Vec3)>,
    ops: Vec<RenderOp>,
    fail_register: bool,
    fail_move: bool,
}

/// Renderer double with a full operation log and a manual clock
#[derive(Clone)]
pub struct RecordingRenderer {
    capabilities: Vec<Capability>,
    inner: Arc<Mutex<RecorderInner>>,
}

impl RecordingRenderer {
    /// Every refinement available
    pub fn full() -> Self {
        Self::with_capabilities(vec![
            Capability::Restyle,
            Capability::GlowTint,
            Capability::Trail,
        ])
    }

    /// Only the required surface; refinements report unsupported
    pub fn bare() -> Self {
        Self::with_capabilities(Vec::new())
    }

    pub fn with_capabilities(capabilities: Vec<Capability>) -> Self {
        RecordingRenderer {
            capabilities,
            inner: Arc::new(Mutex::new(RecorderInner::default())),
        }
    }

    /// Advance the manual host clock
    pub fn advance_ticks(&self, ticks: u64) {
        self.inner.lock().tick += ticks;
    }

    /// Make the next and all further `register` calls fail
    pub fn set_fail_register(&self, fail: bool) {
        self.inner.lock().fail_register = fail;
    }

    /// Make the next and all further `move_to` calls fail
    pub fn set_fail_move(&self, fail: bool) {
        self.inner.lock().fail_move = fail;
    }

    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    pub fn position_of(&self, handle: ProxyHandle) -> Option<Vec3> {
        self.inner.lock().live.get(&handle).map(|(_, p)| *p)
    }

    pub fn style_of(&self, handle: ProxyHandle) -> Option<StyleDescriptor> {
        self.inner.lock().live.get(&handle).map(|(s, _)| *s)
    }

    /// Snapshot of the operation log
    pub fn ops(&self) -> Vec<RenderOp> {
        self.inner.lock().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.lock().ops.clear();
    }

    pub fn count_ops<F: Fn(&RenderOp) -> bool>(&self, pred: F) -> usize {
        self.inner.lock().ops.iter().filter(|op| pred(op)).count()
    }

    pub fn registers(&self) -> usize {
        self.count_ops(|op| matches!(op, RenderOp::Register { .. }))
    }

    pub fn moves(&self) -> usize {
        self.count_ops(|op| matches!(op, RenderOp::Move { .. }))
    }

    pub fn restyles(&self) -> usize {
        self.count_ops(|op| matches!(op, RenderOp::Restyle { .. }))
    }

    pub fn glows(&self) -> usize {
        self.count_ops(|op| matches!(op, RenderOp::Glow { .. }))
    }

    pub fn unregisters(&self) -> usize {
        self.count_ops(|op| matches!(op, RenderOp::Unregister { .. }))
    }
}

impl ProxyRenderer for RecordingRenderer {
    fn register(
        &mut self,
        _world: WorldHandle,
        style: StyleDescriptor,
        position: Vec3,
    ) -> OrreryResult<ProxyHandle> {
        let mut inner = self.inner.lock();
        if inner.fail_register {
            return Err(OrreryError::RenderFailure("rigged register".into()));
        }
        inner.next_handle += 1;
        let handle = ProxyHandle::new(inner.next_handle);
        inner.live.insert(handle, (style, position));
        inner.ops.push(RenderOp::Register {
            handle,
            style,
            position,
        });
        Ok(handle)
    }

    fn move_to(&mut self, handle: ProxyHandle, position: Vec3) -> OrreryResult<()> {
        let mut inner = self.inner.lock();
        if inner.fail_move {
            return Err(OrreryError::RenderFailure("rigged move".into()));
        }
        match inner.live.get_mut(&handle) {
            Some(entry) => entry.1 = position,
            None => return Err(OrreryError::RenderFailure("dead handle".into())),
        }
        inner.ops.push(RenderOp::Move { handle, position });
        Ok(())
    }

    fn unregister(&mut self, handle: ProxyHandle) {
        let mut inner = self.inner.lock();
        inner.live.remove(&handle);
        inner.ops.push(RenderOp::Unregister { handle });
    }

    fn current_tick(&self, _world: WorldHandle) -> Tick {
        Tick::new(self.inner.lock().tick)
    }

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn restyle(&mut self, handle: ProxyHandle, style: StyleDescriptor) -> OrreryResult<()> {
        let mut inner = self.inner.lock();
        match inner.live.get_mut(&handle) {
            Some(entry) => entry.0 = style,
            None => return Err(OrreryError::RenderFailure("dead handle".into())),
        }
        inner.ops.push(RenderOp::Restyle { handle, style });
        Ok(())
    }

    fn set_glow(&mut self, handle: ProxyHandle, tint: Tint) -> OrreryResult<()> {
        let mut inner = self.inner.lock();
        if !inner.live.contains_key(&handle) {
            return Err(OrreryError::RenderFailure("dead handle".into()));
        }
        inner.ops.push(RenderOp::Glow { handle, tint });
        Ok(())
    }

    fn emit_trail(&mut self, _world: WorldHandle, position: Vec3) {
        self.inner.lock().ops.push(RenderOp::Trail { position });
    }
}

/// Notifier double capturing every notice in order
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn has_connected(&self) -> bool {
        self.notices
            .lock()
            .iter()
            .any(|n| matches!(n, Notice::Connected { .. }))
    }

    pub fn has_disconnected(&self) -> bool {
        self.notices
            .lock()
            .iter()
            .any(|n| matches!(n, Notice::Disconnected { .. }))
    }

    pub fn has_fault(&self) -> bool {
        self.notices
            .lock()
            .iter()
            .any(|n| matches!(n, Notice::Faulted { .. }))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::{Material, Packet, ParticleKind, PointId};
    use orrery_scene::{SceneConfig, SceneState, StylePlan};
    use proptest::prelude::*;

    fn electron(id: i64, x: f64, y: f64, z: f64) -> Packet {
        Packet::new(PointId::new(id), ParticleKind::Electron, Vec3::new(x, y, z))
    }

    fn plain_style() -> StyleDescriptor {
        StyleDescriptor::new(Material::VioletGlass, 0.1)
    }

    #[test]
    fn test_recorder_logs_register_and_move() {
        let mut renderer = RecordingRenderer::full();
        let mut scene = SceneState::new(SceneConfig::default());
        scene.attach_plan(StylePlan::probe(&renderer));
        scene.set_origin(WorldHandle::new(1), Vec3::ZERO);

        scene.update(&mut renderer, &electron(1, 3.0, 0.0, 0.0));
        scene.update(&mut renderer, &electron(1, 4.0, 0.0, 0.0));

        assert_eq!(renderer.registers(), 1);
        assert_eq!(renderer.moves(), 1);
        assert_eq!(renderer.live_count(), 1);
    }

    #[test]
    fn test_bare_recorder_rejects_refinements() {
        let mut renderer = RecordingRenderer::bare();
        assert!(!renderer.supports(Capability::Restyle));
        let handle = renderer
            .register(WorldHandle::new(1), plain_style(), Vec3::ZERO)
            .unwrap();
        // the double still honors the call; callers gate on supports()
        assert!(renderer.restyle(handle, plain_style()).is_ok());
        assert_eq!(renderer.restyles(), 1);
    }

    #[test]
    fn test_rigged_register_failure() {
        let mut renderer = RecordingRenderer::full();
        renderer.set_fail_register(true);
        let result = renderer.register(WorldHandle::new(1), plain_style(), Vec3::ZERO);
        assert!(result.is_err());
        assert_eq!(renderer.live_count(), 0);
    }

    proptest! {
        /// Arbitrary update storms never leave the scene and the host
        /// disagreeing about which proxies exist.
        #[test]
        fn prop_scene_and_host_stay_in_sync(
            seq in proptest::collection::vec(
                (1i64..6, -20.0f64..20.0, -20.0f64..20.0, -20.0f64..20.0),
                1..80,
            )
        ) {
            let mut renderer = RecordingRenderer::full();
            let mut scene = SceneState::new(SceneConfig::default());
            scene.attach_plan(StylePlan::probe(&renderer));
            scene.set_origin(WorldHandle::new(1), Vec3::ZERO);

            for (id, x, y, z) in seq {
                scene.update(&mut renderer, &electron(id, x, y, z));
            }

            prop_assert_eq!(scene.len(), renderer.live_count());
            for (_, proxy) in scene.iter() {
                prop_assert!(renderer.position_of(proxy.handle).is_some());
            }
        }
    }
}
