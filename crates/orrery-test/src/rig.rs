//! End-to-end feed rig
//!
//! Binds a real broadcaster on an ephemeral port and stands up the
//! whole client stack against it. Tests push frames in at the server
//! edge and watch renderer operations come out the other side.

use std::time::Duration;

use tokio::time::sleep;

use orrery_core::{OrreryResult, Packet, Vec3, WorldHandle};
use orrery_net::FeedBroadcaster;
use orrery_runtime::{Orchestrator, PipelineStats};
use orrery_scene::SceneConfig;
use orrery_wire::encode_frame;

use crate::recorder::{RecordingNotifier, RecordingRenderer};

const SETTLE_STEP: Duration = Duration::from_millis(5);
const SETTLE_LIMIT: u32 = 400;

/// Poll until `pred` holds; panics with `what` when it never does
pub async fn wait_until<F: Fn() -> bool>(what: &str, pred: F) {
    for _ in 0..SETTLE_LIMIT {
        if pred() {
            return;
        }
        sleep(SETTLE_STEP).await;
    }
    panic!("timed out waiting for {what}");
}

/// Broadcaster plus a fully wired client stack
pub struct FeedRig {
    pub feed: FeedBroadcaster,
    pub renderer: RecordingRenderer,
    pub notifier: RecordingNotifier,
    pub orchestrator: Orchestrator,
    pub world: WorldHandle,
}

impl FeedRig {
    /// Stand up a rig around the given renderer double
    pub async fn start(renderer: RecordingRenderer) -> OrreryResult<Self> {
        Self::start_with(renderer, SceneConfig::default()).await
    }

    pub async fn start_with(
        renderer: RecordingRenderer,
        config: SceneConfig,
    ) -> OrreryResult<Self> {
        let feed = FeedBroadcaster::bind("127.0.0.1:0").await?;
        let notifier = RecordingNotifier::default();
        let orchestrator = Orchestrator::spawn(
            config,
            Box::new(renderer.clone()),
            Box::new(notifier.clone()),
        );
        Ok(FeedRig {
            feed,
            renderer,
            notifier,
            orchestrator,
            world: WorldHandle::new(1),
        })
    }

    /// Connect with the given anchor and wait until frames can flow
    pub async fn connect_at(&self, origin: Vec3) -> OrreryResult<String> {
        let resolved = self.orchestrator.connect(&self.feed.url(), self.world, origin)?;
        wait_until("connection", || self.orchestrator.is_connected()).await;
        wait_until("subscriber", || self.feed.client_count() == 1).await;
        Ok(resolved)
    }

    /// Encode packets as one frame and broadcast it
    pub fn send_packets(&self, packets: &[Packet]) -> OrreryResult<()> {
        let payload = encode_frame(packets)?;
        self.feed.broadcast(payload);
        Ok(())
    }

    /// Broadcast a raw payload, valid or not
    pub fn send_raw(&self, payload: &str) {
        self.feed.broadcast(payload.to_string());
    }

    pub fn stats(&self) -> PipelineStats {
        self.orchestrator.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RenderOp;
    use orrery_core::{Material, ParticleKind, PointId};
    use orrery_sim::{standard_atom, STEP_SECONDS};

    fn point(id: i64, tag: ParticleKind, x: f64, y: f64, z: f64) -> Packet {
        Packet::new(PointId::new(id), tag, Vec3::new(x, y, z))
    }

    #[tokio::test]
    async fn test_full_path_register_move_restyle_evict() {
        let rig = FeedRig::start(RecordingRenderer::full()).await.unwrap();
        rig.connect_at(Vec3::new(10.0, 64.0, 10.0)).await.unwrap();

        rig.send_packets(&[
            point(1, ParticleKind::Nucleus, 0.0, 0.0, 0.0),
            point(2, ParticleKind::Electron, 3.0, 0.0, 0.0),
        ])
        .unwrap();
        wait_until("two proxies", || rig.renderer.live_count() == 2).await;
        assert_eq!(rig.renderer.registers(), 2);

        // electron crosses from the near band into the mid band
        rig.send_packets(&[point(2, ParticleKind::Electron, 6.0, 0.0, 0.0)])
            .unwrap();
        wait_until("a move", || rig.renderer.moves() == 1).await;
        assert_eq!(rig.renderer.restyles(), 1);
        let restyled = rig
            .renderer
            .ops()
            .into_iter()
            .find_map(|op| match op {
                RenderOp::Restyle { style, .. } => Some(style.material),
                _ => None,
            })
            .unwrap();
        assert_eq!(restyled, Material::MagentaGlass);

        // both proxies go stale together; the next frame sweeps them
        rig.renderer.advance_ticks(41);
        rig.send_packets(&[point(2, ParticleKind::Electron, 6.0, 0.0, 0.0)])
            .unwrap();
        wait_until("sweep", || rig.renderer.unregisters() == 2).await;
        wait_until("recreated", || rig.renderer.live_count() == 1).await;
        wait_until("evictions counted", || rig.stats().scene.evicted == 2).await;
    }

    #[tokio::test]
    async fn test_malformed_frame_is_quarantined() {
        let rig = FeedRig::start(RecordingRenderer::full()).await.unwrap();
        rig.connect_at(Vec3::ZERO).await.unwrap();

        rig.send_packets(&[point(1, ParticleKind::Nucleus, 0.0, 0.0, 0.0)])
            .unwrap();
        wait_until("first proxy", || rig.renderer.live_count() == 1).await;
        rig.renderer.clear_ops();

        rig.send_raw(r#"[{"id":3,"t":"e","x":1.0"#);
        wait_until("rejection", || rig.stats().frames_rejected == 1).await;
        assert!(rig.renderer.ops().is_empty());
        assert!(rig.orchestrator.is_connected());

        // the connection keeps serving good frames afterwards
        rig.send_packets(&[point(3, ParticleKind::Electron, 1.0, 0.0, 0.0)])
            .unwrap();
        wait_until("second proxy", || rig.renderer.live_count() == 2).await;
    }

    #[tokio::test]
    async fn test_bare_host_keeps_first_style() {
        let rig = FeedRig::start(RecordingRenderer::bare()).await.unwrap();
        rig.connect_at(Vec3::ZERO).await.unwrap();

        rig.send_packets(&[point(2, ParticleKind::Electron, 3.0, 0.0, 0.0)])
            .unwrap();
        wait_until("proxy", || rig.renderer.live_count() == 1).await;

        rig.send_packets(&[point(2, ParticleKind::Electron, 9.0, 0.0, 0.0)])
            .unwrap();
        wait_until("a move", || rig.renderer.moves() == 1).await;

        // no restyle capability: the amber near-band style stays
        assert_eq!(rig.renderer.restyles(), 0);
        assert_eq!(rig.renderer.glows(), 0);
        let styles: Vec<Material> = rig
            .renderer
            .ops()
            .into_iter()
            .filter_map(|op| match op {
                RenderOp::Register { style, .. } => Some(style.material),
                _ => None,
            })
            .collect();
        assert_eq!(styles, vec![Material::AmberGlass]);
    }

    #[tokio::test]
    async fn test_simulation_snapshot_feeds_the_scene() {
        let mut engine = standard_atom(9);
        for _ in 0..10 {
            engine.step(STEP_SECONDS);
        }

        let rig = FeedRig::start(RecordingRenderer::full()).await.unwrap();
        rig.connect_at(Vec3::new(0.0, 100.0, 0.0)).await.unwrap();

        rig.send_packets(&engine.snapshot()).unwrap();
        wait_until("seven proxies", || rig.renderer.live_count() == 7).await;
        wait_until("batch counted", || {
            let stats = rig.stats();
            stats.batches == 1 && stats.packets == 7 && stats.scene.created == 7
        })
        .await;
    }

    #[tokio::test]
    async fn test_lifecycle_notices_reach_the_notifier() {
        let rig = FeedRig::start(RecordingRenderer::full()).await.unwrap();
        rig.connect_at(Vec3::ZERO).await.unwrap();
        wait_until("connected notice", || rig.notifier.has_connected()).await;

        rig.send_packets(&[point(1, ParticleKind::Nucleus, 0.0, 0.0, 0.0)])
            .unwrap();
        wait_until("proxy", || rig.renderer.live_count() == 1).await;

        let FeedRig {
            feed,
            renderer,
            notifier,
            orchestrator,
            ..
        } = rig;
        drop(feed);

        wait_until("disconnected notice", || notifier.has_disconnected()).await;
        wait_until("scene cleared", || renderer.live_count() == 0).await;
        assert!(!orchestrator.is_connected());
    }
}
