//! Processing queue and its single consumer
//!
//! Every mutation of the scene - decoded batches, anchor changes,
//! scale changes, clears - travels through one unbounded FIFO queue
//! and is applied by one `SceneWorker` task. Enqueueing never blocks,
//! so command paths stay responsive; the feed's fixed cadence keeps
//! the queue shallow in practice.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use orrery_core::{OrreryError, OrreryResult, Packet, Vec3, WorldHandle};
use orrery_scene::{ProxyRenderer, SceneConfig, SceneState, SceneStats, StylePlan};

use crate::{Notice, Notifier};

/// One unit of enqueued work
#[derive(Debug)]
pub enum WorkUnit {
    /// Anchor the scene; enqueued ahead of any batch of a connection
    SetOrigin { world: WorldHandle, origin: Vec3 },
    SetScale(f64),
    /// One decoded frame, applied packet-by-packet in feed order
    ApplyBatch(Vec<Packet>),
    Clear,
    Opened { address: String },
    FrameRejected { detail: String },
    Closed { code: u16, reason: String },
    Faulted { detail: String },
}

/// Counters kept by the consumer, snapshot for observers
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineStats {
    pub batches: u64,
    pub packets: u64,
    pub frames_rejected: u64,
    pub clears: u64,
    pub connects: u64,
    pub disconnects: u64,
    pub scene: SceneStats,
}

/// Sending side of the processing queue
#[derive(Clone)]
pub struct Pipeline {
    tx: mpsc::UnboundedSender<WorkUnit>,
    stats: Arc<Mutex<PipelineStats>>,
}

impl Pipeline {
    /// Enqueue one unit; fails only if the consumer is gone
    pub fn submit(&self, unit: WorkUnit) -> OrreryResult<()> {
        self.tx.send(unit).map_err(|_| OrreryError::QueueClosed)
    }

    /// Snapshot of the consumer's counters
    pub fn stats(&self) -> PipelineStats {
        *self.stats.lock()
    }
}

/// The one task allowed to touch the scene and the renderer
pub struct SceneWorker {
    scene: SceneState,
    renderer: Box<dyn ProxyRenderer + Send>,
    notifier: Box<dyn Notifier + Send>,
    stats: Arc<Mutex<PipelineStats>>,
}

impl SceneWorker {
    /// Probe the renderer, start the consumer task, return the queue
    pub fn spawn(
        config: SceneConfig,
        renderer: Box<dyn ProxyRenderer + Send>,
        notifier: Box<dyn Notifier + Send>,
    ) -> Pipeline {
        let mut scene = SceneState::new(config);
        scene.attach_plan(StylePlan::probe(renderer.as_ref()));

        let stats = Arc::new(Mutex::new(PipelineStats::default()));
        let (tx, rx) = mpsc::unbounded_channel();

        let worker = SceneWorker {
            scene,
            renderer,
            notifier,
            stats: Arc::clone(&stats),
        };
        tokio::spawn(worker.run(rx));

        Pipeline { tx, stats }
    }

    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<WorkUnit>) {
        while let Some(unit) = rx.recv().await {
            self.apply(unit);
        }
        tracing::debug!("work queue closed, processing loop ending");
    }

    fn apply(&mut self, unit: WorkUnit) {
        match unit {
            WorkUnit::SetOrigin { world, origin } => {
                self.scene.set_origin(world, origin);
            }
            WorkUnit::SetScale(factor) => {
                self.scene.set_scale(factor);
            }
            WorkUnit::ApplyBatch(batch) => {
                for packet in &batch {
                    self.scene.update(self.renderer.as_mut(), packet);
                }
                let mut stats = self.stats.lock();
                stats.batches += 1;
                stats.packets += batch.len() as u64;
                stats.scene = self.scene.stats();
            }
            WorkUnit::Clear => {
                self.scene.clear(self.renderer.as_mut());
                let mut stats = self.stats.lock();
                stats.clears += 1;
                stats.scene = self.scene.stats();
            }
            WorkUnit::Opened { address } => {
                self.stats.lock().connects += 1;
                self.notifier.notify(Notice::Connected { address });
            }
            WorkUnit::FrameRejected { detail } => {
                tracing::warn!("frame rejected: {}", detail);
                self.stats.lock().frames_rejected += 1;
            }
            WorkUnit::Closed { code, reason } => {
                self.stats.lock().disconnects += 1;
                self.notifier.notify(Notice::Disconnected { code, reason });
            }
            WorkUnit::Faulted { detail } => {
                self.stats.lock().disconnects += 1;
                self.notifier.notify(Notice::Faulted { detail });
            }
        }
    }
}
