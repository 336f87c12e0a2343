//! Connection orchestrator
//!
//! All user commands land here. The orchestrator owns the connection
//! phase machine and the transport handle; everything that actually
//! mutates the scene is enqueued on the pipeline and applied by the
//! worker, so commands return immediately.
//!
//! Connections are numbered. A pump task carries its connection's
//! number and checks it before every submission, so a socket that dies
//! late cannot clear or repaint a newer connection's scene.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use orrery_core::{OrreryError, OrreryResult, Vec3, WorldHandle};
use orrery_net::{resolve_feed_address, FeedClient, FeedEvent};
use orrery_scene::{ProxyRenderer, SceneConfig};

use crate::{Notifier, Pipeline, PipelineStats, SceneWorker, WorkUnit};

/// Connection lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Default)]
struct PhaseCell {
    phase: ConnPhase,
    generation: u64,
}

/// Command surface over one feed connection at a time
pub struct Orchestrator {
    cell: Arc<Mutex<PhaseCell>>,
    pipeline: Pipeline,
    client: Mutex<Option<FeedClient>>,
}

impl Orchestrator {
    /// Start the processing loop and return the command surface
    pub fn spawn(
        config: SceneConfig,
        renderer: Box<dyn ProxyRenderer + Send>,
        notifier: Box<dyn Notifier + Send>,
    ) -> Self {
        Orchestrator {
            cell: Arc::new(Mutex::new(PhaseCell::default())),
            pipeline: SceneWorker::spawn(config, renderer, notifier),
            client: Mutex::new(None),
        }
    }

    /// Dial a feed; the caller's position right now becomes the anchor
    ///
    /// Rejects while another connection is active or being established.
    /// Returns the resolved address actually dialed.
    pub fn connect(&self, address: &str, world: WorldHandle, origin: Vec3) -> OrreryResult<String> {
        let resolved = resolve_feed_address(address)?;

        // anchor and generation bump happen under one lock, so work from
        // an older connection can never land behind this anchor
        let generation = {
            let mut cell = self.cell.lock();
            if cell.phase != ConnPhase::Disconnected {
                return Err(OrreryError::AlreadyConnected);
            }
            self.pipeline.submit(WorkUnit::SetOrigin { world, origin })?;
            cell.phase = ConnPhase::Connecting;
            cell.generation += 1;
            cell.generation
        };

        tracing::info!("connecting to {}", resolved);
        let (client, events) = FeedClient::spawn(resolved.clone());
        *self.client.lock() = Some(client);

        let cell = Arc::clone(&self.cell);
        let pipeline = self.pipeline.clone();
        let address = resolved.clone();
        tokio::spawn(async move {
            pump_events(address, events, cell, generation, pipeline).await;
        });

        Ok(resolved)
    }

    /// Close the transport if open and schedule a clear
    ///
    /// Invalidates the connection's pump; its events still in flight
    /// are discarded, so a user stop produces no lifecycle notices.
    pub fn stop(&self) {
        {
            let mut cell = self.cell.lock();
            cell.phase = ConnPhase::Disconnected;
            cell.generation += 1;
            let _ = self.pipeline.submit(WorkUnit::Clear);
        }
        if let Some(client) = self.client.lock().take() {
            client.close();
        }
    }

    /// Queue a display-scale change (the scene ignores bad factors)
    pub fn set_scale(&self, factor: f64) -> OrreryResult<()> {
        self.pipeline.submit(WorkUnit::SetScale(factor))
    }

    pub fn phase(&self) -> ConnPhase {
        self.cell.lock().phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase() == ConnPhase::Connected
    }

    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }
}

/// Enqueue `units` if `generation` still names the current connection
///
/// Optionally advances the phase first. Check, phase change, and
/// enqueue happen under one lock. Returns false when the generation is
/// stale or the queue is gone; the caller ends its pump.
fn submit_if_current(
    cell: &Mutex<PhaseCell>,
    generation: u64,
    phase: Option<ConnPhase>,
    pipeline: &Pipeline,
    units: Vec<WorkUnit>,
) -> bool {
    let mut cell = cell.lock();
    if cell.generation != generation {
        return false;
    }
    if let Some(phase) = phase {
        cell.phase = phase;
    }
    units.into_iter().all(|unit| pipeline.submit(unit).is_ok())
}

async fn pump_events(
    address: String,
    mut events: mpsc::Receiver<FeedEvent>,
    cell: Arc<Mutex<PhaseCell>>,
    generation: u64,
    pipeline: Pipeline,
) {
    while let Some(event) = events.recv().await {
        let proceed = match event {
            FeedEvent::Opened => submit_if_current(
                &cell,
                generation,
                Some(ConnPhase::Connected),
                &pipeline,
                vec![WorkUnit::Opened {
                    address: address.clone(),
                }],
            ),
            FeedEvent::Batch(batch) => submit_if_current(
                &cell,
                generation,
                None,
                &pipeline,
                vec![WorkUnit::ApplyBatch(batch)],
            ),
            FeedEvent::FrameRejected(detail) => submit_if_current(
                &cell,
                generation,
                None,
                &pipeline,
                vec![WorkUnit::FrameRejected { detail }],
            ),
            FeedEvent::Closed { code, reason } => {
                submit_if_current(
                    &cell,
                    generation,
                    Some(ConnPhase::Disconnected),
                    &pipeline,
                    vec![WorkUnit::Closed { code, reason }, WorkUnit::Clear],
                );
                false
            }
            FeedEvent::Failed(detail) => {
                submit_if_current(
                    &cell,
                    generation,
                    Some(ConnPhase::Disconnected),
                    &pipeline,
                    vec![WorkUnit::Faulted { detail }, WorkUnit::Clear],
                );
                false
            }
        };
        if !proceed {
            break;
        }
    }
    tracing::debug!("event pump for connection {} ending", generation);
}
