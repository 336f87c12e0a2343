//! Viewer demo - terminal client for a particle feed
//!
//! Connects to a feed, anchors the scene at the viewer's position, and
//! shows proxies as console lines. The render mode decides which
//! refinements the console host claims to support, so the degraded
//! styling paths can be watched live.
//!
//! Usage: viewer [--mode block|cloud|glow]

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use orrery_core::{
    Capability, OrreryResult, ProxyHandle, StyleDescriptor, Tick, Tint, Vec3, WorldHandle,
};
use orrery_runtime::{Notice, Notifier, Orchestrator};
use orrery_scene::{ProxyRenderer, RenderMode, SceneConfig};

/// Milliseconds per host tick; TTL 40 makes stale points vanish in 2 s
const TICK_MILLIS: u64 = 50;

#[derive(Default)]
struct ConsoleInner {
    next_handle: u64,
    live: HashMap<ProxyHandle, Vec3>,
    trails: u64,
}

/// Console stand-in for a world renderer
///
/// Registrations, evictions, and style changes print; position updates
/// stay silent so the prompt survives a 50 Hz feed.
#[derive(Clone)]
struct ConsoleRenderer {
    mode: RenderMode,
    started: Instant,
    inner: Arc<Mutex<ConsoleInner>>,
}

impl ConsoleRenderer {
    fn new(mode: RenderMode) -> Self {
        ConsoleRenderer {
            mode,
            started: Instant::now(),
            inner: Arc::new(Mutex::new(ConsoleInner::default())),
        }
    }

    fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    fn trail_count(&self) -> u64 {
        self.inner.lock().trails
    }
}

impl ProxyRenderer for ConsoleRenderer {
    fn register(
        &mut self,
        _world: WorldHandle,
        style: StyleDescriptor,
        position: Vec3,
    ) -> OrreryResult<ProxyHandle> {
        let mut inner = self.inner.lock();
        inner.next_handle += 1;
        let handle = ProxyHandle::new(inner.next_handle);
        inner.live.insert(handle, position);
        println!("● {:?} {:?} at {:?}", handle, style.material, position);
        Ok(handle)
    }

    fn move_to(&mut self, handle: ProxyHandle, position: Vec3) -> OrreryResult<()> {
        self.inner.lock().live.insert(handle, position);
        Ok(())
    }

    fn unregister(&mut self, handle: ProxyHandle) {
        if self.inner.lock().live.remove(&handle).is_some() {
            println!("✖ {:?} gone", handle);
        }
    }

    fn current_tick(&self, _world: WorldHandle) -> Tick {
        Tick::new(self.started.elapsed().as_millis() as u64 / TICK_MILLIS)
    }

    fn supports(&self, capability: Capability) -> bool {
        match self.mode {
            RenderMode::Block => true,
            RenderMode::ParticleCloud => capability != Capability::Restyle,
            RenderMode::GlowOnly => capability == Capability::GlowTint,
        }
    }

    fn restyle(&mut self, handle: ProxyHandle, style: StyleDescriptor) -> OrreryResult<()> {
        println!("🎨 {:?} → {:?}", handle, style.material);
        Ok(())
    }

    fn set_glow(&mut self, handle: ProxyHandle, tint: Tint) -> OrreryResult<()> {
        println!(
            "💡 {:?} → ({:.2}, {:.2}, {:.2})",
            handle, tint.r, tint.g, tint.b
        );
        Ok(())
    }

    fn emit_trail(&mut self, _world: WorldHandle, _position: Vec3) {
        self.inner.lock().trails += 1;
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::Connected { address } => println!("\n✅ Connected to {}", address),
            Notice::Disconnected { code, reason } => {
                if reason.is_empty() {
                    println!("\n🔌 Disconnected (code {})", code);
                } else {
                    println!("\n🔌 Disconnected (code {}): {}", code, reason);
                }
            }
            Notice::Faulted { detail } => println!("\n⚠️  Connection failed: {}", detail),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  connect [host[:port]]   dial a feed (default localhost:8080)");
    println!("  stop                    close the connection and clear the scene");
    println!("  scale <factor>          display scale, clamped to 0.05..100");
    println!("  pos <x> <y> <z>         move the viewer; used at the next connect");
    println!("  status                  connection phase and counters");
    println!("  quit                    exit");
}

fn print_status(orchestrator: &Orchestrator, renderer: &ConsoleRenderer) {
    let stats = orchestrator.stats();
    println!("Phase: {:?}", orchestrator.phase());
    println!(
        "Frames: {} applied, {} rejected, {} packets",
        stats.batches, stats.frames_rejected, stats.packets
    );
    println!(
        "Scene: {} live, {} created, {} restyled, {} evicted",
        renderer.live_count(),
        stats.scene.created,
        stats.scene.restyled,
        stats.scene.evicted
    );
    if renderer.trail_count() > 0 {
        println!("Trails emitted: {}", renderer.trail_count());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut mode = RenderMode::Block;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                i += 1;
                let name = args.get(i).map(String::as_str).unwrap_or("");
                mode = match RenderMode::from_name(name) {
                    Some(mode) => mode,
                    None => {
                        println!("Usage: viewer [--mode block|cloud|glow]");
                        return Ok(());
                    }
                };
            }
            _ => {
                println!("Usage: viewer [--mode block|cloud|glow]");
                return Ok(());
            }
        }
        i += 1;
    }

    println!("╔════════════════════════════════════════╗");
    println!("║     Orrery Feed Viewer                 ║");
    println!("╚════════════════════════════════════════╝");
    println!();
    println!("Render mode: {:?}", mode);
    print_help();
    println!();

    let renderer = ConsoleRenderer::new(mode);
    let orchestrator = Orchestrator::spawn(
        SceneConfig::default(),
        Box::new(renderer.clone()),
        Box::new(ConsoleNotifier),
    );

    let world = WorldHandle::new(1);
    let mut position = Vec3::new(0.0, 64.0, 0.0);

    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("connect") => {
                let address = parts.next().unwrap_or("");
                match orchestrator.connect(address, world, position) {
                    Ok(resolved) => println!("Connecting to {} ...", resolved),
                    Err(e) => println!("⚠️  {}", e),
                }
            }
            Some("stop") => {
                orchestrator.stop();
                println!("Stopped");
            }
            Some("scale") => match parts.next().and_then(|s| s.parse::<f64>().ok()) {
                Some(factor) => {
                    let clamped = factor.clamp(0.05, 100.0);
                    match orchestrator.set_scale(clamped) {
                        Ok(()) => println!("Scale set to {}", clamped),
                        Err(e) => println!("⚠️  {}", e),
                    }
                }
                None => println!("Usage: scale <factor>"),
            },
            Some("pos") => {
                let coords: Vec<f64> = parts.filter_map(|s| s.parse().ok()).collect();
                if coords.len() == 3 {
                    position = Vec3::new(coords[0], coords[1], coords[2]);
                    println!("Viewer at {:?}", position);
                } else {
                    println!("Usage: pos <x> <y> <z>");
                }
            }
            Some("status") => print_status(&orchestrator, &renderer),
            Some("quit") | Some("exit") => break,
            Some("help") => print_help(),
            Some(other) => println!("Unknown command '{}'; try 'help'", other),
            None => {}
        }
        print!("> ");
        io::stdout().flush()?;
    }

    orchestrator.stop();
    println!("Goodbye!");
    Ok(())
}
