//! Feed demo - serves the simulated atom over WebSocket
//!
//! Runs the standard atom scenario and broadcasts one frame to every
//! connected viewer on a fixed cadence.
//!
//! Usage: feed [port] [seed]

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use orrery_net::FeedBroadcaster;
use orrery_sim::{standard_atom, FRAME_MILLIS, STEP_SECONDS};
use orrery_wire::encode_frame;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let port: u16 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(8080);
    let seed: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(4);

    let feed = FeedBroadcaster::bind(&format!("0.0.0.0:{}", port)).await?;
    println!("╔════════════════════════════════════════╗");
    println!("║     Orrery Particle Feed               ║");
    println!("╚════════════════════════════════════════╝");
    println!();
    println!("Serving on {} (seed {})", feed.url(), seed);
    println!("Press Ctrl-C to stop");

    let mut engine = standard_atom(seed);

    let mut step_timer = tokio::time::interval(Duration::from_secs_f64(STEP_SECONDS));
    let mut frame_timer = tokio::time::interval(Duration::from_millis(FRAME_MILLIS));

    loop {
        tokio::select! {
            _ = step_timer.tick() => {
                engine.step(STEP_SECONDS);
            }
            _ = frame_timer.tick() => {
                if feed.client_count() > 0 {
                    feed.broadcast(encode_frame(&engine.snapshot())?);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nFeed stopped");
                break;
            }
        }
    }

    Ok(())
}
