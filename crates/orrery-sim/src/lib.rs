//! Verlet particle simulation behind the demo feed
//!
//! A small position-based dynamics engine:
//! - Verlet integration with implicit velocities
//! - Aggregate Coulomb pull drawing electrons toward the nucleus
//! - Pairwise distance constraints holding the nucleus together
//!
//! The engine exists to give the feed demo plausible motion to serve;
//! it is not a general physics library.

pub mod engine;
pub mod particle;
pub mod scenario;

pub use engine::{random_unit, SimulationEngine};
pub use particle::SimParticle;
pub use scenario::{standard_atom, FRAME_MILLIS, STEP_SECONDS};
