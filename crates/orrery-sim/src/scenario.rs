//! Canned demo scenario
//!
//! Four nucleons pinned on a regular tetrahedron at the rest distance
//! plus three electrons on widening orbits. This is the shape the feed
//! demo serves; the viewer's style tiers light up as the electrons
//! swing through them.

use orrery_core::{ParticleKind, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::engine::{random_unit, SimulationEngine};
use crate::particle::SimParticle;

/// Integrator timestep used by the feed demo
pub const STEP_SECONDS: f64 = 0.008;
/// Broadcast cadence used by the feed demo
pub const FRAME_MILLIS: u64 = 20;

/// Unit tetrahedron vertices, edge length 2*sqrt(2)
const TETRAHEDRON: [Vec3; 4] = [
    Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    },
    Vec3 {
        x: 1.0,
        y: -1.0,
        z: -1.0,
    },
    Vec3 {
        x: -1.0,
        y: 1.0,
        z: -1.0,
    },
    Vec3 {
        x: -1.0,
        y: -1.0,
        z: 1.0,
    },
];

/// Build the standard atom: tetrahedral nucleus, three orbiting electrons
///
/// The first electron orbits in the xy plane; the outer two launch in
/// random planes drawn from the seed, so different seeds give visibly
/// different runs that still replay deterministically.
pub fn standard_atom(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(seed);
    engine.coulomb_constant = 1.2;
    engine.min_distance = 2.0;
    engine.rest_distance = 1.0;
    engine.constraint_iterations = 4;
    engine.set_jitter(0.008);

    // scale the unit tetrahedron so every edge sits at the rest distance
    let scale = engine.rest_distance / (2.0 * 2.0_f64.sqrt());
    for (index, vertex) in TETRAHEDRON.iter().enumerate() {
        engine.add_particle(SimParticle::new(
            *vertex * scale,
            1.0,
            1.0,
            ParticleKind::Nucleus,
            index as i64 + 1,
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let electron_mass = 0.02;

    let mut inner = SimParticle::new(
        Vec3::new(5.0, 0.0, 0.0),
        electron_mass,
        -1.0,
        ParticleKind::Electron,
        5,
    );
    inner.set_velocity(Vec3::new(0.0, 6.5, 0.0), STEP_SECONDS);
    engine.add_particle(inner);

    let mut middle = SimParticle::new(
        Vec3::new(7.0, 0.0, 0.0),
        electron_mass,
        -1.0,
        ParticleKind::Electron,
        6,
    );
    middle.set_velocity(random_unit(&mut rng) * 5.0, STEP_SECONDS);
    engine.add_particle(middle);

    let mut outer = SimParticle::new(
        Vec3::new(10.0, 0.0, 0.0),
        electron_mass,
        -1.0,
        ParticleKind::Electron,
        7,
    );
    outer.set_velocity(random_unit(&mut rng) * 4.0, STEP_SECONDS);
    engine.add_particle(outer);

    debug!(particles = engine.len(), seed, "standard atom ready");
    engine
}
