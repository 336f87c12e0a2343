//! Position-based dynamics engine
//!
//! Step order is fixed: accumulate accelerations, integrate every
//! particle, then relax the pairwise nucleus constraints. Electrons feel
//! one aggregate pull toward the mass-weighted nucleus center rather
//! than per-pair forces, which keeps orbits stable at demo timesteps.

use orrery_core::{Packet, ParticleKind, PointId, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::particle::SimParticle;

/// Distance floor guarding the constraint division
const CONSTRAINT_EPS: f64 = 1e-9;

/// Uniform random unit vector; orbit planes and nucleus jitter both use it
pub fn random_unit<R: Rng>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    let len = v.length();
    if len < 1e-9 {
        Vec3::new(1.0, 0.0, 0.0)
    } else {
        v * (1.0 / len)
    }
}

/// Verlet engine over an owned particle list
///
/// Tuning knobs are public fields; randomness is seeded so runs with the
/// same seed replay identically.
pub struct SimulationEngine {
    /// Scales the electron attraction force
    pub coulomb_constant: f64,
    /// Separations below this are clamped before the force falloff
    pub min_distance: f64,
    /// Target separation for every nucleus pair
    pub rest_distance: f64,
    /// Constraint relaxation passes per step
    pub constraint_iterations: u32,
    jitter: f64,
    particles: Vec<SimParticle>,
    rng: StdRng,
}

impl SimulationEngine {
    /// Empty engine with default tuning and a seeded rng
    pub fn new(seed: u64) -> Self {
        SimulationEngine {
            coulomb_constant: 1.0,
            min_distance: 1e-6,
            rest_distance: 1.0,
            constraint_iterations: 3,
            jitter: 0.0,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Random acceleration applied to each nucleus particle every step
    pub fn set_jitter(&mut self, intensity: f64) {
        self.jitter = intensity.max(0.0);
    }

    /// Add a particle; id zero is replaced with the next free id
    pub fn add_particle(&mut self, mut particle: SimParticle) -> i64 {
        if particle.id == 0 {
            particle.id = self.max_id() + 1;
            debug!(id = particle.id, "assigned particle id");
        }
        let id = particle.id;
        self.particles.push(particle);
        id
    }

    fn max_id(&self) -> i64 {
        self.particles.iter().map(|p| p.id).max().unwrap_or(0)
    }

    #[inline]
    pub fn particles(&self) -> &[SimParticle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [SimParticle] {
        &mut self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Mass-weighted center of the nucleus particles; zero when there are none
    pub fn nucleus_center(&self) -> Vec3 {
        let mut weighted = Vec3::ZERO;
        let mut total_mass = 0.0;
        for p in self.particles.iter().filter(|p| p.kind.is_nucleus()) {
            weighted += p.position * p.mass;
            total_mass += p.mass;
        }
        if total_mass <= 0.0 {
            Vec3::ZERO
        } else {
            weighted * (1.0 / total_mass)
        }
    }

    fn nucleus_charge(&self) -> f64 {
        self.particles
            .iter()
            .filter(|p| p.kind.is_nucleus())
            .map(|p| p.charge)
            .sum()
    }

    /// Coulomb pull on one electron toward the aggregate nucleus
    fn coulomb_toward_nucleus(
        &self,
        electron: &SimParticle,
        center: Vec3,
        nucleus_charge: f64,
    ) -> Vec3 {
        let delta = center - electron.position;
        let r = delta.length().max(self.min_distance);
        let magnitude = self.coulomb_constant * (electron.charge * nucleus_charge).abs() / (r * r);
        delta.normalized() * magnitude
    }

    /// Advance by `dt` seconds; non-positive dt is a no-op
    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let dt_sq = dt * dt;
        let center = self.nucleus_center();
        let nucleus_charge = self.nucleus_charge();

        let mut accelerations = vec![Vec3::ZERO; self.particles.len()];
        for index in 0..self.particles.len() {
            let particle = self.particles[index];
            accelerations[index] = match particle.kind {
                ParticleKind::Electron if particle.mass > 0.0 => {
                    self.coulomb_toward_nucleus(&particle, center, nucleus_charge)
                        * (1.0 / particle.mass)
                }
                ParticleKind::Nucleus if self.jitter > 0.0 => {
                    random_unit(&mut self.rng) * self.jitter
                }
                _ => Vec3::ZERO,
            };
        }

        for (particle, acceleration) in self.particles.iter_mut().zip(accelerations) {
            let next = particle.position * 2.0 - particle.previous_position + acceleration * dt_sq;
            particle.previous_position = particle.position;
            particle.position = next;
        }

        self.apply_constraints();
    }

    /// Relax every nucleus pair toward the rest distance
    ///
    /// Corrections are split by inverse mass share, so a heavy nucleon
    /// moves less than a light one.
    fn apply_constraints(&mut self) {
        let nuclei: Vec<usize> = self
            .particles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind.is_nucleus())
            .map(|(index, _)| index)
            .collect();
        if nuclei.len() < 2 {
            return;
        }

        for _ in 0..self.constraint_iterations {
            for a in 0..nuclei.len() {
                for b in (a + 1)..nuclei.len() {
                    let (i, j) = (nuclei[a], nuclei[b]);
                    let delta = self.particles[j].position - self.particles[i].position;
                    let distance = delta.length();
                    if distance < CONSTRAINT_EPS {
                        continue;
                    }
                    let diff = (distance - self.rest_distance) / distance;
                    let correction = delta * diff;
                    let w1 = self.particles[i].mass;
                    let w2 = self.particles[j].mass;
                    let total = w1 + w2;
                    if total <= 0.0 {
                        continue;
                    }
                    self.particles[i].position += correction * (w2 / total);
                    self.particles[j].position -= correction * (w1 / total);
                }
            }
        }
    }

    /// Wire-ready view of the current positions
    pub fn snapshot(&self) -> Vec<Packet> {
        self.particles
            .iter()
            .map(|p| Packet {
                id: PointId::new(p.id),
                kind: p.kind,
                position: p.position,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nucleus(position: Vec3, mass: f64, id: i64) -> SimParticle {
        SimParticle::new(position, mass, 1.0, ParticleKind::Nucleus, id)
    }

    fn electron(position: Vec3, id: i64) -> SimParticle {
        SimParticle::new(position, 0.02, -1.0, ParticleKind::Electron, id)
    }

    #[test]
    fn test_auto_id_assignment() {
        let mut engine = SimulationEngine::new(1);
        assert_eq!(engine.add_particle(nucleus(Vec3::ZERO, 1.0, 0)), 1);
        assert_eq!(engine.add_particle(nucleus(Vec3::ZERO, 1.0, 7)), 7);
        assert_eq!(engine.add_particle(nucleus(Vec3::ZERO, 1.0, 0)), 8);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut engine = SimulationEngine::new(1);
        engine.add_particle(electron(Vec3::new(5.0, 0.0, 0.0), 5));
        engine.step(0.0);
        engine.step(-1.0);
        assert_eq!(engine.particles()[0].position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_electron_pulled_toward_nucleus() {
        let mut engine = SimulationEngine::new(1);
        engine.add_particle(nucleus(Vec3::ZERO, 1.0, 1));
        engine.add_particle(electron(Vec3::new(5.0, 0.0, 0.0), 2));
        engine.step(0.008);
        let e = engine.particles()[1];
        assert!(e.position.x < 5.0);
        assert_eq!(e.position.y, 0.0);
        assert_eq!(e.position.z, 0.0);
    }

    #[test]
    fn test_min_distance_floors_the_force() {
        let mut engine = SimulationEngine::new(1);
        engine.min_distance = 2.0;
        engine.add_particle(nucleus(Vec3::ZERO, 1.0, 1));
        engine.add_particle(electron(Vec3::new(0.001, 0.0, 0.0), 2));
        let dt = 0.1;
        engine.step(dt);
        // magnitude clamps at r = 2: a = k / (r^2 * m) = 1 / (4 * 0.02) = 12.5
        let expected = 12.5 * dt * dt;
        let moved = 0.001 - engine.particles()[1].position.x;
        assert!((moved - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nucleus_pairs_hold_rest_distance() {
        let mut engine = SimulationEngine::new(1);
        engine.add_particle(nucleus(Vec3::ZERO, 1.0, 1));
        engine.add_particle(nucleus(Vec3::new(3.0, 0.0, 0.0), 1.0, 2));
        for _ in 0..5 {
            engine.step(0.008);
            let d = engine.particles()[0]
                .position
                .distance(engine.particles()[1].position);
            assert!((d - engine.rest_distance).abs() < 1e-9, "distance {d}");
        }
    }

    #[test]
    fn test_constraint_split_is_mass_weighted() {
        let mut engine = SimulationEngine::new(1);
        engine.constraint_iterations = 1;
        engine.add_particle(nucleus(Vec3::ZERO, 3.0, 1));
        engine.add_particle(nucleus(Vec3::new(2.0, 0.0, 0.0), 1.0, 2));
        engine.step(0.008);
        // heavy nucleon takes a quarter of the correction, light one the rest
        let heavy = engine.particles()[0].position;
        let light = engine.particles()[1].position;
        assert!((heavy.x - 0.25).abs() < 1e-9);
        assert!((light.x - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_nucleus_center_is_mass_weighted() {
        let mut engine = SimulationEngine::new(1);
        engine.add_particle(nucleus(Vec3::ZERO, 1.0, 1));
        engine.add_particle(nucleus(Vec3::new(4.0, 0.0, 0.0), 3.0, 2));
        assert_eq!(engine.nucleus_center(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_jitter_runs_are_seed_deterministic() {
        let mut a = SimulationEngine::new(42);
        let mut b = SimulationEngine::new(42);
        for engine in [&mut a, &mut b] {
            engine.set_jitter(0.01);
            engine.add_particle(nucleus(Vec3::ZERO, 1.0, 1));
            engine.add_particle(nucleus(Vec3::new(1.0, 0.0, 0.0), 1.0, 2));
            for _ in 0..50 {
                engine.step(0.008);
            }
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_snapshot_mirrors_particles() {
        let mut engine = SimulationEngine::new(1);
        engine.add_particle(nucleus(Vec3::new(0.1, 0.2, 0.3), 1.0, 1));
        engine.add_particle(electron(Vec3::new(5.0, 0.0, 0.0), 9));
        let shot = engine.snapshot();
        assert_eq!(shot.len(), 2);
        assert_eq!(shot[0].id, PointId::new(1));
        assert!(shot[0].kind.is_nucleus());
        assert_eq!(shot[1].id, PointId::new(9));
        assert_eq!(shot[1].position, Vec3::new(5.0, 0.0, 0.0));
    }
}
