//! Verlet particle state

use orrery_core::{ParticleKind, Vec3};

/// One simulated particle
///
/// Velocity is implicit: the integrator keeps the current and previous
/// positions and derives velocity as `(position - previous) / dt`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParticle {
    pub position: Vec3,
    pub previous_position: Vec3,
    pub mass: f64,
    /// Signed charge; positive nucleons, negative electrons
    pub charge: f64,
    pub kind: ParticleKind,
    /// Feed id; zero asks the engine to assign the next free one
    pub id: i64,
}

impl SimParticle {
    /// New particle at rest
    pub fn new(position: Vec3, mass: f64, charge: f64, kind: ParticleKind, id: i64) -> Self {
        SimParticle {
            position,
            previous_position: position,
            mass,
            charge,
            kind,
            id,
        }
    }

    /// Effective velocity of the Verlet pair
    pub fn velocity(&self, dt: f64) -> Vec3 {
        if dt <= 0.0 {
            return Vec3::ZERO;
        }
        (self.position - self.previous_position) * (1.0 / dt)
    }

    /// Rewrite the previous position so the effective velocity becomes `v`
    pub fn set_velocity(&mut self, v: Vec3, dt: f64) {
        self.previous_position = self.position - v * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_round_trip() {
        let mut p = SimParticle::new(Vec3::new(1.0, 2.0, 3.0), 1.0, 1.0, ParticleKind::Nucleus, 1);
        p.set_velocity(Vec3::new(0.0, 6.5, 0.0), 0.008);
        let v = p.velocity(0.008);
        assert!((v.y - 6.5).abs() < 1e-9);
        assert!(v.x.abs() < 1e-9 && v.z.abs() < 1e-9);
    }

    #[test]
    fn test_new_particle_is_at_rest() {
        let p = SimParticle::new(Vec3::new(5.0, 0.0, 0.0), 0.02, -1.0, ParticleKind::Electron, 5);
        assert_eq!(p.velocity(0.008), Vec3::ZERO);
        assert_eq!(p.position, p.previous_position);
    }

    #[test]
    fn test_velocity_with_zero_dt_is_zero() {
        let mut p = SimParticle::new(Vec3::ZERO, 1.0, 1.0, ParticleKind::Nucleus, 1);
        p.set_velocity(Vec3::new(1.0, 0.0, 0.0), 0.008);
        assert_eq!(p.velocity(0.0), Vec3::ZERO);
    }
}
