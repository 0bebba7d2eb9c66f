//! Closed-form 1D collision response and energy/momentum accounting.
//!
//! Post-collision velocities come from combining conservation of momentum
//!
//! ```text
//! m1*v1i + m2*v2i = m1*v1f + m2*v2f
//! ```
//!
//! with the definition of the coefficient of restitution
//!
//! ```text
//! e = -(v1f - v2f) / (v1i - v2i)
//! ```
//!
//! Everything here is a total function of its inputs. Callers keep
//! `m1 + m2 > 0`; `CollisionParameters::validate` guarantees it for runs.

use crate::common::CollisionParameters;

/// Velocities of both bodies after the collision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FinalVelocities {
    pub v1f: f64,
    pub v2f: f64,
}

/// Solves for the post-collision velocities of two bodies on a line.
///
/// `e = 1` reduces to the elastic formula, `e = 0` leaves both bodies at the
/// common (centre of mass) velocity.
pub fn solve(m1: f64, v1i: f64, m2: f64, v2i: f64, e: f64) -> FinalVelocities {
    let total_momentum = total_momentum(m1, v1i, m2, v2i);
    let relative_velocity = v1i - v2i;
    let total_mass = m1 + m2;

    FinalVelocities {
        v1f: (total_momentum - m2 * e * relative_velocity) / total_mass,
        v2f: (total_momentum + m1 * e * relative_velocity) / total_mass,
    }
}

/// Total kinetic energy of the pair.
pub fn kinetic_energy(m1: f64, v1: f64, m2: f64, v2: f64) -> f64 {
    0.5 * m1 * v1 * v1 + 0.5 * m2 * v2 * v2
}

/// Total linear momentum of the pair.
pub fn total_momentum(m1: f64, v1: f64, m2: f64, v2: f64) -> f64 {
    m1 * v1 + m2 * v2
}

/// Readouts shown next to the input fields, before and during a run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiveStats {
    pub initial_momentum: f64,
    pub final_momentum: f64,
    pub v1f: f64,
    pub v2f: f64,
    pub initial_kinetic_energy: f64,
    pub final_kinetic_energy: f64,
    /// `initial_kinetic_energy - final_kinetic_energy`, unrounded.
    pub energy_loss: f64,
}

/// Computes every readout for a parameter set.
///
/// Does not validate: this runs on every keystroke, including while the
/// inputs describe a collision that can never happen.
pub fn compute_live_stats(params: &CollisionParameters) -> LiveStats {
    let CollisionParameters { m1, v1i, m2, v2i, restitution } = *params;
    let FinalVelocities { v1f, v2f } = solve(m1, v1i, m2, v2i, restitution);

    let initial_kinetic_energy = kinetic_energy(m1, v1i, m2, v2i);
    let final_kinetic_energy = kinetic_energy(m1, v1f, m2, v2f);

    LiveStats {
        initial_momentum: total_momentum(m1, v1i, m2, v2i),
        final_momentum: total_momentum(m1, v1f, m2, v2f),
        v1f,
        v2f,
        initial_kinetic_energy,
        final_kinetic_energy,
        energy_loss: initial_kinetic_energy - final_kinetic_energy,
    }
}
