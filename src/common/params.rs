//! User-supplied inputs for a single collision run.

use std::cmp::Ordering;

use crate::collision::solver::{self, FinalVelocities};
use crate::common::ValidationError;

/// Masses, initial velocities and restitution coefficient of one run.
/// Object 1 starts on the left, object 2 on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParameters {
    pub m1: f64,
    pub v1i: f64,
    pub m2: f64,
    pub v2i: f64,
    /// Coefficient of restitution. Range [0, 1].
    /// 0 = perfectly inelastic (bodies stick), 1 = perfectly elastic.
    pub restitution: f64,
}

impl CollisionParameters {
    /// Creates a parameter set, clamping the restitution coefficient into [0, 1].
    pub fn new(m1: f64, v1i: f64, m2: f64, v2i: f64, restitution: f64) -> Self {
        Self {
            m1,
            v1i,
            m2,
            v2i,
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Checks that a collision is possible in the left-to-right layout.
    /// Checks run in a fixed order and the first failure wins.
    ///
    /// A pair that is ordered but not finite (an infinite velocity, or a
    /// momentum or final velocity that overflows) cannot be simulated and is
    /// reported as `WrongOrderVelocities`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_mass(self.m1) || !is_valid_mass(self.m2) {
            return Err(ValidationError::InvalidMass);
        }
        match self.v1i.partial_cmp(&self.v2i) {
            Some(Ordering::Greater) => {}
            Some(Ordering::Equal) => return Err(ValidationError::EqualVelocities),
            // Less, or unordered because of a NaN
            _ => return Err(ValidationError::WrongOrderVelocities),
        }
        if !self.has_finite_outcome() {
            return Err(ValidationError::WrongOrderVelocities);
        }
        Ok(())
    }

    fn has_finite_outcome(&self) -> bool {
        let FinalVelocities { v1f, v2f } = self.solve();
        [self.v1i, self.v2i, self.initial_momentum(), v1f, v2f]
            .iter()
            .all(|value| value.is_finite())
    }

    pub fn total_mass(&self) -> f64 {
        self.m1 + self.m2
    }

    pub fn initial_momentum(&self) -> f64 {
        solver::total_momentum(self.m1, self.v1i, self.m2, self.v2i)
    }

    /// Post-collision velocities for these parameters.
    pub fn solve(&self) -> FinalVelocities {
        solver::solve(self.m1, self.v1i, self.m2, self.v2i, self.restitution)
    }
}

impl Default for CollisionParameters {
    /// Two unit masses approaching each other head on, elastically.
    fn default() -> Self {
        Self {
            m1: 1.0,
            v1i: 2.0,
            m2: 1.0,
            v2i: -2.0,
            restitution: 1.0,
        }
    }
}

fn is_valid_mass(mass: f64) -> bool {
    mass > 0.0 && mass.is_finite()
}
