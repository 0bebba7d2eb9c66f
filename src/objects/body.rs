/// One of the two colliding spheres, reduced to its motion along the collision axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    // Physical properties
    pub mass: f64,
    /// Visual radius, `radius_scale * cbrt(mass)`. Used for contact detection only.
    pub radius: f64,

    // Primary state
    pub position: f64, // x-coordinate of the centre on the collision axis
    pub initial_velocity: f64,
    /// Velocity after the collision. Fixed when the run starts.
    pub final_velocity: f64,
}

impl Body {
    /// Creates a body at the origin, at rest, with its radius derived from mass.
    /// Panics if mass is not positive; validated parameters never trigger this.
    pub fn new(mass: f64, radius_scale: f64) -> Self {
        assert!(mass > 0.0, "Body mass must be positive");
        Self {
            mass,
            radius: radius_for_mass(mass, radius_scale),
            position: 0.0,
            initial_velocity: 0.0,
            final_velocity: 0.0,
        }
    }

    pub fn initial_momentum(&self) -> f64 {
        self.mass * self.initial_velocity
    }

    pub fn final_momentum(&self) -> f64 {
        self.mass * self.final_velocity
    }
}

/// Volumetric display radius: a sphere of uniform density scales with the cube root of its mass.
pub fn radius_for_mass(mass: f64, radius_scale: f64) -> f64 {
    radius_scale * mass.cbrt()
}
