/// Stores information about a contact between the two bodies on the collision axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    /// Signed gap between centres, `position_b - position_a`.
    /// Negative once the bodies have passed through each other within a frame.
    pub distance: f64,
    /// The amount of overlap between the spheres, `radius_a + radius_b - distance`.
    pub depth: f64,
}
