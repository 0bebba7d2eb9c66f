use crate::objects::Body;
use super::manifold::CollisionManifold;

/// Checks for contact between the left body `body_a` and the right body `body_b`.
/// Touching counts as contact. Returns a CollisionManifold if they collide, None otherwise.
pub fn check_sphere_sphere(body_a: &Body, body_b: &Body) -> Option<CollisionManifold> {
    let distance = body_b.position - body_a.position;
    let radii_sum = body_a.radius + body_b.radius;

    if distance <= radii_sum {
        Some(CollisionManifold {
            distance,
            depth: radii_sum - distance,
        })
    } else {
        None // No collision
    }
}
