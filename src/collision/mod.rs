pub mod detection;
pub mod manifold;
pub mod solver;

// Re-export key types
pub use detection::*;
pub use manifold::*;
pub use solver::{
    compute_live_stats, kinetic_energy, solve, total_momentum, FinalVelocities, LiveStats,
};
