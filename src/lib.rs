pub mod common;
pub mod objects;
pub mod collision;
pub mod integration;
pub mod world;

// Re-export key types for easier use
pub use common::{CollisionParameters, ConfigError, SimulationConfig, ValidationError};
pub use objects::Body;
pub use collision::{compute_live_stats, kinetic_energy, solve, FinalVelocities, LiveStats};
pub use integration::FrameClock;
pub use world::{RunHandle, Simulation, SimulationPhase, StepEvent, StepReport};
