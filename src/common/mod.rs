pub mod config;
pub mod error;
pub mod params;

pub use config::SimulationConfig;
pub use error::{ConfigError, ValidationError};
pub use params::CollisionParameters;
