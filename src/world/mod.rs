pub mod simulation;

pub use simulation::{RunHandle, Simulation, SimulationPhase, StepEvent, StepReport};
