pub mod clock;
pub mod integrator;

pub use clock::FrameClock;
pub use integrator::{clamp_frame_dt, integrate};
