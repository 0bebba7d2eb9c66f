pub mod body;

pub use body::{radius_for_mass, Body};
