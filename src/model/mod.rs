//! The physical setup of a run.

mod body;
pub mod estimate;
mod rotor;
mod scene;

pub use body::{Body, BodyInfo, OrbitalRange};
pub use rotor::{horizon_distance, Acceleration, RotatingObject};
pub use scene::{Newtonian, Scene};
