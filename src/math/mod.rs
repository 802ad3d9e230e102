pub mod constants;
pub mod geometry;
pub mod real;
pub mod solids;

pub use geometry::{DirectedVector, Plane, Point3, Projection, Side};
pub use real::{Kernel, Real, DEFAULT_PRECISION};
pub use solids::{Ball, Cut, Half, MassPoint};
