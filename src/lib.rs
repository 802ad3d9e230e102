pub mod config;
pub mod error;
pub mod math;
pub mod model;
pub mod occlusion;
pub mod report;
pub mod scan;
