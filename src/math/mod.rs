// src/math/mod.rs

pub mod angle;

pub use angle::angle_difference;
pub use angle::euclidean_distance;
pub use angle::to_math_angle;
pub use angle::to_sim_angle;
