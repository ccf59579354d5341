// src/collision/mod.rs

pub mod check;
pub mod error;
pub mod footprint;

pub use check::check_collision;
pub use check::check_intersection;
pub use check::DEFAULT_DISTANCE_THRESHOLD;
pub use error::CollisionError;
pub use footprint::AgentCategory;
pub use footprint::Footprint;
