// src/simulation/mod.rs

pub mod load;
pub mod manager;

pub use load::load_adversity_profiles;
pub use manager::{build_adversity, AdversityManager};
