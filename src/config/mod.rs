// src/config/mod.rs

pub mod profile;

pub use profile::{AdversityProfile, ScenarioProfile};
