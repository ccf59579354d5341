// src/adversity/mod.rs

pub mod behavior;
pub mod command;
pub mod construction;
pub mod cut_in;
pub mod descriptor;
pub mod error;
pub mod observation;
pub mod rear_end;
pub mod stalled_object;

pub use behavior::{AdversityBehavior, AdversityClass, AdversityCore, AdversityState};
pub use command::{Command, LaneChangeDirection, ObjectKind};
pub use construction::ConstructionAdversity;
pub use cut_in::CutInAdversity;
pub use descriptor::{AdversityDescriptor, CollisionType, Placement};
pub use error::AdversityError;
pub use observation::{ObsValue, Observation};
pub use rear_end::RearEndAdversity;
pub use stalled_object::StalledObjectAdversity;
