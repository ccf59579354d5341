// src/lib.rs

//! 自動運転ソフトウェアをストレステストするための敵対的走行イベントコア。
//! 軌道の衝突予測エンジンと、敵対的イベントのライフサイクル状態機械を提供する。

pub mod adversity;
pub mod collision;
pub mod config;
pub mod math;
pub mod simulation;
pub mod trajectory;

pub use adversity::{AdversityBehavior, AdversityState, Command, Observation};
pub use collision::{AgentCategory, Footprint};
pub use trajectory::{Trajectory, TrajectoryPoint};
