// src/collision/error.rs

use thiserror::Error;

use crate::trajectory::TrajectoryError;

#[derive(Error, Debug, PartialEq)]
pub enum CollisionError {
    #[error("軌道のサンプル数が一致しません（{left} 点と {right} 点）。")]
    SampleCountMismatch { left: usize, right: usize },
    #[error("軌道の時刻が一致しません（インデックス {index}）。")]
    TimestampMismatch { index: usize },
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}
