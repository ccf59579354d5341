// src/trajectory/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TrajectoryError {
    #[error("軌道のサンプル数が不足しています（{actual} 点、最低 2 点必要）。")]
    TooFewSamples { actual: usize },
    #[error("時刻列が単調増加ではありません（インデックス {index}）。")]
    NonMonotonicTime { index: usize },
    #[error("リサンプル間隔 {dt} が正ではありません。")]
    NonPositiveResolution { dt: f64 },
}
