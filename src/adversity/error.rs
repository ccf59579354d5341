// src/adversity/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AdversityError {
    #[error("トリガ確率 {0} が [0, 1] の範囲外です。")]
    InvalidProbability(f64),
    #[error("終了時刻 {end} が開始時刻 {start} より前です。")]
    InvalidTimeWindow { start: f64, end: f64 },
    #[error("未知の敵対的イベント種別です: {0}")]
    UnknownAdversityKind(String),
}
