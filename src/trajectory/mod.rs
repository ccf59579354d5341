// src/trajectory/mod.rs

pub mod error;
pub mod normalize;
pub mod resample;

pub use error::TrajectoryError;
pub use normalize::normalize_trajectory;
pub use resample::resample;

/// 軌道上の1サンプル点
///
/// シミュレータ系では `heading` は北基準・時計回りの度単位。
/// `normalize_trajectory` 後は東基準・反時計回りのラジアン単位になる。
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,            // 位置X (m)
    pub y: f64,            // 位置Y (m)
    pub heading: f64,      // 方位角
    pub time: f64,         // 時刻 (s)
    pub extras: Vec<f64>,  // 補助チャネル（変換時はそのまま通過）
}

impl TrajectoryPoint {
    pub fn new(x: f64, y: f64, heading: f64, time: f64) -> Self {
        Self {
            x,
            y,
            heading,
            time,
            extras: Vec::new(),
        }
    }
}

/// 時刻順に並んだサンプル列
pub type Trajectory = Vec<TrajectoryPoint>;
