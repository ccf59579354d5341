// src/config/profile.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::adversity::{AdversityDescriptor, CollisionType, Placement};

/// シナリオ設定ファイル全体
#[derive(Debug, Deserialize)]
pub struct ScenarioProfile {
    pub adversities: Vec<AdversityProfile>,
}

/// 敵対的イベント1件の設定
///
/// 配置は車線指定（lane_id + lane_position）か絶対座標指定
/// （x + y + angle）のどちらか。動的イベントでは省略できる。
#[derive(Debug, Deserialize)]
pub struct AdversityProfile {
    pub kind: String, // "cut_in" | "rear_end" | "stalled_object" | "construction"
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub ego_type: String,
    #[serde(default = "default_probability")]
    pub probability: f64,
    #[serde(default)]
    pub predicted_collision_type: String,
    #[serde(default)]
    pub lane_id: Option<String>,
    #[serde(default)]
    pub lane_position: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default = "default_end_time")]
    pub end_time: f64,
    #[serde(default)]
    pub object_type: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

fn default_probability() -> f64 {
    1.0
}

fn default_end_time() -> f64 {
    -1.0
}

impl AdversityProfile {
    /// 設定からランタイム記述子への変換
    ///
    /// 配置の指定が不完全な場合（座標の一部だけなど）は警告を出して
    /// 配置なしとして扱う。適用可否は各イベント型の is_effective が
    /// あらためて判定する。
    pub fn descriptor(&self) -> AdversityDescriptor {
        let placement = match (
            &self.lane_id,
            self.lane_position,
            self.x,
            self.y,
            self.angle,
        ) {
            (Some(lane_id), Some(position), _, _, _) => Some(Placement::LanePosition {
                lane_id: lane_id.clone(),
                position,
            }),
            (None, None, Some(x), Some(y), Some(angle)) => {
                Some(Placement::XyAngle { x, y, angle })
            }
            (None, None, None, None, None) => None,
            _ => {
                warn!(
                    kind = %self.kind,
                    "配置の指定が不完全なため配置なしとして扱います"
                );
                None
            }
        };
        AdversityDescriptor {
            location: self.location.clone(),
            ego_type: self.ego_type.clone(),
            probability: self.probability,
            predicted_collision_type: CollisionType::from_name(&self.predicted_collision_type),
            placement,
            start_time: self.start_time,
            end_time: self.end_time,
            object_type: self.object_type.clone(),
            settings: self.settings.clone(),
        }
    }
}
