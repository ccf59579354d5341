// src/adversity/descriptor.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::adversity::error::AdversityError;

/// 静的オブジェクトの配置指定
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// 車線IDと車線上の位置による配置
    LanePosition { lane_id: String, position: f64 },
    /// 絶対座標と方位角による配置
    XyAngle { x: f64, y: f64, angle: f64 },
}

/// 予測される衝突類型のタグ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    RearEnd,
    CutIn,
    HeadOn,
    SideSwipe,
    RunIntoStatic,
    Unknown,
}

impl CollisionType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "rear_end" => CollisionType::RearEnd,
            "cut_in" => CollisionType::CutIn,
            "head_on" => CollisionType::HeadOn,
            "side_swipe" => CollisionType::SideSwipe,
            "run_into_static" => CollisionType::RunIntoStatic,
            _ => CollisionType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionType::RearEnd => "rear_end",
            CollisionType::CutIn => "cut_in",
            CollisionType::HeadOn => "head_on",
            CollisionType::SideSwipe => "side_swipe",
            CollisionType::RunIntoStatic => "run_into_static",
            CollisionType::Unknown => "unknown",
        }
    }
}

/// 敵対的イベントの不変な識別・配置データ
///
/// シナリオ設定の読み込み時に一度だけ生成され、実行をまたいで
/// 再利用できる。実行ごとの可変状態は各イベント型のインスタンス
/// （`AdversityCore` を内包する構造体）が持つ。
#[derive(Debug, Clone, PartialEq)]
pub struct AdversityDescriptor {
    pub location: String,                   // 発生場所タグ（例: "highway"）
    pub ego_type: String,                   // 対象エージェント種別
    pub probability: f64,                   // トリガ確率 [0, 1]
    pub predicted_collision_type: CollisionType,
    pub placement: Option<Placement>,       // 静的イベントの配置（動的では None）
    pub start_time: f64,                    // 有効期間の開始 (s)
    pub end_time: f64,                      // 有効期間の終了 (s)。-1 は無期限
    pub object_type: String,                // 生成オブジェクトの型名
    pub settings: BTreeMap<String, String>, // 自由形式の追加設定
}

impl AdversityDescriptor {
    /// 構築時パラメータの検証
    ///
    /// 範囲外の確率と、開始より前の（有界な）終了時刻は構築時エラーで、
    /// 黙って既定値に置き換えることはしない。
    pub fn validate(&self) -> Result<(), AdversityError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(AdversityError::InvalidProbability(self.probability));
        }
        if self.end_time >= 0.0 && self.end_time < self.start_time {
            return Err(AdversityError::InvalidTimeWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    /// 追加設定から数値を取得する（欠落・解析失敗時は既定値）
    pub fn setting_f64(&self, key: &str, default: f64) -> f64 {
        match self.settings.get(key).map(|v| v.parse::<f64>()) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                debug!(key, "設定値を数値として解析できないため既定値を使用します");
                default
            }
            None => default,
        }
    }

    /// 追加設定から文字列を取得する（欠落時は既定値）
    pub fn setting_str(&self, key: &str, default: &str) -> String {
        self.settings
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// 追加設定から真偽値を取得する（欠落・解析失敗時は既定値）
    pub fn setting_bool(&self, key: &str, default: bool) -> bool {
        match self.settings.get(key).map(|v| v.parse::<bool>()) {
            Some(Ok(value)) => value,
            _ => default,
        }
    }
}

impl Default for AdversityDescriptor {
    fn default() -> Self {
        Self {
            location: String::new(),
            ego_type: String::new(),
            probability: 1.0,
            predicted_collision_type: CollisionType::Unknown,
            placement: None,
            start_time: 0.0,
            end_time: -1.0,
            object_type: String::new(),
            settings: BTreeMap::new(),
        }
    }
}
