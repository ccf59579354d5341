// src/adversity/command.rs

use crate::adversity::descriptor::Placement;
use crate::collision::Footprint;

/// 車線変更の方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneChangeDirection {
    Left,
    Right,
}

/// 生成するオブジェクトの種別
///
/// 各種別の寸法はシミュレータの既定車両型を複製してカスタマイズする
/// 際の値に対応する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    DefaultVehicle,
    Truck,
    Pedestrian,
    EmergencyVehicle,
    ConstructionCone,
    ConstructionBarrier,
    ConstructionSign,
}

impl ObjectKind {
    /// シミュレータ上の車両型ID
    pub fn type_id(&self) -> &'static str {
        match self {
            ObjectKind::DefaultVehicle => "DEFAULT_VEHTYPE",
            ObjectKind::Truck => "TRUCK",
            ObjectKind::Pedestrian => "PEDESTRIAN",
            ObjectKind::EmergencyVehicle => "EMERGENCY",
            ObjectKind::ConstructionCone => "CONSTRUCTION_CONE",
            ObjectKind::ConstructionBarrier => "CONSTRUCTION_BARRIER",
            ObjectKind::ConstructionSign => "CONSTRUCTION_SIGN",
        }
    }

    /// 全長 (m)
    pub fn length(&self) -> f64 {
        match self {
            ObjectKind::DefaultVehicle => 5.0,
            ObjectKind::Truck => 10.0,
            ObjectKind::Pedestrian => 0.5,
            ObjectKind::EmergencyVehicle => 5.0,
            ObjectKind::ConstructionCone => 0.3,
            ObjectKind::ConstructionBarrier => 1.5,
            ObjectKind::ConstructionSign => 0.8,
        }
    }

    /// 全幅 (m)
    pub fn width(&self) -> f64 {
        match self {
            ObjectKind::DefaultVehicle => 1.8,
            ObjectKind::Truck => 2.5,
            ObjectKind::Pedestrian => 0.5,
            ObjectKind::EmergencyVehicle => 1.8,
            ObjectKind::ConstructionCone => 0.3,
            ObjectKind::ConstructionBarrier => 0.6,
            ObjectKind::ConstructionSign => 0.3,
        }
    }

    /// 高さ (m)
    pub fn height(&self) -> f64 {
        match self {
            ObjectKind::DefaultVehicle => 1.5,
            ObjectKind::Truck => 4.0,
            ObjectKind::Pedestrian => 1.7,
            ObjectKind::EmergencyVehicle => 1.8,
            ObjectKind::ConstructionCone => 0.7,
            ObjectKind::ConstructionBarrier => 1.0,
            ObjectKind::ConstructionSign => 1.5,
        }
    }

    /// 衝突予測に使う外形モデル
    pub fn footprint(&self) -> Footprint {
        match self {
            ObjectKind::DefaultVehicle | ObjectKind::Truck | ObjectKind::EmergencyVehicle => {
                Footprint::vehicle(self.length(), self.width())
            }
            _ => Footprint::other(self.length(), self.width()),
        }
    }

    /// 車両型ID名からの逆引き
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DEFAULT_VEHTYPE" | "" => Some(ObjectKind::DefaultVehicle),
            "TRUCK" => Some(ObjectKind::Truck),
            "PEDESTRIAN" => Some(ObjectKind::Pedestrian),
            "EMERGENCY" | "FIREBRIGADE" | "POLICE" => Some(ObjectKind::EmergencyVehicle),
            "CONSTRUCTION_CONE" => Some(ObjectKind::ConstructionCone),
            "CONSTRUCTION_BARRIER" => Some(ObjectKind::ConstructionBarrier),
            "CONSTRUCTION_SIGN" => Some(ObjectKind::ConstructionSign),
            _ => None,
        }
    }
}

/// 敵対的イベントが外部のシミュレーション制御層へ発行する指令
///
/// このコアは指令を生成するだけで、適用は外部環境の責務。
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// 目標速度の上書き
    SpeedOverride {
        agent_id: String,
        target_speed: f64, // 目標速度 (m/s)
        duration: f64,     // 継続時間 (s)
    },
    /// 車線変更の指示
    LaneChange {
        agent_id: String,
        direction: LaneChangeDirection,
        duration: f64,             // 車線変更に使う時間 (s)
        target_speed: Option<f64>, // 変更後の目標速度 (m/s)
    },
    /// 静的オブジェクトの生成
    SpawnObject {
        object_id: String,
        kind: ObjectKind,
        placement: Placement,
        lateral_offset: f64, // 車線中心からの横方向オフセット (m)
    },
    /// オブジェクト位置の再固定（毎ティックの位置・速度維持）
    PinObject {
        object_id: String,
        placement: Placement,
    },
    /// オブジェクトの除去
    RemoveObject { object_id: String },
    /// 車線全体の閉鎖
    CloseLane { lane_id: String },
    /// 閉鎖した車線の再開放
    ReopenLane { lane_id: String },
}
