// src/adversity/construction.rs

use uuid::Uuid;

use crate::adversity::behavior::{
    AdversityBehavior, AdversityClass, AdversityCore, AdversityState,
};
use crate::adversity::command::{Command, ObjectKind};
use crate::adversity::descriptor::{AdversityDescriptor, Placement};
use crate::adversity::error::AdversityError;
use crate::adversity::observation::Observation;

/// 工事規制帯を構成する区間の種別
///
/// 車線方向に 予告 → 導入テーパ → 緩衝 → 作業 → 復帰テーパ → 終了
/// の順で並ぶ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Warning,
    TaperIn,
    Buffer,
    Work,
    TaperOut,
    Termination,
}

/// 規制帯1区間の車線上の範囲
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub begin: f64,
    pub end: f64,
}

/// 各区間の長さ (m)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneLengths {
    pub warning: f64,
    pub taper_in: f64,
    pub buffer: f64,
    pub taper_out: f64,
    pub termination: f64,
}

impl Default for ZoneLengths {
    fn default() -> Self {
        Self {
            warning: 100.0,
            taper_in: 60.0,
            buffer: 10.0,
            taper_out: 30.0,
            termination: 30.0,
        }
    }
}

/// 規制区間 [start, end] から6区間の配置を計算する
///
/// 予告区間は start の手前に、終了区間は end の後ろに置かれる。
/// 作業区間は緩衝区間の終わりから end − taper_out まで。
///
/// # 引数
/// - `start`: 規制の開始位置（導入テーパの起点） (m)
/// - `end`: 規制の終了位置（復帰テーパの終点） (m)
/// - `lengths`: 各区間の長さ
pub fn zone_layout(start: f64, end: f64, lengths: &ZoneLengths) -> Vec<Zone> {
    let taper_in_end = start + lengths.taper_in;
    let buffer_end = taper_in_end + lengths.buffer;
    let work_end = end - lengths.taper_out;
    vec![
        Zone {
            kind: ZoneKind::Warning,
            begin: start - lengths.warning,
            end: start,
        },
        Zone {
            kind: ZoneKind::TaperIn,
            begin: start,
            end: taper_in_end,
        },
        Zone {
            kind: ZoneKind::Buffer,
            begin: taper_in_end,
            end: buffer_end,
        },
        Zone {
            kind: ZoneKind::Work,
            begin: buffer_end,
            end: work_end,
        },
        Zone {
            kind: ZoneKind::TaperOut,
            begin: work_end,
            end,
        },
        Zone {
            kind: ZoneKind::Termination,
            begin: end,
            end: end + lengths.termination,
        },
    ]
}

/// MUTCD 流の速度依存の設置間隔 (m)
///
/// 制限速度 (mph) をフィート値とみなした間隔をメートルへ換算する。
/// テーパ区間は1倍、作業・緩衝区間は2倍、予告区間は3倍
/// （ただし 30 m を下回らない）。
pub fn mutcd_spacing(kind: ZoneKind, speed_limit_mph: f64) -> f64 {
    let base = speed_limit_mph * 0.3048;
    match kind {
        ZoneKind::TaperIn | ZoneKind::TaperOut => base,
        ZoneKind::Work | ZoneKind::Buffer | ZoneKind::Termination => 2.0 * base,
        ZoneKind::Warning => (3.0 * base).max(30.0),
    }
}

/// 固定の設置間隔 (m)
///
/// 予告区間は 30 m 固定、テーパは基準の 0.7 倍、緩衝は 0.8 倍。
fn static_spacing(kind: ZoneKind, base: f64) -> f64 {
    match kind {
        ZoneKind::Warning => 30.0,
        ZoneKind::TaperIn | ZoneKind::TaperOut => 0.7 * base,
        ZoneKind::Buffer => 0.8 * base,
        ZoneKind::Work | ZoneKind::Termination => base,
    }
}

/// 区間と区間内の設置順序から置く物体の種別を決める
fn object_kind_for(kind: ZoneKind, index: usize) -> ObjectKind {
    match kind {
        ZoneKind::Warning | ZoneKind::Termination => ObjectKind::ConstructionSign,
        ZoneKind::TaperIn | ZoneKind::TaperOut | ZoneKind::Work => ObjectKind::ConstructionCone,
        // 緩衝区間はコーン2本ごとにバリアを挟む
        ZoneKind::Buffer => {
            if index % 3 == 2 {
                ObjectKind::ConstructionBarrier
            } else {
                ObjectKind::ConstructionCone
            }
        }
    }
}

/// 3p² − 2p³ の滑らかな遷移カーブ
fn s_curve(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    3.0 * p * p - 2.0 * p * p * p
}

/// 設置予定の1物体
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedObject {
    pub kind: ObjectKind,
    pub zone: ZoneKind,
    pub position: f64,       // 車線上の位置 (m)
    pub lateral_offset: f64, // 車線中心からの横方向オフセット (m)
}

/// 工事規制イベント
///
/// 車線の一部（または全体）を規制する。部分規制では区間ごとに
/// 標識・コーン・バリアを設置間隔に従って並べ、テーパ区間では
/// 横方向オフセットを車線端から作業位置まで滑らかに変化させる。
/// 全面規制では車線閉鎖の指令を発行する。
pub struct ConstructionAdversity {
    core: AdversityCore,
    full_lane: bool,
    lane_width: f64,
    work_zone_offset: f64,
    closure_length: f64,
    lengths: ZoneLengths,
    base_spacing: f64,
    dynamic_spacing: bool,
    speed_limit_mph: f64,
    closed_lane: Option<String>,
}

impl ConstructionAdversity {
    pub fn new(descriptor: AdversityDescriptor, seed: u64) -> Result<Self, AdversityError> {
        let full_lane = descriptor.setting_bool("full_lane", false);
        let lane_width = descriptor.setting_f64("lane_width", 3.2);
        let work_zone_offset = descriptor.setting_f64("work_zone_offset", 0.0);
        let closure_length = descriptor.setting_f64("closure_length", 200.0);
        let lengths = ZoneLengths {
            warning: descriptor.setting_f64("warning_length", 100.0),
            taper_in: descriptor.setting_f64("taper_in_length", 60.0),
            buffer: descriptor.setting_f64("buffer_length", 10.0),
            taper_out: descriptor.setting_f64("taper_out_length", 30.0),
            termination: descriptor.setting_f64("termination_length", 30.0),
        };
        let base_spacing = descriptor.setting_f64("spacing", 20.0);
        let dynamic_spacing = descriptor.setting_bool("dynamic_spacing", false);
        let speed_limit_mph = descriptor.setting_f64("speed_limit_mph", 45.0);
        let mut core = AdversityCore::new(descriptor, seed)?;
        core.arm();
        Ok(Self {
            core,
            full_lane,
            lane_width,
            work_zone_offset,
            closure_length,
            lengths,
            base_spacing,
            dynamic_spacing,
            speed_limit_mph,
            closed_lane: None,
        })
    }

    fn spacing_for(&self, kind: ZoneKind) -> f64 {
        if self.dynamic_spacing {
            mutcd_spacing(kind, self.speed_limit_mph)
        } else {
            static_spacing(kind, self.base_spacing)
        }
    }

    /// 車線端寄りの設置オフセット
    ///
    /// 物体の半幅ぶんだけ端から内側へ逃がす代わりに 0.3 m の
    /// 固定マージンを取る。
    fn edge_offset(&self) -> f64 {
        self.lane_width / 2.0 - 0.3
    }

    /// 区間内の位置に応じた横方向オフセット
    fn lateral_offset_at(&self, zone: &Zone, position: f64) -> f64 {
        let edge = self.edge_offset();
        match zone.kind {
            ZoneKind::Warning | ZoneKind::Termination => edge,
            ZoneKind::Buffer | ZoneKind::Work => self.work_zone_offset,
            ZoneKind::TaperIn => {
                let p = (position - zone.begin) / (zone.end - zone.begin);
                edge + (self.work_zone_offset - edge) * s_curve(p)
            }
            ZoneKind::TaperOut => {
                let p = (position - zone.begin) / (zone.end - zone.begin);
                self.work_zone_offset + (edge - self.work_zone_offset) * s_curve(p)
            }
        }
    }

    /// 規制の開始位置（記述子の配置から）
    fn closure_start(&self) -> Option<f64> {
        match &self.core.descriptor.placement {
            Some(Placement::LanePosition { position, .. }) => Some(*position),
            _ => None,
        }
    }

    /// 部分規制で設置する全物体の計画
    pub fn plan_objects(&self) -> Vec<PlannedObject> {
        let start = match self.closure_start() {
            Some(v) => v,
            None => return Vec::new(),
        };
        let zones = zone_layout(start, start + self.closure_length, &self.lengths);
        let mut planned = Vec::new();
        for zone in &zones {
            let spacing = self.spacing_for(zone.kind);
            if spacing <= 0.0 {
                continue;
            }
            let mut position = zone.begin.max(0.0);
            let mut index = 0usize;
            while position < zone.end {
                planned.push(PlannedObject {
                    kind: object_kind_for(zone.kind, index),
                    zone: zone.kind,
                    position,
                    lateral_offset: self.lateral_offset_at(zone, position),
                });
                position += spacing;
                index += 1;
            }
        }
        planned
    }
}

impl AdversityBehavior for ConstructionAdversity {
    fn trigger(&mut self, obs: &Observation) -> bool {
        if self.core.state != AdversityState::Armed {
            return false;
        }
        if !self.is_effective() {
            return false;
        }
        if let Some(time) = obs.number("time") {
            if !self.core.within_window(time) {
                return false;
            }
        }
        self.core.roll()
    }

    fn derive_command(&self, _obs: &Observation) -> Command {
        assert_eq!(
            self.core.state,
            AdversityState::Active,
            "derive_command は Active 状態でのみ呼び出せます"
        );
        let lane_id = match &self.core.descriptor.placement {
            Some(Placement::LanePosition { lane_id, .. }) => lane_id.clone(),
            _ => String::new(),
        };
        Command::CloseLane { lane_id }
    }

    /// 車線上の配置が与えられ、規制帯全体（終了区間まで）が
    /// 車線長（設定で与えられた場合）に収まるときのみ適用可能。
    fn is_effective(&self) -> bool {
        if self.core.state == AdversityState::Terminated {
            return false;
        }
        let start = match self.closure_start() {
            Some(v) => v,
            None => return false,
        };
        if start < 0.0 {
            return false;
        }
        let lane_length = self.core.descriptor.setting_f64("lane_length", f64::MAX);
        start + self.closure_length + self.lengths.termination <= lane_length
    }

    fn initialize(&mut self, _time: f64) {
        assert!(
            self.is_effective(),
            "initialize は is_effective が真のときのみ呼び出せます"
        );
        assert_eq!(self.core.state, AdversityState::Armed);

        let lane_id = match &self.core.descriptor.placement {
            Some(Placement::LanePosition { lane_id, .. }) => lane_id.clone(),
            _ => unreachable!("is_effective が車線上の配置を保証している"),
        };

        if self.full_lane {
            self.core.push_effect(Command::CloseLane {
                lane_id: lane_id.clone(),
            });
            self.closed_lane = Some(lane_id);
        } else {
            for (index, planned) in self.plan_objects().into_iter().enumerate() {
                let object_id = self.core.object_name(&format!("wz{}", index));
                self.core.push_effect(Command::SpawnObject {
                    object_id: object_id.clone(),
                    kind: planned.kind,
                    placement: Placement::LanePosition {
                        lane_id: lane_id.clone(),
                        position: planned.position,
                    },
                    lateral_offset: planned.lateral_offset,
                });
                self.core.owned_object_ids.push(object_id);
            }
        }
        self.core.state = AdversityState::Active;
    }

    fn update(&mut self, time: f64) {
        if self.core.state != AdversityState::Active {
            return;
        }
        if self.core.expired(time) {
            if let Some(lane_id) = self.closed_lane.take() {
                self.core.push_effect(Command::ReopenLane { lane_id });
            }
            self.core.terminate();
        }
    }

    fn abandon(&mut self) {
        if let Some(lane_id) = self.closed_lane.take() {
            self.core.push_effect(Command::ReopenLane { lane_id });
        }
        self.core.terminate();
    }

    fn take_effects(&mut self) -> Vec<Command> {
        self.core.take_effects()
    }

    fn state(&self) -> AdversityState {
        self.core.state
    }

    fn class(&self) -> AdversityClass {
        AdversityClass::StaticObject
    }

    fn id(&self) -> Uuid {
        self.core.id
    }

    fn descriptor(&self) -> &AdversityDescriptor {
        &self.core.descriptor
    }
}
