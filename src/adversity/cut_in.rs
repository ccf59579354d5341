// src/adversity/cut_in.rs

use uuid::Uuid;

use crate::adversity::behavior::{
    AdversityBehavior, AdversityClass, AdversityCore, AdversityState,
};
use crate::adversity::command::{Command, LaneChangeDirection};
use crate::adversity::descriptor::AdversityDescriptor;
use crate::adversity::error::AdversityError;
use crate::adversity::observation::Observation;

/// 割り込み（カットイン）イベント
///
/// 敵対車両が自車の隣接車線の前方を走行しているとき、確率的に
/// 自車の車線へ割り込み、同時に減速する。
///
/// 観測フィールド:
/// - `agent_id`: 敵対車両のID（文字列）
/// - `lane_offset`: 敵対車両の車線インデックス − 自車の車線インデックス
/// - `longitudinal_gap`: 自車前端から敵対車両後端までの距離 (m)。正 = 前方
/// - `speed`: 敵対車両の速度 (m/s)
pub struct CutInAdversity {
    core: AdversityCore,
    gap_threshold: f64,     // 割り込みを試みる最大前方距離 (m)
    maneuver_duration: f64, // 車線変更に使う時間 (s)
    speed_ratio: f64,       // 割り込み後の目標速度の係数
    activated_at: Option<f64>,
}

impl CutInAdversity {
    pub fn new(descriptor: AdversityDescriptor, seed: u64) -> Result<Self, AdversityError> {
        let gap_threshold = descriptor.setting_f64("gap_threshold", 10.0);
        let maneuver_duration = descriptor.setting_f64("maneuver_duration", 1.0);
        let speed_ratio = descriptor.setting_f64("target_speed_ratio", 0.8);
        let mut core = AdversityCore::new(descriptor, seed)?;
        core.arm();
        Ok(Self {
            core,
            gap_threshold,
            maneuver_duration,
            speed_ratio,
            activated_at: None,
        })
    }
}

impl AdversityBehavior for CutInAdversity {
    fn trigger(&mut self, obs: &Observation) -> bool {
        if self.core.state != AdversityState::Armed {
            return false;
        }
        if let Some(time) = obs.number("time") {
            if !self.core.within_window(time) {
                return false;
            }
        }
        // 隣接車線（ちょうど1車線差）の前方にいることが条件
        let lane_offset = match obs.number("lane_offset") {
            Some(v) => v,
            None => return false,
        };
        let gap = match obs.number("longitudinal_gap") {
            Some(v) => v,
            None => return false,
        };
        if lane_offset.abs() != 1.0 {
            return false;
        }
        if !(gap > 0.0 && gap <= self.gap_threshold) {
            return false;
        }
        self.core.roll()
    }

    fn derive_command(&self, obs: &Observation) -> Command {
        assert_eq!(
            self.core.state,
            AdversityState::Active,
            "derive_command は Active 状態でのみ呼び出せます"
        );
        // 車線オフセットが正なら敵対車両は自車の左にいるので右へ寄せる
        let direction = if obs.number("lane_offset").unwrap_or(0.0) > 0.0 {
            LaneChangeDirection::Right
        } else {
            LaneChangeDirection::Left
        };
        Command::LaneChange {
            agent_id: obs.text("agent_id").unwrap_or_default().to_string(),
            direction,
            duration: self.maneuver_duration,
            target_speed: obs.number("speed").map(|s| s * self.speed_ratio),
        }
    }

    fn is_effective(&self) -> bool {
        self.core.state != AdversityState::Terminated
    }

    fn initialize(&mut self, time: f64) {
        assert_eq!(self.core.state, AdversityState::Armed);
        self.core.state = AdversityState::Active;
        self.activated_at = Some(time);
    }

    fn update(&mut self, time: f64) {
        if self.core.state != AdversityState::Active {
            return;
        }
        let elapsed_out = self
            .activated_at
            .map_or(false, |t0| time - t0 >= self.maneuver_duration);
        if elapsed_out || self.core.expired(time) {
            self.core.terminate();
        }
    }

    fn abandon(&mut self) {
        self.core.terminate();
    }

    fn take_effects(&mut self) -> Vec<Command> {
        self.core.take_effects()
    }

    fn state(&self) -> AdversityState {
        self.core.state
    }

    fn class(&self) -> AdversityClass {
        AdversityClass::DynamicAgent
    }

    fn id(&self) -> Uuid {
        self.core.id
    }

    fn descriptor(&self) -> &AdversityDescriptor {
        &self.core.descriptor
    }
}
