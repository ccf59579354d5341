// src/adversity/rear_end.rs

use uuid::Uuid;

use crate::adversity::behavior::{
    AdversityBehavior, AdversityClass, AdversityCore, AdversityState,
};
use crate::adversity::command::Command;
use crate::adversity::descriptor::AdversityDescriptor;
use crate::adversity::error::AdversityError;
use crate::adversity::observation::Observation;

/// 追突（リアエンド）イベント
///
/// 敵対車両が自車の後方を走行しているとき、車間時間（THW）が
/// 閾値を下回ると確率的に加速し、追突の危険を作り出す。
///
/// 観測フィールド:
/// - `agent_id`: 敵対車両のID（文字列）
/// - `longitudinal_gap`: 敵対車両前端から自車後端までの距離 (m)。正 = 自車が前方
/// - `speed`: 敵対車両の速度 (m/s)
pub struct RearEndAdversity {
    core: AdversityCore,
    headway_threshold: f64, // トリガとなる車間時間の上限 (s)
    maneuver_duration: f64, // 加速を維持する時間 (s)
    speed_ratio: f64,       // 加速後の目標速度の係数（> 1）
    activated_at: Option<f64>,
}

impl RearEndAdversity {
    pub fn new(descriptor: AdversityDescriptor, seed: u64) -> Result<Self, AdversityError> {
        let headway_threshold = descriptor.setting_f64("headway_threshold", 2.0);
        let maneuver_duration = descriptor.setting_f64("maneuver_duration", 3.0);
        let speed_ratio = descriptor.setting_f64("target_speed_ratio", 1.2);
        let mut core = AdversityCore::new(descriptor, seed)?;
        core.arm();
        Ok(Self {
            core,
            headway_threshold,
            maneuver_duration,
            speed_ratio,
            activated_at: None,
        })
    }
}

impl AdversityBehavior for RearEndAdversity {
    fn trigger(&mut self, obs: &Observation) -> bool {
        if self.core.state != AdversityState::Armed {
            return false;
        }
        if let Some(time) = obs.number("time") {
            if !self.core.within_window(time) {
                return false;
            }
        }
        let gap = match obs.number("longitudinal_gap") {
            Some(v) => v,
            None => return false,
        };
        let speed = match obs.number("speed") {
            Some(v) => v,
            None => return false,
        };
        if gap <= 0.0 {
            return false;
        }
        // 停止中は車間時間が定義できないのでトリガしない
        if speed <= 0.0 {
            return false;
        }
        if gap / speed >= self.headway_threshold {
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
        let speed = obs.number("speed").unwrap_or(0.0);
        Command::SpeedOverride {
            agent_id: obs.text("agent_id").unwrap_or_default().to_string(),
            target_speed: speed * self.speed_ratio,
            duration: self.maneuver_duration,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adversity::descriptor::CollisionType;

    fn rear_end_descriptor(probability: f64) -> AdversityDescriptor {
        AdversityDescriptor {
            probability,
            predicted_collision_type: CollisionType::RearEnd,
            object_type: "DEFAULT_VEHTYPE".to_string(),
            ..Default::default()
        }
    }

    fn tailgating_obs() -> Observation {
        let mut obs = Observation::new();
        // 車間 15 m / 速度 10 m/s = THW 1.5 s < 閾値 2.0 s
        obs.set_text("agent_id", "BV_2")
            .set_number("longitudinal_gap", 15.0)
            .set_number("speed", 10.0);
        obs
    }

    /// 車間時間が閾値を下回ると確率 1.0 で必ずトリガし、
    /// 起動後の指令は現在速度の 1.2 倍への加速です。
    #[test]
    fn test_rear_end_trigger_and_command() {
        let mut adversity = RearEndAdversity::new(rear_end_descriptor(1.0), 3).unwrap();
        let obs = tailgating_obs();

        assert!(adversity.trigger(&obs));
        adversity.initialize(0.0);

        let command = adversity.derive_command(&obs);
        assert_eq!(
            command,
            Command::SpeedOverride {
                agent_id: "BV_2".to_string(),
                target_speed: 12.0, // 10.0 * 1.2
                duration: 3.0,
            }
        );
    }

    /// 車間時間が閾値以上、停止中、自車が後方の場合はトリガしません。
    #[test]
    fn test_rear_end_trigger_negative_cases() {
        let mut adversity = RearEndAdversity::new(rear_end_descriptor(1.0), 3).unwrap();

        // THW = 30 / 10 = 3.0 s は閾値 2.0 s 以上
        let mut obs = tailgating_obs();
        obs.set_number("longitudinal_gap", 30.0);
        assert!(!adversity.trigger(&obs));

        // 停止中（THW が定義できない）
        let mut obs = tailgating_obs();
        obs.set_number("speed", 0.0);
        assert!(!adversity.trigger(&obs));

        // 自車が敵対車両の後方
        let mut obs = tailgating_obs();
        obs.set_number("longitudinal_gap", -5.0);
        assert!(!adversity.trigger(&obs));

        // フィールド欠落
        assert!(!adversity.trigger(&Observation::new()));
    }

    /// 有効期間の開始前は車間時間の条件が揃ってもトリガしません。
    #[test]
    fn test_rear_end_waits_for_start_time() {
        let descriptor = AdversityDescriptor {
            start_time: 30.0,
            ..rear_end_descriptor(1.0)
        };
        let mut adversity = RearEndAdversity::new(descriptor, 3).unwrap();

        let mut obs = tailgating_obs();
        obs.set_number("time", 0.0);
        assert!(!adversity.trigger(&obs));

        obs.set_number("time", 30.0);
        assert!(adversity.trigger(&obs));
    }

    /// 加速の維持時間が経過すると Terminated へ遷移します。
    #[test]
    fn test_rear_end_terminates_after_duration() {
        let mut adversity = RearEndAdversity::new(rear_end_descriptor(1.0), 3).unwrap();
        assert!(adversity.trigger(&tailgating_obs()));
        adversity.initialize(5.0);

        adversity.update(7.9);
        assert_eq!(adversity.state(), AdversityState::Active);

        adversity.update(8.0);
        assert_eq!(adversity.state(), AdversityState::Terminated);
    }

    /// 有界な終了時刻に達すると、維持時間の途中でも終了します。
    #[test]
    fn test_rear_end_respects_end_time() {
        let descriptor = AdversityDescriptor {
            end_time: 6.0,
            ..rear_end_descriptor(1.0)
        };
        let mut adversity = RearEndAdversity::new(descriptor, 3).unwrap();
        assert!(adversity.trigger(&tailgating_obs()));
        adversity.initialize(5.0);

        adversity.update(6.0);
        assert_eq!(adversity.state(), AdversityState::Terminated);
    }
}
