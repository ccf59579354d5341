// src/adversity/stalled_object.rs

use tracing::warn;
use uuid::Uuid;

use crate::adversity::behavior::{
    AdversityBehavior, AdversityClass, AdversityCore, AdversityState,
};
use crate::adversity::command::{Command, ObjectKind};
use crate::adversity::descriptor::{AdversityDescriptor, Placement};
use crate::adversity::error::AdversityError;
use crate::adversity::observation::Observation;

/// 停止オブジェクト（故障車・歩行者など）イベント
///
/// 指定された配置に静的オブジェクトを生成し、有効期間のあいだ
/// 毎ティック位置を再固定して動かないまま維持する。
/// 生成するオブジェクトの種別は記述子の object_type から決まる。
pub struct StalledObjectAdversity {
    core: AdversityCore,
    kind: ObjectKind,
    lateral_offset: f64, // 車線中心からの横方向オフセット (m)
    spawned_id: Option<String>,
}

impl StalledObjectAdversity {
    pub fn new(descriptor: AdversityDescriptor, seed: u64) -> Result<Self, AdversityError> {
        let kind = match ObjectKind::from_name(&descriptor.object_type) {
            Some(kind) => kind,
            None => {
                warn!(
                    object_type = %descriptor.object_type,
                    "未知のオブジェクト型のため既定車両型で代替します"
                );
                ObjectKind::DefaultVehicle
            }
        };
        let lateral_offset = descriptor.setting_f64("lateral_offset", 0.0);
        let mut core = AdversityCore::new(descriptor, seed)?;
        core.arm();
        Ok(Self {
            core,
            kind,
            lateral_offset,
            spawned_id: None,
        })
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// 配置の再固定指令を積む
    fn pin(&mut self) {
        if let (Some(object_id), Some(placement)) =
            (self.spawned_id.clone(), self.core.descriptor.placement.clone())
        {
            self.core.push_effect(Command::PinObject {
                object_id,
                placement,
            });
        }
    }
}

impl AdversityBehavior for StalledObjectAdversity {
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
        Command::PinObject {
            object_id: self
                .spawned_id
                .clone()
                .expect("Active への遷移時にオブジェクトは生成済み"),
            placement: self
                .core
                .descriptor
                .placement
                .clone()
                .expect("is_effective が配置の存在を保証している"),
        }
    }

    /// 配置が指定され、かつ車線長（設定で与えられた場合）の範囲内に
    /// 収まっているときのみ適用可能。
    fn is_effective(&self) -> bool {
        if self.core.state == AdversityState::Terminated {
            return false;
        }
        match &self.core.descriptor.placement {
            Some(Placement::LanePosition { position, .. }) => {
                if *position < 0.0 {
                    return false;
                }
                let lane_length = self.core.descriptor.setting_f64("lane_length", f64::MAX);
                *position <= lane_length
            }
            Some(Placement::XyAngle { .. }) => true,
            None => false,
        }
    }

    fn initialize(&mut self, _time: f64) {
        assert!(
            self.is_effective(),
            "initialize は is_effective が真のときのみ呼び出せます"
        );
        assert_eq!(self.core.state, AdversityState::Armed);

        let suffix = if self.kind == ObjectKind::Pedestrian {
            "VRU"
        } else {
            "BV"
        };
        let object_id = self.core.object_name(suffix);
        let placement = self
            .core
            .descriptor
            .placement
            .clone()
            .expect("is_effective が配置の存在を保証している");

        self.core.push_effect(Command::SpawnObject {
            object_id: object_id.clone(),
            kind: self.kind,
            placement,
            lateral_offset: self.lateral_offset,
        });
        self.core.owned_object_ids.push(object_id.clone());
        self.spawned_id = Some(object_id);
        self.core.state = AdversityState::Active;
    }

    fn update(&mut self, time: f64) {
        if self.core.state != AdversityState::Active {
            return;
        }
        if self.core.expired(time) {
            self.core.terminate();
            return;
        }
        self.pin();
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
        AdversityClass::StaticObject
    }

    fn id(&self) -> Uuid {
        self.core.id
    }

    fn descriptor(&self) -> &AdversityDescriptor {
        &self.core.descriptor
    }
}
