// src/simulation/manager.rs

use tracing::{debug, warn};

use crate::adversity::{
    AdversityBehavior, AdversityClass, AdversityError, AdversityState, Command,
    ConstructionAdversity, CutInAdversity, Observation, RearEndAdversity,
    StalledObjectAdversity,
};
use crate::config::AdversityProfile;

/// 設定1件から対応するイベント型を構築する
///
/// # 引数
/// - `profile`: シナリオ設定の1エントリ
/// - `seed`: 乱数シード（再現性のため呼び出し側が与える）
pub fn build_adversity(
    profile: &AdversityProfile,
    seed: u64,
) -> Result<Box<dyn AdversityBehavior>, AdversityError> {
    let descriptor = profile.descriptor();
    match profile.kind.as_str() {
        "cut_in" => Ok(Box::new(CutInAdversity::new(descriptor, seed)?)),
        "rear_end" => Ok(Box::new(RearEndAdversity::new(descriptor, seed)?)),
        "stalled_object" => Ok(Box::new(StalledObjectAdversity::new(descriptor, seed)?)),
        "construction" => Ok(Box::new(ConstructionAdversity::new(descriptor, seed)?)),
        other => Err(AdversityError::UnknownAdversityKind(other.to_string())),
    }
}

/// 敵対的イベント群を毎ティック駆動する管理器
///
/// 各ティックの手順:
/// 1. Armed のイベントは適用可否を確認し、不能なら破棄、
///    可能ならトリガ判定して起動する。
/// 2. Active のイベントは update を呼び、動的イベントからは
///    制御指令を導出する。
/// 3. 蓄積された副作用指令をすべて回収して返す。
///
/// 指令の適用は呼び出し側（外部環境）の責務。
pub struct AdversityManager {
    adversities: Vec<Box<dyn AdversityBehavior>>,
}

impl AdversityManager {
    pub fn new() -> Self {
        Self {
            adversities: Vec::new(),
        }
    }

    /// シナリオ設定から全イベントを構築する
    ///
    /// 各イベントには base_seed + 設定内の並び順 をシードとして与え、
    /// 同じ設定と同じ base_seed からは同じトリガ系列を再現できる。
    pub fn from_profiles(
        profiles: &[AdversityProfile],
        base_seed: u64,
    ) -> Result<Self, AdversityError> {
        let mut manager = Self::new();
        for (index, profile) in profiles.iter().enumerate() {
            manager.push(build_adversity(profile, base_seed + index as u64)?);
        }
        Ok(manager)
    }

    pub fn push(&mut self, adversity: Box<dyn AdversityBehavior>) {
        self.adversities.push(adversity);
    }

    pub fn len(&self) -> usize {
        self.adversities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adversities.is_empty()
    }

    pub fn states(&self) -> Vec<AdversityState> {
        self.adversities.iter().map(|a| a.state()).collect()
    }

    /// 1ティック分の駆動
    ///
    /// # 引数
    /// - `time`: 現在時刻 (s)
    /// - `observations`: イベントごとの観測（構築順と同じ並び）。
    ///   足りない分は空の観測として扱う。
    ///
    /// # 戻り値
    /// このティックで外部環境が適用すべき指令の列
    pub fn step(&mut self, time: f64, observations: &[Observation]) -> Vec<Command> {
        let mut commands = Vec::new();
        for (index, adversity) in self.adversities.iter_mut().enumerate() {
            let mut obs = observations.get(index).cloned().unwrap_or_default();
            obs.set_number("time", time);

            match adversity.state() {
                AdversityState::Armed => {
                    let end_time = adversity.descriptor().end_time;
                    // 発火しないまま有効期間を過ぎたら破棄する
                    if end_time >= 0.0 && time >= end_time {
                        debug!(id = %adversity.id(), "有効期間内に発火しなかったため破棄します");
                        adversity.abandon();
                    } else if !adversity.is_effective() {
                        warn!(id = %adversity.id(), "適用不能なイベントを破棄します");
                        adversity.abandon();
                    } else if adversity.trigger(&obs) {
                        adversity.initialize(time);
                        if adversity.class() == AdversityClass::DynamicAgent {
                            commands.push(adversity.derive_command(&obs));
                        }
                    }
                }
                AdversityState::Active => {
                    adversity.update(time);
                    if adversity.state() == AdversityState::Active
                        && adversity.class() == AdversityClass::DynamicAgent
                    {
                        commands.push(adversity.derive_command(&obs));
                    }
                }
                AdversityState::Uninitialized | AdversityState::Terminated => {}
            }

            commands.extend(adversity.take_effects());
        }
        commands
    }
}

impl Default for AdversityManager {
    fn default() -> Self {
        Self::new()
    }
}
