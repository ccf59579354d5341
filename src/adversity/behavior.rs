// src/adversity/behavior.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::adversity::command::Command;
use crate::adversity::descriptor::AdversityDescriptor;
use crate::adversity::error::AdversityError;
use crate::adversity::observation::Observation;

/// 敵対的イベントのライフサイクル状態
///
/// 遷移は Uninitialized → Armed → Active → Terminated の一方向のみ。
/// 共有状態の構築直後は Uninitialized で、各イベント型が自身の構築を
/// 終えて `arm` した時点で Armed になる。`trigger` は Armed でのみ
/// 評価され、Active は終了時刻に達するか適用不能になるまで続く。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdversityState {
    Uninitialized,
    Armed,
    Active,
    Terminated,
}

/// イベントの分類
///
/// 動的イベントは毎ティック `derive_command` で制御指令を出し、
/// 静的イベントは `initialize`/`update` の副作用（effects）で
/// オブジェクトの生成・維持・除去を行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdversityClass {
    DynamicAgent,
    StaticObject,
}

/// すべての敵対的イベント型が実装する契約
///
/// 外部環境（シミュレーションループ）が毎ティック駆動する。
/// `trigger` と `update` は整形された観測に対して決して失敗しない。
/// 必要な状態が失われた場合は `is_effective` が false を返し、
/// 穏やかに終了する。
pub trait AdversityBehavior {
    /// このティックで敵対的挙動を開始すべきかの判定
    ///
    /// Armed 状態でのみ意味を持つ。観測と内部の乱数状態のみに依存し、
    /// 内部の記録以外の副作用を持たない。
    fn trigger(&mut self, obs: &Observation) -> bool;

    /// このティックの敵対的挙動を実現する制御指令の導出
    ///
    /// `trigger` が true を返した後、または Active の間のみ呼び出せる。
    /// それ以外での呼び出しはプログラミングエラー（パニック）。
    fn derive_command(&self, obs: &Observation) -> Command;

    /// 敵対的条件がまだ適用可能かどうか
    fn is_effective(&self) -> bool;

    /// 起動時に一度だけ呼ばれるフック
    fn initialize(&mut self, time: f64);

    /// Active の間、毎ティック呼ばれるフック
    fn update(&mut self, time: f64);

    /// 発火せずに破棄する（ソフトな利用不能時の穏やかな終了）
    fn abandon(&mut self);

    /// 蓄積された生成・維持・除去の副作用指令を取り出す
    fn take_effects(&mut self) -> Vec<Command>;

    fn state(&self) -> AdversityState;

    fn class(&self) -> AdversityClass;

    /// プロセス内で一意なインスタンス識別子
    fn id(&self) -> Uuid;

    fn descriptor(&self) -> &AdversityDescriptor;
}

/// 各イベント型が内包する共有ランタイム状態
///
/// 識別子は記述子の object_type とは独立に構築時へ割り当てられ、
/// 同じ object_type を持つ複数のインスタンスを区別できる。
#[derive(Debug)]
pub struct AdversityCore {
    pub descriptor: AdversityDescriptor,
    pub id: Uuid,
    pub state: AdversityState,
    pub rng: StdRng,
    pub effects: Vec<Command>,
    pub owned_object_ids: Vec<String>,
}

impl AdversityCore {
    /// 記述子を検証してランタイム状態を構築する
    ///
    /// # 引数
    /// - `descriptor`: 不変の記述子
    /// - `seed`: 乱数シード（再現性のため呼び出し側が与える）
    pub fn new(descriptor: AdversityDescriptor, seed: u64) -> Result<Self, AdversityError> {
        descriptor.validate()?;
        Ok(Self {
            descriptor,
            id: Uuid::new_v4(),
            state: AdversityState::Uninitialized,
            rng: StdRng::seed_from_u64(seed),
            effects: Vec::new(),
            owned_object_ids: Vec::new(),
        })
    }

    /// 構築の完了を宣言してトリガ判定を受け付ける状態にする
    pub fn arm(&mut self) {
        assert_eq!(self.state, AdversityState::Uninitialized);
        self.state = AdversityState::Armed;
    }

    /// トリガ確率による抽選
    pub fn roll(&mut self) -> bool {
        self.rng.gen::<f64>() < self.descriptor.probability
    }

    /// インスタンス識別子から衝突しないオブジェクト名を導出する
    pub fn object_name(&self, suffix: &str) -> String {
        let hex = self.id.as_simple().to_string();
        format!("{}_{}_{}", self.descriptor.object_type, &hex[..8], suffix)
    }

    /// 時刻が有効期間内かどうか
    pub fn within_window(&self, time: f64) -> bool {
        time >= self.descriptor.start_time
            && (self.descriptor.end_time < 0.0 || time < self.descriptor.end_time)
    }

    /// 有界な終了時刻に達したかどうか
    pub fn expired(&self, time: f64) -> bool {
        self.descriptor.end_time >= 0.0 && time >= self.descriptor.end_time
    }

    pub fn push_effect(&mut self, command: Command) {
        self.effects.push(command);
    }

    pub fn take_effects(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.effects)
    }

    /// 所有オブジェクトの除去指令を積んで Terminated へ遷移する
    pub fn terminate(&mut self) {
        for object_id in std::mem::take(&mut self.owned_object_ids) {
            self.effects.push(Command::RemoveObject { object_id });
        }
        self.state = AdversityState::Terminated;
    }
}
