// src/trajectory/normalize.rs

use crate::trajectory::{Trajectory, TrajectoryPoint};

/// シミュレータ軌道を数学系の正規化軌道へ変換する関数
///
/// 方位角を北基準・時計回りの度から東基準・反時計回りのラジアン
/// （`atan2` により (−π, π] に収まる）へ変換し、参照点を前端から
/// 幾何中心へ移すため、位置を方位ベクトルに沿って車長の半分だけ
/// 後退させる。補助チャネルはそのまま通過する。
///
/// # 引数
/// - `traj`: シミュレータ系の軌道
/// - `agent_length`: エージェントの全長 (m)
///
/// # 戻り値
/// - 正規化された軌道
///
/// 入力の検証は行わない。NaN を含む入力は NaN を含む出力になる。
pub fn normalize_trajectory(traj: &[TrajectoryPoint], agent_length: f64) -> Trajectory {
    traj.iter()
        .map(|p| {
            let rad = (90.0 - p.heading).to_radians();
            let heading = rad.sin().atan2(rad.cos());
            TrajectoryPoint {
                x: p.x - agent_length / 2.0 * heading.cos(),
                y: p.y - agent_length / 2.0 * heading.sin(),
                heading,
                time: p.time,
                extras: p.extras.clone(),
            }
        })
        .collect()
}
