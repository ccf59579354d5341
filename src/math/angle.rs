// src/math/angle.rs

/// 2つの角度の最小差を計算する関数
///
/// # 引数
/// - `a1`: 1つ目の角度（度）
/// - `a2`: 2つ目の角度（度）
///
/// # 戻り値
/// - 角度差の絶対値（度、[0, 180] の範囲）
pub fn angle_difference(a1: f64, a2: f64) -> f64 {
    let diff = (a1 - a2 + 180.0).rem_euclid(360.0) - 180.0;
    diff.abs()
}

/// シミュレータ角度（北基準・時計回り）を数学角度（東基準・反時計回り）に変換する関数
///
/// # 引数
/// - `sim_deg`: シミュレータ系の方位角（度）
///
/// # 戻り値
/// - 数学系の方位角（度、[0, 360) の範囲）
pub fn to_math_angle(sim_deg: f64) -> f64 {
    (90.0 - sim_deg).rem_euclid(360.0)
}

/// 数学角度をシミュレータ角度に変換する関数
///
/// 変換式は `to_math_angle` と同一（対合）。
pub fn to_sim_angle(math_deg: f64) -> f64 {
    (90.0 - math_deg).rem_euclid(360.0)
}

/// 2点間のユークリッド距離
pub fn euclidean_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}
