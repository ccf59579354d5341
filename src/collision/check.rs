// src/collision/check.rs

use crate::collision::error::CollisionError;
use crate::collision::footprint::Footprint;
use crate::math::euclidean_distance;
use crate::trajectory::error::TrajectoryError;
use crate::trajectory::{normalize_trajectory, TrajectoryPoint};

/// 交差判定の初期距離による打ち切り閾値 (m)
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 50.0;

/// 2軌道間の円近似による衝突判定
///
/// 両軌道を正規化（§ trajectory::normalize）し、各サンプル時刻で
/// 両外形の円中心を列挙して全ペアの距離を比較する。距離が
/// `r_a + r_b + 2·buffer` 以下になった最初のサンプルで衝突とみなす。
///
/// # 引数
/// - `traj_a`, `traj_b`: 時刻整列済みの軌道（同一サンプル数・同一時刻列）
/// - `foot_a`, `foot_b`: 両エージェントの外形モデル
/// - `buffer`: 安全バッファ (m)
///
/// # 戻り値
/// - `(衝突の有無, 衝突時刻)`。衝突時刻は軌道Aの正規化後タイムスタンプ。
pub fn check_collision(
    traj_a: &[TrajectoryPoint],
    traj_b: &[TrajectoryPoint],
    foot_a: &Footprint,
    foot_b: &Footprint,
    buffer: f64,
) -> Result<(bool, Option<f64>), CollisionError> {
    validate_alignment(traj_a, traj_b)?;

    let normal_a = normalize_trajectory(traj_a, foot_a.length);
    let normal_b = normalize_trajectory(traj_b, foot_b.length);
    let radius_a = foot_a.circle_radius();
    let radius_b = foot_b.circle_radius();
    let threshold = radius_a + radius_b + buffer * 2.0;

    for (point_a, point_b) in normal_a.iter().zip(normal_b.iter()) {
        let centers_a = foot_a.circle_centers(point_a.x, point_a.y, point_a.heading);
        let centers_b = foot_b.circle_centers(point_b.x, point_b.y, point_b.heading);

        for ca in &centers_a {
            for cb in &centers_b {
                let dist = euclidean_distance(ca[0], ca[1], cb[0], cb[1]);
                if dist <= threshold {
                    return Ok((true, Some(point_a.time)));
                }
            }
        }
    }
    Ok((false, None))
}

/// 2軌道が交差するかどうかの粗い判定
///
/// 初期位置が `distance_threshold` より離れていれば即座に false を返す。
/// この打ち切りは、初期に離れていても後で衝突し得るペアを見逃す
/// 既知の保守的ショートカットであり、既存のシナリオ群との互換性の
/// ために維持している（閾値を広げないこと）。
///
/// 打ち切られなければ `check_collision` を実行し、円の重なりが
/// なければさらに、固定時刻サンプルの円掃引が取りこぼす
/// サンプル間のすれ違いを拾うため、元のポリラインを区間ごとに
/// 幾何交差判定する。
pub fn check_intersection(
    traj_a: &[TrajectoryPoint],
    traj_b: &[TrajectoryPoint],
    foot_a: &Footprint,
    foot_b: &Footprint,
    buffer: f64,
    distance_threshold: f64,
) -> Result<bool, CollisionError> {
    validate_alignment(traj_a, traj_b)?;

    // 初期距離による打ち切り
    let initial_distance =
        euclidean_distance(traj_a[0].x, traj_a[0].y, traj_b[0].x, traj_b[0].y);
    if initial_distance > distance_threshold {
        return Ok(false);
    }

    let (collided, _) = check_collision(traj_a, traj_b, foot_a, foot_b, buffer)?;
    if collided {
        return Ok(true);
    }

    // 区間ごとのポリライン交差判定
    for i in 1..traj_a.len() {
        let seg_a = ([traj_a[i - 1].x, traj_a[i - 1].y], [traj_a[i].x, traj_a[i].y]);
        let seg_b = ([traj_b[i - 1].x, traj_b[i - 1].y], [traj_b[i].x, traj_b[i].y]);
        if segments_intersect(seg_a.0, seg_a.1, seg_b.0, seg_b.1) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn validate_alignment(
    traj_a: &[TrajectoryPoint],
    traj_b: &[TrajectoryPoint],
) -> Result<(), CollisionError> {
    if traj_a.len() < 2 {
        return Err(TrajectoryError::TooFewSamples {
            actual: traj_a.len(),
        }
        .into());
    }
    if traj_a.len() != traj_b.len() {
        return Err(CollisionError::SampleCountMismatch {
            left: traj_a.len(),
            right: traj_b.len(),
        });
    }
    for (index, (a, b)) in traj_a.iter().zip(traj_b.iter()).enumerate() {
        if (a.time - b.time).abs() > 1e-9 {
            return Err(CollisionError::TimestampMismatch { index });
        }
    }
    Ok(())
}

/// 2線分の交差判定
///
/// ゼロ長の線分は点として明示的に扱い、NaN を伝播させない。
fn segments_intersect(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let p_degenerate = p1 == p2;
    let q_degenerate = q1 == q2;
    if p_degenerate && q_degenerate {
        return p1 == q1;
    }
    if p_degenerate {
        return point_on_segment(p1, q1, q2);
    }
    if q_degenerate {
        return point_on_segment(q1, p1, p2);
    }

    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // 共線・端点接触のケース
    (d1 == 0.0 && point_on_segment(p1, q1, q2))
        || (d2 == 0.0 && point_on_segment(p2, q1, q2))
        || (d3 == 0.0 && point_on_segment(q1, p1, p2))
        || (d4 == 0.0 && point_on_segment(q2, p1, p2))
}

/// 点 r から見た有向線分 (p, q) の外積
fn cross(p: [f64; 2], q: [f64; 2], r: [f64; 2]) -> f64 {
    (q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0])
}

/// 共線を仮定した上で、点 p が線分 (a, b) の範囲内にあるか
fn point_on_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> bool {
    if cross(a, b, p) != 0.0 {
        return false;
    }
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::TrajectoryPoint;

    fn straight_east(x0: f64, y0: f64, step: f64, n: usize) -> Vec<TrajectoryPoint> {
        (0..n)
            .map(|i| TrajectoryPoint::new(x0 + i as f64 * step, y0, 90.0, i as f64))
            .collect()
    }

    /// 同一軌道同士は最初のサンプルで衝突し、その時刻が返ります。
    #[test]
    fn test_check_collision_identical_trajectories() {
        let traj = straight_east(0.0, 0.0, 5.0, 3);
        let foot = Footprint::vehicle(5.0, 2.0);

        let (collided, time) = check_collision(&traj, &traj, &foot, &foot, 0.0).unwrap();
        assert!(collided);
        assert_eq!(time, Some(0.0));
    }

    /// 最接近距離が半径和 + 2·buffer を常に上回れば衝突しません。
    #[test]
    fn test_check_collision_far_apart() {
        let traj_a = straight_east(0.0, 0.0, 5.0, 3);
        let traj_b = straight_east(0.0, 100.0, 5.0, 3);
        let foot = Footprint::vehicle(5.0, 2.0);

        let (collided, time) = check_collision(&traj_a, &traj_b, &foot, &foot, 1.0).unwrap();
        assert!(!collided);
        assert_eq!(time, None);
    }

    /// バッファを大きく取ると同じペアでも衝突と判定されます。
    #[test]
    fn test_check_collision_buffer_expands_threshold() {
        let traj_a = straight_east(0.0, 0.0, 5.0, 3);
        let traj_b = straight_east(0.0, 10.0, 5.0, 3);
        let foot = Footprint::vehicle(5.0, 2.0);

        let (near_miss, _) = check_collision(&traj_a, &traj_b, &foot, &foot, 0.0).unwrap();
        assert!(!near_miss);

        let (collided, time) = check_collision(&traj_a, &traj_b, &foot, &foot, 5.0).unwrap();
        assert!(collided);
        assert_eq!(time, Some(0.0));
    }

    /// サンプル数や時刻が揃っていない軌道ペアは拒否されます。
    #[test]
    fn test_check_collision_rejects_misaligned_input() {
        let traj_a = straight_east(0.0, 0.0, 5.0, 3);
        let traj_b = straight_east(0.0, 0.0, 5.0, 4);
        let foot = Footprint::vehicle(5.0, 2.0);

        assert_eq!(
            check_collision(&traj_a, &traj_b, &foot, &foot, 0.0),
            Err(CollisionError::SampleCountMismatch { left: 3, right: 4 })
        );

        let mut traj_shifted = straight_east(0.0, 0.0, 5.0, 3);
        traj_shifted[1].time += 0.25;
        assert_eq!(
            check_collision(&traj_a, &traj_shifted, &foot, &foot, 0.0),
            Err(CollisionError::TimestampMismatch { index: 1 })
        );
    }

    /// サンプル時刻では重ならないが経路が交差するペアを、
    /// ポリライン判定が拾います。
    #[test]
    fn test_check_intersection_catches_crossing_paths() {
        let traj_a = vec![
            TrajectoryPoint::new(2.0, 0.0, 90.0, 0.0),
            TrajectoryPoint::new(7.0, 0.0, 90.0, 1.0),
            TrajectoryPoint::new(12.0, 0.0, 90.0, 2.0),
        ];
        let traj_b = vec![
            TrajectoryPoint::new(6.0, 5.0, 180.0, 0.0),
            TrajectoryPoint::new(6.0, -5.0, 180.0, 1.0),
            TrajectoryPoint::new(6.0, -15.0, 180.0, 2.0),
        ];
        let foot = Footprint::other(1.0, 1.0);

        // 円掃引では重ならないことを先に確認
        let (collided, _) = check_collision(&traj_a, &traj_b, &foot, &foot, 0.0).unwrap();
        assert!(!collided);

        let crossed = check_intersection(
            &traj_a,
            &traj_b,
            &foot,
            &foot,
            0.0,
            DEFAULT_DISTANCE_THRESHOLD,
        )
        .unwrap();
        assert!(crossed);
    }

    /// 初期距離が閾値を超えるペアは、後のサンプルで重なっていても
    /// false になります（既知の保守的ショートカットの仕様確認）。
    #[test]
    fn test_check_intersection_initial_distance_short_circuit() {
        let traj_a = vec![
            TrajectoryPoint::new(0.0, 0.0, 90.0, 0.0),
            TrajectoryPoint::new(50.0, 0.0, 90.0, 1.0),
        ];
        let traj_b = vec![
            TrajectoryPoint::new(100.0, 0.0, 270.0, 0.0),
            TrajectoryPoint::new(50.0, 0.0, 270.0, 1.0),
        ];
        let foot = Footprint::vehicle(5.0, 2.0);

        let result = check_intersection(
            &traj_a,
            &traj_b,
            &foot,
            &foot,
            0.0,
            DEFAULT_DISTANCE_THRESHOLD,
        )
        .unwrap();
        assert!(!result);
    }

    /// 平行で離れたままのペアは交差判定でも false になります。
    #[test]
    fn test_check_intersection_parallel_paths() {
        let traj_a = straight_east(0.0, 0.0, 5.0, 3);
        let traj_b = straight_east(0.0, 20.0, 5.0, 3);
        let foot = Footprint::vehicle(5.0, 2.0);

        let result = check_intersection(
            &traj_a,
            &traj_b,
            &foot,
            &foot,
            0.0,
            DEFAULT_DISTANCE_THRESHOLD,
        )
        .unwrap();
        assert!(!result);
    }

    #[test]
    fn test_segments_intersect_basic() {
        assert!(segments_intersect(
            [0.0, 0.0],
            [4.0, 0.0],
            [2.0, -1.0],
            [2.0, 1.0]
        ));
        assert!(!segments_intersect(
            [0.0, 0.0],
            [4.0, 0.0],
            [5.0, -1.0],
            [5.0, 1.0]
        ));
    }

    /// ゼロ長の線分は点として扱われます。
    #[test]
    fn test_segments_intersect_zero_length() {
        assert!(segments_intersect(
            [1.0, 0.0],
            [1.0, 0.0],
            [0.0, 0.0],
            [2.0, 0.0]
        ));
        assert!(!segments_intersect(
            [1.0, 5.0],
            [1.0, 5.0],
            [0.0, 0.0],
            [2.0, 0.0]
        ));
        assert!(segments_intersect(
            [3.0, 3.0],
            [3.0, 3.0],
            [3.0, 3.0],
            [3.0, 3.0]
        ));
    }

    /// 端点で接触する線分も交差とみなします。
    #[test]
    fn test_segments_intersect_touching_endpoint() {
        assert!(segments_intersect(
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 0.0],
            [2.0, 3.0]
        ));
    }
}
