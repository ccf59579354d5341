// src/trajectory/resample.rs

use crate::trajectory::error::TrajectoryError;
use crate::trajectory::{Trajectory, TrajectoryPoint};

/// 軌道を等時間間隔にリサンプルする関数
///
/// 方位角列をアンラップ（隣接差分を生の差分と 360° 折り返し差分の
/// 小さい方で置き換え、先頭から累積和で連続な列を再構成）してから、
/// 全チャネルを時刻に対して線形補間する。出力は先頭時刻から `dt`
/// 間隔で `floor((t_last − t_first)/dt) + 1` 点。方位角は最後に
/// [0°, 360°) へ巻き戻す。
///
/// # 引数
/// - `traj`: 元の軌道（サンプル数 2 以上、時刻は厳密に単調増加）
/// - `dt`: リサンプル間隔 (s)
///
/// # 戻り値
/// - 等時間間隔の軌道、または前提条件違反のエラー
pub fn resample(traj: &[TrajectoryPoint], dt: f64) -> Result<Trajectory, TrajectoryError> {
    if traj.len() < 2 {
        return Err(TrajectoryError::TooFewSamples { actual: traj.len() });
    }
    if !(dt > 0.0) {
        return Err(TrajectoryError::NonPositiveResolution { dt });
    }
    for i in 1..traj.len() {
        if traj[i].time <= traj[i - 1].time {
            return Err(TrajectoryError::NonMonotonicTime { index: i });
        }
    }

    // 方位角のアンラップ
    let mut unwrapped = Vec::with_capacity(traj.len());
    unwrapped.push(traj[0].heading);
    for i in 1..traj.len() {
        let raw = traj[i].heading - traj[i - 1].heading;
        let mut wrapped = raw.rem_euclid(360.0);
        if wrapped > 180.0 {
            wrapped -= 360.0;
        }
        let step = if wrapped.abs() < raw.abs() { wrapped } else { raw };
        unwrapped.push(unwrapped[i - 1] + step);
    }

    let t_first = traj[0].time;
    let t_last = traj[traj.len() - 1].time;
    let num_points = ((t_last - t_first) / dt).floor() as usize + 1;

    let mut out = Vec::with_capacity(num_points);
    let mut cursor = 0usize;
    for k in 0..num_points {
        // 浮動小数点誤差で末尾をわずかに超えた場合は末尾に丸める
        let t = (t_first + k as f64 * dt).min(t_last);

        while cursor + 2 < traj.len() && traj[cursor + 1].time < t {
            cursor += 1;
        }
        let left = &traj[cursor];
        let right = &traj[cursor + 1];
        let alpha = (t - left.time) / (right.time - left.time);

        let heading_cont = unwrapped[cursor] + alpha * (unwrapped[cursor + 1] - unwrapped[cursor]);
        let extras = left
            .extras
            .iter()
            .zip(right.extras.iter())
            .map(|(a, b)| a + alpha * (b - a))
            .collect();

        out.push(TrajectoryPoint {
            x: left.x + alpha * (right.x - left.x),
            y: left.y + alpha * (right.y - left.y),
            heading: heading_cont.rem_euclid(360.0),
            time: t,
            extras,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 出力は t_first から dt 間隔で、点数は floor((t_last−t_first)/dt)+1 になります。
    #[test]
    fn test_resample_sample_count_and_timestamps() {
        let traj = vec![
            TrajectoryPoint::new(0.0, 0.0, 90.0, 1.0),
            TrajectoryPoint::new(10.0, 0.0, 90.0, 2.0),
            TrajectoryPoint::new(20.0, 10.0, 90.0, 3.5),
        ];
        let result = resample(&traj, 0.5).unwrap();

        assert_eq!(result.len(), 6); // floor(2.5 / 0.5) + 1
        for (k, point) in result.iter().enumerate() {
            assert!((point.time - (1.0 + k as f64 * 0.5)).abs() < 1e-9);
        }
    }

    /// 359°→1° をまたぐ方位角は 180° 経由ではなく 0° 付近を通って補間されます。
    #[test]
    fn test_resample_heading_wraps_short_way() {
        let traj = vec![
            TrajectoryPoint::new(0.0, 0.0, 350.0, 0.0),
            TrajectoryPoint::new(1.0, 0.0, 10.0, 1.0),
            TrajectoryPoint::new(2.0, 0.0, 30.0, 2.0),
        ];
        let result = resample(&traj, 0.5).unwrap();

        let expected = [350.0, 0.0, 10.0, 20.0, 30.0];
        assert_eq!(result.len(), expected.len());
        for (point, want) in result.iter().zip(expected.iter()) {
            assert!((point.heading - want).abs() < 1e-9);
            assert!((0.0..360.0).contains(&point.heading));
        }
    }

    /// 位置チャネルと補助チャネルは線形補間されます。
    #[test]
    fn test_resample_linear_interpolation() {
        let mut p0 = TrajectoryPoint::new(0.0, 0.0, 0.0, 0.0);
        p0.extras = vec![0.0];
        let mut p1 = TrajectoryPoint::new(4.0, -2.0, 0.0, 2.0);
        p1.extras = vec![8.0];
        let result = resample(&[p0, p1], 1.0).unwrap();

        assert_eq!(result.len(), 3);
        assert!((result[1].x - 2.0).abs() < 1e-12);
        assert!((result[1].y - -1.0).abs() < 1e-12);
        assert!((result[1].extras[0] - 4.0).abs() < 1e-12);
    }

    /// 前提条件違反（サンプル不足・非単調時刻・非正の間隔）は拒否されます。
    #[test]
    fn test_resample_rejects_malformed_input() {
        let single = vec![TrajectoryPoint::new(0.0, 0.0, 0.0, 0.0)];
        assert_eq!(
            resample(&single, 0.1),
            Err(TrajectoryError::TooFewSamples { actual: 1 })
        );

        let backwards = vec![
            TrajectoryPoint::new(0.0, 0.0, 0.0, 1.0),
            TrajectoryPoint::new(1.0, 0.0, 0.0, 0.5),
        ];
        assert_eq!(
            resample(&backwards, 0.1),
            Err(TrajectoryError::NonMonotonicTime { index: 1 })
        );

        let valid = vec![
            TrajectoryPoint::new(0.0, 0.0, 0.0, 0.0),
            TrajectoryPoint::new(1.0, 0.0, 0.0, 1.0),
        ];
        assert_eq!(
            resample(&valid, 0.0),
            Err(TrajectoryError::NonPositiveResolution { dt: 0.0 })
        );
    }
}
