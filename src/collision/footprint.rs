// src/collision/footprint.rs

/// エージェントの種別
///
/// 車両は車長方向に並ぶ円の連鎖で、歩行者や静的物体は単一の円で近似する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentCategory {
    Vehicle,
    Other,
}

/// エージェントの物理的外形（円近似モデル）
///
/// 向き付き長方形の交差判定を円ペアごとの O(1) 距離比較に置き換える。
/// 長方形の角で保守側に丸める誤差が出るが、衝突「予測」の用途では
/// 偽陽性は安全側なので許容する。
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub length: f64,             // 全長 (m)
    pub width: f64,              // 全幅 (m)
    pub category: AgentCategory, // 種別
}

impl Footprint {
    pub fn vehicle(length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            category: AgentCategory::Vehicle,
        }
    }

    pub fn other(length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            category: AgentCategory::Other,
        }
    }

    /// 近似に使う円の個数
    pub fn circle_count(&self) -> usize {
        match self.category {
            AgentCategory::Vehicle => (self.length / self.width).ceil() as usize + 1,
            AgentCategory::Other => 1,
        }
    }

    /// 円の中心間隔 (m)
    pub fn circle_offset(&self) -> f64 {
        match self.category {
            AgentCategory::Vehicle => self.length / self.circle_count() as f64,
            AgentCategory::Other => 0.0,
        }
    }

    /// 円の半径 (m)
    ///
    /// 車両では長方形を circle_count 個の区間に分割したとき、
    /// 1区間を覆う最小の円の半径。その他では外接円の半径。
    pub fn circle_radius(&self) -> f64 {
        match self.category {
            AgentCategory::Vehicle => {
                let n = self.circle_count() as f64;
                ((self.length / n / 2.0).powi(2) + (self.width / 2.0).powi(2)).sqrt()
            }
            AgentCategory::Other => self.length.max(self.width) / 2.0,
        }
    }

    /// 指定位置・方位での円中心座標の列挙
    ///
    /// # 引数
    /// - `x`, `y`: 幾何中心の座標 (m)
    /// - `heading_rad`: 数学系の方位角（ラジアン）
    ///
    /// # 戻り値
    /// - 円中心座標の列。円数が偶数なら中心から半間隔ずつずらし、
    ///   奇数なら1つが幾何中心に一致する。
    pub fn circle_centers(&self, x: f64, y: f64, heading_rad: f64) -> Vec<[f64; 2]> {
        let cos_heading = heading_rad.cos();
        let sin_heading = heading_rad.sin();

        match self.category {
            AgentCategory::Vehicle => {
                let n = self.circle_count();
                let offset = self.circle_offset();
                (0..n)
                    .map(|i| {
                        let along = if n % 2 == 0 {
                            (i as f64 + 0.5 - n as f64 / 2.0) * offset
                        } else {
                            (i as f64 - (n / 2) as f64) * offset
                        };
                        [x + along * cos_heading, y + along * sin_heading]
                    })
                    .collect()
            }
            AgentCategory::Other => vec![[x, y]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 全長 5m・全幅 2m の車両は ceil(2.5)+1 = 4 個の円で近似されます。
    #[test]
    fn test_vehicle_circle_count_even() {
        let foot = Footprint::vehicle(5.0, 2.0);
        assert_eq!(foot.circle_count(), 4);
        assert!((foot.circle_offset() - 1.25).abs() < 1e-12);

        let expected_radius = (0.625f64.powi(2) + 1.0).sqrt();
        assert!((foot.circle_radius() - expected_radius).abs() < 1e-12);
    }

    /// 偶数個の円中心は幾何中心から半間隔ずらして対称に並びます。
    #[test]
    fn test_vehicle_circle_centers_even() {
        let foot = Footprint::vehicle(5.0, 2.0);
        let centers = foot.circle_centers(0.0, 0.0, 0.0);

        let expected_x = [-1.875, -0.625, 0.625, 1.875];
        assert_eq!(centers.len(), 4);
        for (center, want) in centers.iter().zip(expected_x.iter()) {
            assert!((center[0] - want).abs() < 1e-12);
            assert!(center[1].abs() < 1e-12);
        }
    }

    /// 奇数個の場合は1つの円が幾何中心に一致します。
    #[test]
    fn test_vehicle_circle_centers_odd() {
        let foot = Footprint::vehicle(3.5, 2.0);
        assert_eq!(foot.circle_count(), 3);

        let centers = foot.circle_centers(0.0, 0.0, 0.0);
        let offset = 3.5 / 3.0;
        assert!((centers[0][0] + offset).abs() < 1e-12);
        assert!(centers[1][0].abs() < 1e-12);
        assert!((centers[2][0] - offset).abs() < 1e-12);
    }

    /// 円の区間は偶数・奇数どちらでも [-L/2, L/2] を隙間なく覆います。
    #[test]
    fn test_circle_spans_cover_length() {
        for (length, width) in [(5.0, 2.0), (3.5, 2.0), (10.0, 2.5)] {
            let foot = Footprint::vehicle(length, width);
            let centers = foot.circle_centers(0.0, 0.0, 0.0);
            let half_span = foot.circle_offset() / 2.0;

            let first = centers.first().unwrap()[0] - half_span;
            let last = centers.last().unwrap()[0] + half_span;
            assert!((first + length / 2.0).abs() < 1e-9);
            assert!((last - length / 2.0).abs() < 1e-9);
        }
    }

    /// 車両以外は参照点の単一円で、半径は長辺の半分になります。
    #[test]
    fn test_other_category_single_circle() {
        let foot = Footprint::other(0.5, 0.3);
        assert_eq!(foot.circle_count(), 1);
        assert!((foot.circle_radius() - 0.25).abs() < 1e-12);

        let centers = foot.circle_centers(2.0, -3.0, 1.0);
        assert_eq!(centers, vec![[2.0, -3.0]]);
    }

    /// 円中心は方位角に沿って回転します。
    #[test]
    fn test_circle_centers_follow_heading() {
        let foot = Footprint::vehicle(3.5, 2.0);
        let centers = foot.circle_centers(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let offset = 3.5 / 3.0;

        assert!(centers[0][0].abs() < 1e-12);
        assert!((centers[0][1] + offset).abs() < 1e-12);
        assert!((centers[2][1] - offset).abs() < 1e-12);
    }
}
