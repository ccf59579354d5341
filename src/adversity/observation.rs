// src/adversity/observation.rs

use std::collections::BTreeMap;

/// 観測値の1フィールド
#[derive(Debug, Clone, PartialEq)]
pub enum ObsValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

/// 外部環境が毎ティック供給する、対象エージェントの観測
///
/// フィールド集合はイベント型ごとに異なり、外部環境が決める。
/// 必要なフィールドが欠けている場合、トリガ判定は単に false を返す。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub fields: BTreeMap<String, ObsValue>,
}

impl Observation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number(&mut self, key: &str, value: f64) -> &mut Self {
        self.fields.insert(key.to_string(), ObsValue::Number(value));
        self
    }

    pub fn set_text(&mut self, key: &str, value: &str) -> &mut Self {
        self.fields
            .insert(key.to_string(), ObsValue::Text(value.to_string()));
        self
    }

    pub fn set_flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.fields.insert(key.to_string(), ObsValue::Flag(value));
        self
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(ObsValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(ObsValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(ObsValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_field_access() {
        let mut obs = Observation::new();
        obs.set_number("speed", 12.5)
            .set_text("lane_id", "edge_1_0")
            .set_flag("leader_exists", true);

        assert_eq!(obs.number("speed"), Some(12.5));
        assert_eq!(obs.text("lane_id"), Some("edge_1_0"));
        assert_eq!(obs.flag("leader_exists"), Some(true));
    }

    /// 型が合わないフィールドや未設定のフィールドは None になります。
    #[test]
    fn test_observation_missing_or_mismatched() {
        let mut obs = Observation::new();
        obs.set_text("speed", "fast");

        assert_eq!(obs.number("speed"), None);
        assert_eq!(obs.number("unknown"), None);
        assert_eq!(obs.flag("speed"), None);
    }
}
