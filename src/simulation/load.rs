// src/simulation/load.rs

use std::error::Error;
use std::fs::File;

use serde_yaml::from_reader;

use crate::config::{AdversityProfile, ScenarioProfile};

/// シナリオ設定から敵対的イベント設定群を読み込む
pub fn load_adversity_profiles(path: &str) -> Result<Vec<AdversityProfile>, Box<dyn Error>> {
    let file = File::open(path)?;
    let profile: ScenarioProfile = from_reader(file)?;
    Ok(profile.adversities)
}
