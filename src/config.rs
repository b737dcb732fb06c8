use crate::{
    animal::Animal,
    dice::Outcome,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    time::Duration,
};

pub const DEFAULT_STARTING_BALANCE: u64 = 10_000;
pub const DEFAULT_BET_STEP: u64 = 100;
pub const DEFAULT_ROLLING_MS: u64 = 2_000;
pub const DEFAULT_RESULT_MS: u64 = 3_000;
pub const DEFAULT_TAP_IDLE_MS: u64 = 1_000;
pub const DEFAULT_FAVOR_CHANCE: f64 = 0.7;
pub const DEFAULT_HISTORY_LEN: usize = 12;

/// Table tuning. Every field may be omitted from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub starting_balance: u64,
    pub bet_step: u64,
    pub rolling_ms: u64,
    pub result_ms: u64,
    pub tap_idle_ms: u64,
    pub favor_chance: f64,
    pub history_len: usize,
    /// Free-table override: card position (1..=6) to the triple it forces.
    pub forced_outcomes: BTreeMap<u8, Outcome>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_balance: DEFAULT_STARTING_BALANCE,
            bet_step: DEFAULT_BET_STEP,
            rolling_ms: DEFAULT_ROLLING_MS,
            result_ms: DEFAULT_RESULT_MS,
            tap_idle_ms: DEFAULT_TAP_IDLE_MS,
            favor_chance: DEFAULT_FAVOR_CHANCE,
            history_len: DEFAULT_HISTORY_LEN,
            forced_outcomes: default_forced_outcomes(),
        }
    }
}

pub fn default_forced_outcomes() -> BTreeMap<u8, Outcome> {
    BTreeMap::from([
        (1, [Animal::Crab; 3]),
        (2, [Animal::Fish; 3]),
        (6, [Animal::Gourd; 3]),
    ])
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bet_step == 0 {
            return Err(eyre!("bet_step must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.favor_chance) {
            return Err(eyre!(
                "favor_chance must be within [0, 1], got {}",
                self.favor_chance
            ));
        }
        if let Some(bad) = self
            .forced_outcomes
            .keys()
            .find(|p| Animal::from_position(**p).is_none())
        {
            return Err(eyre!("forced outcome position {bad} is not a card (1..=6)"));
        }
        Ok(())
    }

    pub fn rolling_delay(&self) -> Duration {
        Duration::from_millis(self.rolling_ms)
    }

    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_ms)
    }

    pub fn tap_idle_delay(&self) -> Duration {
        Duration::from_millis(self.tap_idle_ms)
    }
}
