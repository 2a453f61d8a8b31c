//! Game configuration.
//!
//! Every tuning constant the core consumes lives in `GameConfig`: phase
//! durations, wave count, economy bonuses, per-asset HP, hand limits and the
//! RNG seed. The catalog of cards is configured separately (see
//! `cards::Catalog`).
//!
//! Configs can be built in code with the `with_*` builders or loaded from TOML.
//! Fields missing from a TOML document keep their default values:
//!
//! ```
//! use insurance_defense::core::GameConfig;
//!
//! let config = GameConfig::from_toml_str("total_waves = 3\nstarting_money = 10000").unwrap();
//! assert_eq!(config.total_waves, 3);
//! assert_eq!(config.starting_money, 10000);
//! assert_eq!(config.hand_size_cap, 6);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::asset::{AssetKind, AssetMap};
use super::error::ConfigError;

/// Max HP for each of the four assets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetHp {
    pub house: u32,
    pub family: u32,
    pub car: u32,
    pub work: u32,
}

impl Default for AssetHp {
    fn default() -> Self {
        Self {
            house: 1000,
            family: 800,
            car: 600,
            work: 500,
        }
    }
}

impl AssetHp {
    #[must_use]
    pub fn get(&self, kind: AssetKind) -> u32 {
        match kind {
            AssetKind::House => self.house,
            AssetKind::Family => self.family,
            AssetKind::Car => self.car,
            AssetKind::Work => self.work,
        }
    }

    /// Expand into per-asset storage.
    #[must_use]
    pub fn to_map(&self) -> AssetMap<u32> {
        AssetMap::new(|kind| self.get(kind))
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Length of the preparation phase.
    pub preparation_ms: u64,

    /// Length of the attack phase before damage resolves.
    pub attack_ms: u64,

    /// Simulated time per clock tick.
    pub tick_ms: u64,

    /// Number of waves in a game. The last one is the boss wave.
    pub total_waves: u32,

    pub starting_money: i64,

    /// Carried through the state, never read or changed by game rules.
    pub starting_reputation: i64,

    pub asset_hp: AssetHp,

    /// Credited once per resolved wave.
    pub wave_completion_bonus: i64,

    /// Credited per risk that hits an asset with at least one defense.
    pub defense_success_bonus: i64,

    /// Hand never grows past this.
    pub hand_size_cap: usize,

    /// Cards drawn at game start and at the start of each preparation phase.
    pub hand_draw_count: usize,

    /// Advertised limit on attached defenses. Not enforced.
    pub max_defenses_on_field: usize,

    /// Seed for the session RNG.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            preparation_ms: 15_000,
            attack_ms: 30_000,
            tick_ms: 1_000,
            total_waves: 8,
            starting_money: 40_000,
            starting_reputation: 100,
            asset_hp: AssetHp::default(),
            wave_completion_bonus: 5_000,
            defense_success_bonus: 1_000,
            hand_size_cap: 6,
            hand_draw_count: 4,
            max_defenses_on_field: 8,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject configurations the state machine cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_waves == 0 {
            return Err(ConfigError::Invalid("total_waves must be at least 1".into()));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        if self.preparation_ms == 0 || self.attack_ms == 0 {
            return Err(ConfigError::Invalid("phase durations must be positive".into()));
        }
        if self.hand_size_cap == 0 {
            return Err(ConfigError::Invalid("hand_size_cap must be at least 1".into()));
        }
        if self.starting_money < 0 {
            return Err(ConfigError::Invalid("starting_money must not be negative".into()));
        }
        if AssetKind::ALL.iter().any(|&k| self.asset_hp.get(k) == 0) {
            return Err(ConfigError::Invalid("every asset needs positive max HP".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_preparation_ms(mut self, ms: u64) -> Self {
        self.preparation_ms = ms;
        self
    }

    #[must_use]
    pub fn with_attack_ms(mut self, ms: u64) -> Self {
        self.attack_ms = ms;
        self
    }

    #[must_use]
    pub fn with_tick_ms(mut self, ms: u64) -> Self {
        self.tick_ms = ms;
        self
    }

    #[must_use]
    pub fn with_total_waves(mut self, waves: u32) -> Self {
        self.total_waves = waves;
        self
    }

    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    #[must_use]
    pub fn with_asset_hp(mut self, kind: AssetKind, hp: u32) -> Self {
        match kind {
            AssetKind::House => self.asset_hp.house = hp,
            AssetKind::Family => self.asset_hp.family = hp,
            AssetKind::Car => self.asset_hp.car = hp,
            AssetKind::Work => self.asset_hp.work = hp,
        }
        self
    }

    #[must_use]
    pub fn with_bonuses(mut self, wave_completion: i64, defense_success: i64) -> Self {
        self.wave_completion_bonus = wave_completion;
        self.defense_success_bonus = defense_success;
        self
    }

    #[must_use]
    pub fn with_hand(mut self, cap: usize, draw_count: usize) -> Self {
        self.hand_size_cap = cap;
        self.hand_draw_count = draw_count;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Clock ticks needed to exhaust a phase of `duration_ms`.
    #[must_use]
    pub fn ticks_for(&self, duration_ms: u64) -> u64 {
        duration_ms.div_ceil(self.tick_ms.max(1))
    }
}
