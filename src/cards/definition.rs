//! Card templates - static catalog data.
//!
//! `DefenseTemplate` and `RiskTemplate` hold the immutable properties of a
//! card type. For example "OSAGO" always costs 5000 and blocks 90% of damage
//! to the car - these are part of the template.
//!
//! Identity (which particular draw or spawn this is) lives in the instance
//! types, see `cards::instance`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::AssetKind;

/// Insurance product line of a defense card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    Osago,
    Kasko,
    Property,
    Health,
    Travel,
    Vip,
}

/// Category of a risk card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    CarAccident,
    Fire,
    Illness,
    Theft,
    Flood,
    Fraud,
}

/// How many times a defense may be used.
///
/// Serialized as an integer where `-1` means unlimited.
/// Tracked as data only; nothing in the core consumes uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Uses {
    Unlimited,
    Limited(u32),
}

impl From<i64> for Uses {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            Uses::Unlimited
        } else {
            Uses::Limited(u32::try_from(raw).unwrap_or(u32::MAX))
        }
    }
}

impl From<Uses> for i64 {
    fn from(uses: Uses) -> Self {
        match uses {
            Uses::Unlimited => -1,
            Uses::Limited(n) => i64::from(n),
        }
    }
}

/// Target list for a defense. Never more than the four asset kinds.
pub type Targets = SmallVec<[AssetKind; 4]>;

/// Static defense (insurance) card template.
///
/// ## Example
///
/// ```
/// use insurance_defense::cards::{DefenseKind, DefenseTemplate};
/// use insurance_defense::core::AssetKind;
///
/// let osago = DefenseTemplate::new("osago_basic", DefenseKind::Osago, "OSAGO", 5000, 90)
///     .with_target(AssetKind::Car);
///
/// assert!(osago.covers(AssetKind::Car));
/// assert!(!osago.covers(AssetKind::House));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefenseTemplate {
    /// Stable catalog key (e.g. "kasko_full").
    pub key: String,
    pub kind: DefenseKind,
    pub name: String,
    pub cost: i64,
    /// Percentage of incoming damage blocked, 0..=100.
    pub protection_percent: u8,
    pub targets: Targets,
    #[serde(default = "default_uses")]
    pub uses: Uses,
    #[serde(default)]
    pub cooldown_ms: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub special_effect: Option<String>,
}

fn default_uses() -> Uses {
    Uses::Unlimited
}

impl DefenseTemplate {
    /// Create a defense template with no targets yet.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        kind: DefenseKind,
        name: impl Into<String>,
        cost: i64,
        protection_percent: u8,
    ) -> Self {
        Self {
            key: key.into(),
            kind,
            name: name.into(),
            cost,
            protection_percent,
            targets: SmallVec::new(),
            uses: Uses::Unlimited,
            cooldown_ms: 0,
            description: String::new(),
            special_effect: None,
        }
    }

    /// Add a target asset kind (duplicates are ignored).
    #[must_use]
    pub fn with_target(mut self, kind: AssetKind) -> Self {
        if !self.targets.contains(&kind) {
            self.targets.push(kind);
        }
        self
    }

    #[must_use]
    pub fn with_uses(mut self, uses: Uses) -> Self {
        self.uses = uses;
        self
    }

    #[must_use]
    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_special_effect(mut self, effect: impl Into<String>) -> Self {
        self.special_effect = Some(effect.into());
        self
    }

    /// Does this defense attach to the given asset?
    #[must_use]
    pub fn covers(&self, kind: AssetKind) -> bool {
        self.targets.contains(&kind)
    }

    /// Fraction of damage that passes through this defense, 0.0..=1.0.
    #[must_use]
    pub fn pass_through(&self) -> f64 {
        1.0 - f64::from(self.protection_percent.min(100)) / 100.0
    }
}

/// Static risk card template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskTemplate {
    pub key: String,
    pub kind: RiskKind,
    pub name: String,
    pub base_damage: u32,
    pub target: AssetKind,
    /// Movement speed (lower is faster). Data only; risks do not move.
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub special_effect: Option<String>,
}

impl RiskTemplate {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        kind: RiskKind,
        name: impl Into<String>,
        base_damage: u32,
        target: AssetKind,
    ) -> Self {
        Self {
            key: key.into(),
            kind,
            name: name.into(),
            base_damage,
            target,
            speed: 0,
            description: String::new(),
            special_effect: None,
        }
    }

    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_special_effect(mut self, effect: impl Into<String>) -> Self {
        self.special_effect = Some(effect.into());
        self
    }
}
