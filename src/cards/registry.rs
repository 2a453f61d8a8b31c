//! Card catalog: defense templates, risk templates, wave difficulty.
//!
//! The `Catalog` is immutable once built. It can come from the built-in
//! `Catalog::standard()` set or from a TOML document:
//!
//! ```toml
//! [[defenses]]
//! key = "osago_basic"
//! kind = "osago"
//! name = "OSAGO"
//! cost = 5000
//! protection_percent = 90
//! targets = ["car"]
//! uses = 3
//!
//! [[risks]]
//! key = "car_theft"
//! kind = "theft"
//! name = "Car theft"
//! base_damage = 200
//! target = "car"
//!
//! [[waves]]
//! wave = 1
//! enemy_count = 2
//! difficulty_multiplier = 1.0
//! ```

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{DefenseKind, DefenseTemplate, RiskKind, RiskTemplate, Uses};
use crate::core::error::CatalogError;
use crate::core::AssetKind;

/// Difficulty of one wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveDifficulty {
    pub wave: u32,
    pub enemy_count: usize,
    pub difficulty_multiplier: f64,
}

impl WaveDifficulty {
    #[must_use]
    pub const fn new(wave: u32, enemy_count: usize, difficulty_multiplier: f64) -> Self {
        Self {
            wave,
            enemy_count,
            difficulty_multiplier,
        }
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    defenses: Vec<DefenseTemplate>,
    risks: Vec<RiskTemplate>,
    waves: Vec<WaveDifficulty>,
}

/// Static lookup of every card the game can produce.
#[derive(Clone, Debug)]
pub struct Catalog {
    defenses: Vec<DefenseTemplate>,
    risks: Vec<RiskTemplate>,
    waves: BTreeMap<u32, WaveDifficulty>,
    defense_index: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from parts. Later entries with a duplicate defense key
    /// shadow earlier ones in `defense_by_key`.
    #[must_use]
    pub fn new(
        defenses: Vec<DefenseTemplate>,
        risks: Vec<RiskTemplate>,
        waves: impl IntoIterator<Item = WaveDifficulty>,
    ) -> Self {
        let defense_index = defenses
            .iter()
            .enumerate()
            .map(|(i, d)| (d.key.clone(), i))
            .collect();

        Self {
            defenses,
            risks,
            waves: waves.into_iter().map(|w| (w.wave, w)).collect(),
            defense_index,
        }
    }

    /// Parse a catalog from TOML. The result is not validated; call
    /// `validate` with the configured wave count.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(source)?;
        Ok(Self::new(doc.defenses, doc.risks, doc.waves))
    }

    /// All defense templates in catalog order.
    #[must_use]
    pub fn defenses(&self) -> &[DefenseTemplate] {
        &self.defenses
    }

    /// All risk templates in catalog order.
    #[must_use]
    pub fn risks(&self) -> &[RiskTemplate] {
        &self.risks
    }

    /// Difficulty for a wave, if the table has one.
    #[must_use]
    pub fn wave_difficulty(&self, wave: u32) -> Option<&WaveDifficulty> {
        self.waves.get(&wave)
    }

    /// Iterate the difficulty table in wave order.
    pub fn wave_table(&self) -> impl Iterator<Item = &WaveDifficulty> {
        self.waves.values()
    }

    /// Look up a defense template by key.
    #[must_use]
    pub fn defense_by_key(&self, key: &str) -> Option<&DefenseTemplate> {
        self.defense_index.get(key).map(|&i| &self.defenses[i])
    }

    /// Check catalog integrity for a game of `total_waves` waves.
    ///
    /// Asset kinds are a closed enum, so every target is one of the four
    /// protectable assets by construction. Targets must not repeat, costs
    /// must not be negative and `uses` is either unlimited or at least 1.
    pub fn validate(&self, total_waves: u32) -> Result<(), CatalogError> {
        if self.defenses.is_empty() {
            return Err(CatalogError::Empty("defense"));
        }
        if self.risks.is_empty() {
            return Err(CatalogError::Empty("risk"));
        }

        for defense in &self.defenses {
            if defense.targets.is_empty() {
                return Err(CatalogError::NoTargets(defense.key.clone()));
            }
            if defense.protection_percent > 100 {
                return Err(CatalogError::ProtectionOutOfRange {
                    name: defense.key.clone(),
                    percent: defense.protection_percent,
                });
            }
            if defense.cost < 0 {
                return Err(CatalogError::NegativeCost {
                    name: defense.key.clone(),
                    cost: defense.cost,
                });
            }
            if defense.uses == Uses::Limited(0) {
                return Err(CatalogError::ZeroUses(defense.key.clone()));
            }
            // Attaching twice to one asset would stack the card on itself.
            for (i, target) in defense.targets.iter().enumerate() {
                if defense.targets[..i].contains(target) {
                    return Err(CatalogError::DuplicateTarget {
                        name: defense.key.clone(),
                        target: *target,
                    });
                }
            }
        }

        let mut previous: Option<&WaveDifficulty> = None;
        for wave in 1..=total_waves {
            let entry = self
                .waves
                .get(&wave)
                .ok_or(CatalogError::MissingWave(wave))?;

            if !entry.difficulty_multiplier.is_finite() || entry.difficulty_multiplier < 0.0 {
                return Err(CatalogError::InvalidMultiplier {
                    wave,
                    multiplier: entry.difficulty_multiplier,
                });
            }

            if let Some(prev) = previous {
                if entry.enemy_count < prev.enemy_count
                    || entry.difficulty_multiplier < prev.difficulty_multiplier
                {
                    return Err(CatalogError::NonMonotoneDifficulty {
                        wave,
                        previous: prev.wave,
                    });
                }
            }
            previous = Some(entry);
        }

        Ok(())
    }

    /// The built-in catalog: six insurance products, eight risks, eight waves.
    #[must_use]
    pub fn standard() -> Self {
        use AssetKind::{Car, Family, House, Work};

        let defenses = vec![
            DefenseTemplate::new("osago_basic", DefenseKind::Osago, "OSAGO", 5000, 90)
                .with_target(Car)
                .with_uses(Uses::Limited(3))
                .with_description("Mandatory motor insurance. Covers basic road accidents.")
                .with_special_effect("Required cover for every driver"),
            DefenseTemplate::new("kasko_full", DefenseKind::Kasko, "KASKO Full", 15000, 95)
                .with_target(Car)
                .with_uses(Uses::Limited(2))
                .with_cooldown_ms(5000)
                .with_description("Full vehicle cover including theft and damage.")
                .with_special_effect("Pays full value on total loss"),
            DefenseTemplate::new("property_insurance", DefenseKind::Property, "Property", 8000, 95)
                .with_target(House)
                .with_uses(Uses::Limited(2))
                .with_cooldown_ms(10000)
                .with_description("Protects against fire, flooding and other damage.")
                .with_special_effect("Holds even against natural disasters"),
            DefenseTemplate::new("health_insurance", DefenseKind::Health, "Health", 12000, 80)
                .with_target(Family)
                .with_uses(Uses::Limited(3))
                .with_cooldown_ms(8000)
                .with_description("Voluntary medical insurance for the whole family.")
                .with_special_effect("Gradually restores health"),
            DefenseTemplate::new("travel_insurance", DefenseKind::Travel, "Travel", 3000, 70)
                .with_target(Family)
                .with_uses(Uses::Limited(1))
                .with_cooldown_ms(3000)
                .with_description("Cover on trips: medical aid, cancellations, baggage.")
                .with_special_effect("Works even in exotic countries"),
            DefenseTemplate::new("vip_package", DefenseKind::Vip, "VIP Package", 25000, 50)
                .with_target(House)
                .with_target(Car)
                .with_target(Family)
                .with_target(Work)
                .with_uses(Uses::Limited(1))
                .with_cooldown_ms(20000)
                .with_description("Comprehensive cover for all property and family.")
                .with_special_effect("Once per game can fully restore an asset"),
        ];

        let risks = vec![
            RiskTemplate::new("minor_accident", RiskKind::CarAccident, "Minor accident", 50, Car)
                .with_description("A small collision with light damage."),
            RiskTemplate::new("major_accident", RiskKind::CarAccident, "Major accident", 100, Car)
                .with_description("A serious crash with heavy damage.")
                .with_special_effect("May also hurt family members"),
            RiskTemplate::new("house_fire", RiskKind::Fire, "House fire", 150, House)
                .with_description("An apartment fire with serious damage.")
                .with_special_effect("Spreads to neighbouring assets"),
            RiskTemplate::new("illness", RiskKind::Illness, "Illness", 80, Family)
                .with_description("An illness that needs serious treatment."),
            RiskTemplate::new("apartment_flood", RiskKind::Flood, "Flood", 70, House)
                .with_description("A burst pipe floods the apartment."),
            RiskTemplate::new("theft", RiskKind::Theft, "Burglary", 90, House)
                .with_description("The apartment is burgled.")
                .with_special_effect("Ignores part of the protection"),
            RiskTemplate::new("car_theft", RiskKind::Theft, "Car theft", 200, Car)
                .with_description("The car is stolen."),
            RiskTemplate::new("fraud", RiskKind::Fraud, "Fraud", 100, Work)
                .with_description("Financial fraud.")
                .with_special_effect("Can attack any target"),
        ];

        let waves = [
            WaveDifficulty::new(1, 2, 1.0),
            WaveDifficulty::new(2, 3, 1.2),
            WaveDifficulty::new(3, 4, 1.4),
            WaveDifficulty::new(4, 5, 1.6),
            WaveDifficulty::new(5, 6, 1.8),
            WaveDifficulty::new(6, 7, 2.0),
            WaveDifficulty::new(7, 8, 2.5),
            WaveDifficulty::new(8, 10, 3.0),
        ];

        Self::new(defenses, risks, waves)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.validate(8).is_ok());
        assert_eq!(catalog.defenses().len(), 6);
        assert_eq!(catalog.risks().len(), 8);
        assert_eq!(catalog.wave_table().count(), 8);
    }

    #[test]
    fn test_boss_wave_is_largest() {
        let catalog = Catalog::standard();
        let boss = catalog.wave_difficulty(8).unwrap();
        for wave in catalog.wave_table() {
            assert!(wave.enemy_count <= boss.enemy_count);
            assert!(wave.difficulty_multiplier <= boss.difficulty_multiplier);
        }
        assert_eq!(boss.enemy_count, 10);
    }

    #[test]
    fn test_defense_by_key() {
        let catalog = Catalog::standard();
        let vip = catalog.defense_by_key("vip_package").unwrap();
        assert_eq!(vip.targets.len(), 4);
        assert!(catalog.defense_by_key("missing").is_none());
    }

    #[test]
    fn test_validate_missing_wave() {
        let catalog = Catalog::standard();
        assert!(matches!(catalog.validate(9), Err(CatalogError::MissingWave(9))));
    }

    #[test]
    fn test_validate_non_monotone() {
        let standard = Catalog::standard();
        let catalog = Catalog::new(
            standard.defenses().to_vec(),
            standard.risks().to_vec(),
            [WaveDifficulty::new(1, 3, 1.5), WaveDifficulty::new(2, 2, 1.5)],
        );
        assert!(matches!(
            catalog.validate(2),
            Err(CatalogError::NonMonotoneDifficulty { wave: 2, previous: 1 })
        ));
    }

    #[test]
    fn test_validate_empty_targets() {
        let standard = Catalog::standard();
        let bad = DefenseTemplate::new("nothing", DefenseKind::Vip, "Nothing", 1, 10);
        let catalog = Catalog::new(vec![bad], standard.risks().to_vec(), standard.wave_table().copied());
        assert!(matches!(catalog.validate(8), Err(CatalogError::NoTargets(_))));
    }

    fn defense_toml(targets: &str, cost: i64, uses: i64) -> String {
        format!(
            r#"
            [[defenses]]
            key = "kasko"
            kind = "kasko"
            name = "KASKO"
            cost = {cost}
            protection_percent = 50
            targets = {targets}
            uses = {uses}

            [[risks]]
            key = "car_theft"
            kind = "theft"
            name = "Car theft"
            base_damage = 200
            target = "car"

            [[waves]]
            wave = 1
            enemy_count = 1
            difficulty_multiplier = 1.0
            "#
        )
    }

    #[test]
    fn test_validate_duplicate_targets() {
        let catalog = Catalog::from_toml_str(&defense_toml(r#"["car", "house", "car"]"#, 100, 1)).unwrap();
        assert!(matches!(
            catalog.validate(1),
            Err(CatalogError::DuplicateTarget { target: AssetKind::Car, .. })
        ));
    }

    #[test]
    fn test_validate_negative_cost() {
        let catalog = Catalog::from_toml_str(&defense_toml(r#"["car"]"#, -500, 1)).unwrap();
        assert!(matches!(
            catalog.validate(1),
            Err(CatalogError::NegativeCost { cost: -500, .. })
        ));
    }

    #[test]
    fn test_validate_uses() {
        let zero = Catalog::from_toml_str(&defense_toml(r#"["car"]"#, 100, 0)).unwrap();
        assert!(matches!(zero.validate(1), Err(CatalogError::ZeroUses(_))));

        let unlimited = Catalog::from_toml_str(&defense_toml(r#"["car"]"#, 100, -1)).unwrap();
        assert!(unlimited.validate(1).is_ok());
        assert_eq!(unlimited.defenses()[0].uses, Uses::Unlimited);
    }

    #[test]
    fn test_validate_empty_catalogs() {
        let catalog = Catalog::new(Vec::new(), Vec::new(), []);
        assert!(matches!(catalog.validate(1), Err(CatalogError::Empty("defense"))));
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            [[defenses]]
            key = "osago_basic"
            kind = "osago"
            name = "OSAGO"
            cost = 5000
            protection_percent = 90
            targets = ["car"]
            uses = 3

            [[risks]]
            key = "car_theft"
            kind = "theft"
            name = "Car theft"
            base_damage = 200
            target = "car"

            [[waves]]
            wave = 1
            enemy_count = 2
            difficulty_multiplier = 1.0
        "#;

        let catalog = Catalog::from_toml_str(source).unwrap();
        assert!(catalog.validate(1).is_ok());

        let osago = catalog.defense_by_key("osago_basic").unwrap();
        assert_eq!(osago.uses, Uses::Limited(3));
        assert_eq!(osago.cooldown_ms, 0);
        assert_eq!(catalog.risks()[0].target, AssetKind::Car);
        assert_eq!(catalog.wave_difficulty(1).unwrap().enemy_count, 2);
    }

    #[test]
    fn test_from_toml_rejects_unknown_asset() {
        let source = r#"
            defenses = []
            waves = []

            [[risks]]
            key = "x"
            kind = "fire"
            name = "X"
            base_damage = 1
            target = "boat"
        "#;
        assert!(matches!(Catalog::from_toml_str(source), Err(CatalogError::Parse(_))));
    }
}
