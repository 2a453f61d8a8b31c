//! Damage resolution - risks against stacked defenses.
//!
//! Mitigation is sequential and multiplicative: each defense attached to an
//! asset removes its percentage of whatever damage is still left, in
//! attachment order. Two 50% defenses block 75%, not 100%.
//!
//! ```
//! use insurance_defense::damage::mitigate;
//!
//! assert_eq!(mitigate(200, [50]), 100);
//! assert_eq!(mitigate(200, [50, 50]), 50);
//! assert_eq!(mitigate(200, [0]), 200);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::cards::{DefenseInstance, RiskInstance};
use crate::core::{AssetKind, InstanceId};
use crate::economy::Ledger;

/// Slack added before flooring so decimal percentages floor exactly
/// (100 * (1 - 90/100) is 9.999999999999998 in binary floating point).
const FLOOR_TOLERANCE: f64 = 1e-9;

/// Floor a non-negative damage value to whole HP, clamped at zero.
#[must_use]
pub fn floor_damage(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let floored = (value + FLOOR_TOLERANCE).floor();
    if floored >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        floored as u32
    }
}

/// `floor(raw * Π(1 - p_i/100))` over protection percentages in order.
#[must_use]
pub fn mitigate(raw: u32, protections: impl IntoIterator<Item = u8>) -> u32 {
    let remaining = protections
        .into_iter()
        .fold(f64::from(raw), |dmg, p| dmg * (1.0 - f64::from(p.min(100)) / 100.0));
    floor_damage(remaining)
}

/// Damage left after folding `raw` through attached defenses.
#[must_use]
pub fn mitigated_damage<'a>(
    raw: u32,
    defenses: impl IntoIterator<Item = &'a DefenseInstance>,
) -> u32 {
    mitigate(raw, defenses.into_iter().map(DefenseInstance::protection_percent))
}

/// Combined stacked protection of a set of defenses, as a percentage 0..=100.
#[must_use]
pub fn combined_protection_percent<'a>(
    defenses: impl IntoIterator<Item = &'a DefenseInstance>,
) -> f64 {
    let pass = defenses
        .into_iter()
        .fold(1.0, |acc, d| acc * d.template.pass_through());
    (1.0 - pass) * 100.0
}

/// What happened when one risk hit its target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskOutcome {
    pub risk: InstanceId,
    pub target: AssetKind,
    /// Scaled damage before mitigation.
    pub incoming: u32,
    /// HP the asset actually lost.
    pub hp_lost: u32,
    /// The target had at least one defense attached.
    pub defended: bool,
}

/// Result of resolving every active risk of one attack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    /// Per-risk outcomes in resolution order.
    pub outcomes: Vec<RiskOutcome>,
    /// Total HP lost across all assets this attack.
    pub hp_lost: u32,
    /// Risks that hit a defended asset.
    pub risks_defeated: u32,
    /// Money credited for defended hits.
    pub defense_bonus: i64,
    /// Assets at zero HP once resolution finished.
    pub destroyed: SmallVec<[AssetKind; 4]>,
}

impl AttackReport {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.destroyed.is_empty()
    }
}

/// Resolves an attack against the ledger.
pub struct DamageResolver;

impl DamageResolver {
    /// Resolve one risk against its target asset.
    ///
    /// A defended target earns `success_bonus` whether or not the damage was
    /// fully blocked.
    pub fn resolve_risk(ledger: &mut Ledger, risk: &RiskInstance, success_bonus: i64) -> RiskOutcome {
        let target = risk.target();
        let defended = ledger.asset(target).is_defended();
        let hp_lost = ledger.apply_damage(target, risk.scaled_damage);

        if defended {
            ledger.credit(success_bonus);
        }

        trace!(
            risk = %risk.id,
            name = risk.name(),
            %target,
            incoming = risk.scaled_damage,
            hp_lost,
            defended,
            "risk resolved"
        );

        RiskOutcome {
            risk: risk.id,
            target,
            incoming: risk.scaled_damage,
            hp_lost,
            defended,
        }
    }

    /// Resolve every risk exactly once, in the given order.
    ///
    /// Resolution never stops early: risks aimed at an asset that is already
    /// at zero HP still resolve (and lose nothing).
    pub fn resolve_attack<'a>(
        ledger: &mut Ledger,
        risks: impl IntoIterator<Item = &'a RiskInstance>,
        success_bonus: i64,
    ) -> AttackReport {
        let mut report = AttackReport::default();

        for risk in risks {
            let outcome = Self::resolve_risk(ledger, risk, success_bonus);
            report.hp_lost += outcome.hp_lost;
            if outcome.defended {
                report.risks_defeated += 1;
                report.defense_bonus += success_bonus;
            }
            report.outcomes.push(outcome);
        }

        report.destroyed = AssetKind::ALL
            .into_iter()
            .filter(|&k| ledger.asset(k).is_destroyed())
            .collect();

        debug!(
            risks = report.outcomes.len(),
            hp_lost = report.hp_lost,
            risks_defeated = report.risks_defeated,
            destroyed = ?report.destroyed,
            "attack resolved"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardInstancer, Catalog, DefenseKind, DefenseTemplate, RiskKind, RiskTemplate};
    use crate::core::GameConfig;

    fn defense(instancer: &mut CardInstancer, percent: u8, target: AssetKind) -> DefenseInstance {
        let template = DefenseTemplate::new("test", DefenseKind::Vip, "Test", 0, percent).with_target(target);
        instancer.instantiate_defense(&template)
    }

    #[test]
    fn test_floor_damage() {
        assert_eq!(floor_damage(0.0), 0);
        assert_eq!(floor_damage(-5.0), 0);
        assert_eq!(floor_damage(f64::NAN), 0);
        assert_eq!(floor_damage(99.99), 99);
        assert_eq!(floor_damage(9.999_999_999_999_998), 10);
    }

    #[test]
    fn test_mitigate_stacking() {
        assert_eq!(mitigate(200, [50]), 100);
        assert_eq!(mitigate(200, [50, 50]), 50);
        assert_eq!(mitigate(100, [90]), 10);
        assert_eq!(mitigate(150, [95]), 7);
        assert_eq!(mitigate(100, [100]), 0);
        assert_eq!(mitigate(100, [0, 0]), 100);
    }

    #[test]
    fn test_mitigate_clamps_out_of_range() {
        assert_eq!(mitigate(100, [150]), 0);
    }

    #[test]
    fn test_combined_protection() {
        let mut instancer = CardInstancer::new();
        let a = defense(&mut instancer, 50, AssetKind::House);
        let b = defense(&mut instancer, 50, AssetKind::House);

        let combined = combined_protection_percent([&a, &b]);
        assert!((combined - 75.0).abs() < 1e-9);
        assert_eq!(combined_protection_percent(std::iter::empty::<&DefenseInstance>()), 0.0);
    }

    #[test]
    fn test_resolve_risk_defended_bonus() {
        let config = GameConfig::default();
        let mut ledger = Ledger::new(&config);
        let mut instancer = CardInstancer::new();

        let shield = defense(&mut instancer, 50, AssetKind::Car);
        ledger.attach_defense(AssetKind::Car, shield);

        let theft = RiskTemplate::new("car_theft", RiskKind::Theft, "Car theft", 200, AssetKind::Car);
        let risk = instancer.instantiate_risk(&theft, 1.0);

        let outcome = DamageResolver::resolve_risk(&mut ledger, &risk, 1000);

        assert_eq!(outcome.hp_lost, 100);
        assert!(outcome.defended);
        assert_eq!(ledger.asset(AssetKind::Car).current_hp, 500);
        assert_eq!(ledger.money(), config.starting_money + 1000);
    }

    #[test]
    fn test_full_block_still_earns_bonus() {
        let config = GameConfig::default();
        let mut ledger = Ledger::new(&config);
        let mut instancer = CardInstancer::new();

        ledger.attach_defense(AssetKind::Work, defense(&mut instancer, 100, AssetKind::Work));
        let fraud = RiskTemplate::new("fraud", RiskKind::Fraud, "Fraud", 100, AssetKind::Work);
        let risk = instancer.instantiate_risk(&fraud, 1.0);

        let report = DamageResolver::resolve_attack(&mut ledger, [&risk], 1000);
        assert_eq!(report.hp_lost, 0);
        assert_eq!(report.risks_defeated, 1);
        assert_eq!(report.defense_bonus, 1000);
    }

    #[test]
    fn test_resolve_attack_reports_destroyed() {
        let config = GameConfig::default().with_asset_hp(AssetKind::Car, 100);
        let mut ledger = Ledger::new(&config);
        let mut instancer = CardInstancer::new();
        let catalog = Catalog::standard();

        let risks: Vec<_> = catalog
            .risks()
            .iter()
            .map(|t| instancer.instantiate_risk(t, 1.0))
            .collect();

        let report = DamageResolver::resolve_attack(&mut ledger, &risks, 1000);

        assert_eq!(report.outcomes.len(), risks.len());
        assert_eq!(report.risks_defeated, 0);
        assert_eq!(report.defense_bonus, 0);
        assert!(report.is_fatal());
        assert_eq!(report.destroyed.as_slice(), &[AssetKind::Car]);
        assert_eq!(ledger.asset(AssetKind::Car).current_hp, 0);

        // Order is spawn order.
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.risk).collect();
        let expected: Vec<_> = risks.iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);
    }
}
