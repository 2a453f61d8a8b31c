//! Damage resolution.
//!
//! - `mitigate` / `mitigated_damage`: sequential multiplicative stacking
//! - `DamageResolver`: resolves risks against the ledger and reports
//!   per-risk outcomes, defense bonuses and destroyed assets

mod resolver;

pub use resolver::{
    combined_protection_percent, floor_damage, mitigate, mitigated_damage, AttackReport,
    DamageResolver, RiskOutcome,
};
