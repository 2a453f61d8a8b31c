//! Economy & asset ledger.
//!
//! The ledger owns money, reputation and the four protectable assets. It is
//! the only place HP goes down and the only place money moves.
//!
//! `debit` does not check the balance. Callers check affordability first
//! (see `WaveOrchestrator::play_defense`).

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cards::DefenseInstance;
use crate::core::{AssetKind, AssetMap, GameConfig, ProtectableAsset};
use crate::damage::mitigated_damage;

/// Money, reputation and asset health for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    money: i64,
    reputation: i64,
    assets: AssetMap<ProtectableAsset>,
}

impl Ledger {
    /// Starting balance and full-health assets from config.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            money: config.starting_money,
            reputation: config.starting_reputation,
            assets: AssetMap::new(|kind| ProtectableAsset::new(kind, config.asset_hp.get(kind))),
        }
    }

    #[must_use]
    pub fn money(&self) -> i64 {
        self.money
    }

    #[must_use]
    pub fn reputation(&self) -> i64 {
        self.reputation
    }

    #[must_use]
    pub fn asset(&self, kind: AssetKind) -> &ProtectableAsset {
        &self.assets[kind]
    }

    #[must_use]
    pub fn assets(&self) -> &AssetMap<ProtectableAsset> {
        &self.assets
    }

    #[must_use]
    pub fn can_afford(&self, amount: i64) -> bool {
        self.money >= amount
    }

    pub fn credit(&mut self, amount: i64) {
        self.money += amount;
    }

    /// Subtract `amount`. Unchecked; see module docs.
    pub fn debit(&mut self, amount: i64) {
        self.money -= amount;
    }

    /// Fold `raw` through the asset's defenses, subtract the result from HP
    /// (clamped at zero) and return the HP actually lost.
    pub fn apply_damage(&mut self, kind: AssetKind, raw: u32) -> u32 {
        let asset = &mut self.assets[kind];
        let mitigated = mitigated_damage(raw, asset.defenses.iter());
        let lost = mitigated.min(asset.current_hp);
        asset.current_hp -= lost;

        trace!(asset = %kind, raw, mitigated, lost, hp = asset.current_hp, "damage applied");
        lost
    }

    /// Append a defense to an asset. No per-asset cap is enforced.
    pub fn attach_defense(&mut self, kind: AssetKind, defense: DefenseInstance) {
        self.assets[kind].defenses.push_back(defense);
    }

    /// Sum over assets of `max_hp - current_hp`.
    #[must_use]
    pub fn cumulative_damage(&self) -> u32 {
        self.assets.values().map(ProtectableAsset::hp_lost).sum()
    }
}
