//! Game state: the aggregate root of one game.
//!
//! ## GameState
//!
//! - Wave number and current phase
//! - Time left in the current phase
//! - The ledger (money, reputation, the four assets)
//! - Hand, active risks, played cards
//! - Wave history
//!
//! Exactly one `GameState` is live per session. It is owned by the
//! `WaveOrchestrator` and replaced wholesale on restart. Presentation code
//! reads clones of it; collections use `im` persistent vectors so those
//! snapshots are O(1) to take.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::asset::{AssetKind, ProtectableAsset};
use super::config::GameConfig;
use super::entity::InstanceId;
use crate::cards::{DefenseInstance, RiskInstance};
use crate::economy::Ledger;
use crate::wave::WaveHistoryEntry;

/// Phase of the wave state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Timed; defenses may be bought.
    Preparation,
    /// Timed; risks are on the board and resolve when the timer runs out.
    Attack,
    /// Waiting for the player to continue.
    Summary,
    /// An asset was destroyed. Waiting for restart.
    GameOver,
}

impl Phase {
    /// Whether the clock runs in this phase.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Phase::Preparation | Phase::Attack)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Preparation => "preparation",
            Phase::Attack => "attack",
            Phase::Summary => "summary",
            Phase::GameOver => "game_over",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Current wave, 1..=total_waves.
    pub wave: u32,

    pub phase: Phase,

    /// Time left in the current timed phase. Zero outside timed phases.
    pub time_left_ms: u64,

    /// Money, reputation, and the four assets.
    pub ledger: Ledger,

    /// Cards available to play, in draw order.
    pub hand: Vector<DefenseInstance>,

    /// Risks spawned for the current attack, in spawn order.
    pub active_risks: Vector<RiskInstance>,

    /// Every card played this game, in play order.
    pub played_cards: Vector<DefenseInstance>,

    /// One entry per resolved wave.
    pub wave_history: Vector<WaveHistoryEntry>,
}

impl GameState {
    /// Fresh state for wave 1: full HP, starting money, empty collections.
    ///
    /// The initial hand is drawn by the orchestrator, not here.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            wave: 1,
            phase: Phase::Preparation,
            time_left_ms: config.preparation_ms,
            ledger: Ledger::new(config),
            hand: Vector::new(),
            active_risks: Vector::new(),
            played_cards: Vector::new(),
            wave_history: Vector::new(),
        }
    }

    #[must_use]
    pub fn money(&self) -> i64 {
        self.ledger.money()
    }

    #[must_use]
    pub fn reputation(&self) -> i64 {
        self.ledger.reputation()
    }

    #[must_use]
    pub fn asset(&self, kind: AssetKind) -> &ProtectableAsset {
        self.ledger.asset(kind)
    }

    /// Find a card in hand.
    #[must_use]
    pub fn hand_card(&self, id: InstanceId) -> Option<&DefenseInstance> {
        self.hand.iter().find(|c| c.id == id)
    }

    /// Position of a card in hand.
    #[must_use]
    pub fn hand_position(&self, id: InstanceId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == id)
    }

    /// Is any asset at zero HP?
    #[must_use]
    pub fn any_asset_destroyed(&self) -> bool {
        self.ledger.assets().values().any(ProtectableAsset::is_destroyed)
    }

    /// Most recent wave history entry.
    #[must_use]
    pub fn last_wave(&self) -> Option<&WaveHistoryEntry> {
        self.wave_history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::GameOver.to_string(), "game_over");
        assert!(Phase::Preparation.is_timed());
        assert!(Phase::Attack.is_timed());
        assert!(!Phase::Summary.is_timed());
        assert!(!Phase::GameOver.is_timed());
    }

    #[test]
    fn test_phase_serde() {
        let json = serde_json::to_string(&Phase::GameOver).unwrap();
        assert_eq!(json, "\"game_over\"");
    }

    #[test]
    fn test_initial_state() {
        let config = GameConfig::default();
        let state = GameState::new(&config);

        assert_eq!(state.wave, 1);
        assert_eq!(state.phase, Phase::Preparation);
        assert_eq!(state.time_left_ms, 15_000);
        assert_eq!(state.money(), 40_000);
        assert_eq!(state.reputation(), 100);
        assert!(state.hand.is_empty());
        assert!(state.active_risks.is_empty());
        assert!(state.played_cards.is_empty());
        assert!(state.wave_history.is_empty());
        assert!(!state.any_asset_destroyed());

        for kind in AssetKind::ALL {
            let asset = state.asset(kind);
            assert_eq!(asset.current_hp, asset.max_hp);
        }
    }

    #[test]
    fn test_snapshot_clone_is_independent() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let snapshot = state.clone();

        state.wave = 2;
        state.ledger.credit(500);

        assert_eq!(snapshot.wave, 1);
        assert_eq!(snapshot.money(), 40_000);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(&GameConfig::default());
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["phase"], "preparation");
        assert_eq!(json["wave"], 1);
    }
}
