//! The wave state machine.
//!
//! ```text
//! Preparation --timer--> Attack --timer--> Summary --advance--> Preparation (wave + 1)
//!                                   |          |
//!                                   |          +--advance on last wave--> restart
//!                                   +--> GameOver --advance--> restart
//! ```
//!
//! Timed phases end on a deadline scheduled on the orchestrator's `Timeline`.
//! Every transition cancels whatever was pending before scheduling the next
//! deadline, and a deadline only acts if its phase and wave still match the
//! live state.

use tracing::{debug, info, warn};

use crate::cards::{CardInstancer, Catalog};
use crate::core::{ConfigError, GameConfig, GameRng, GameRngState, GameState, Phase};
use crate::damage::{AttackReport, DamageResolver};

use super::history::{GameTotals, WaveHistoryEntry};
use super::timeline::{TaskHandle, TaskKind, Timeline};

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// Survived the final wave.
    Victory,
    /// An asset was destroyed.
    Defeat,
}

/// Owns the live `GameState` and drives it through the wave cycle.
///
/// All mutation goes through `tick` and the command methods
/// (`play_defense`, `advance`, `draw_hand`, `apply`). Readers get the state by
/// reference or take a snapshot.
#[derive(Clone, Debug)]
pub struct WaveOrchestrator {
    pub(crate) config: GameConfig,
    pub(crate) catalog: Catalog,
    pub(crate) state: GameState,
    pub(crate) rng: GameRng,
    pub(crate) instancer: CardInstancer,
    timeline: Timeline,
    deadline: Option<TaskHandle>,
    last_attack: Option<AttackReport>,
    games_started: u32,
}

impl WaveOrchestrator {
    /// Validate `config` and `catalog`, then start the first game.
    pub fn new(config: GameConfig, catalog: Catalog) -> Result<Self, ConfigError> {
        config.validate()?;
        catalog.validate(config.total_waves)?;
        Ok(Self::start(config, catalog))
    }

    /// Default config and the standard catalog.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::start(GameConfig::default(), Catalog::standard())
    }

    fn start(config: GameConfig, catalog: Catalog) -> Self {
        let rng = GameRng::new(config.seed);
        let state = GameState::new(&config);
        let mut orchestrator = Self {
            config,
            catalog,
            state,
            rng,
            instancer: CardInstancer::new(),
            timeline: Timeline::new(),
            deadline: None,
            last_attack: None,
            games_started: 0,
        };
        orchestrator.begin_game();
        orchestrator
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Cheap copy of the current state for presentation.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Simulated time since the session began.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    /// Games started this session, counting the current one.
    #[must_use]
    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    /// Report of the most recent attack, cleared on restart.
    #[must_use]
    pub fn last_attack(&self) -> Option<&AttackReport> {
        self.last_attack.as_ref()
    }

    /// `Some` once the current game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.state.phase {
            Phase::GameOver => Some(GameOutcome::Defeat),
            Phase::Summary if self.state.wave >= self.config.total_waves => Some(GameOutcome::Victory),
            _ => None,
        }
    }

    #[must_use]
    pub fn totals(&self) -> GameTotals {
        GameTotals::from_history(&self.state.wave_history)
    }

    /// Advance the clock by one tick.
    ///
    /// Does nothing outside timed phases. Returns the new phase if a deadline
    /// fired and the state machine moved.
    pub fn tick(&mut self) -> Option<Phase> {
        if !self.state.phase.is_timed() {
            return None;
        }

        let fired = self.timeline.advance(self.config.tick_ms);
        self.state.time_left_ms = self
            .deadline
            .and_then(|handle| self.timeline.remaining(handle))
            .unwrap_or(0);

        let mut transition = None;
        for kind in fired {
            let TaskKind::PhaseDeadline { phase, wave } = kind;
            if phase != self.state.phase || wave != self.state.wave {
                debug!(%phase, wave, "stale deadline ignored");
                continue;
            }
            match phase {
                Phase::Preparation => self.begin_attack(),
                Phase::Attack => self.resolve_attack(),
                Phase::Summary | Phase::GameOver => continue,
            }
            transition = Some(self.state.phase);
        }
        transition
    }

    /// Tick until the phase changes. Returns `None` if the current phase is
    /// not timed.
    pub fn tick_until_transition(&mut self) -> Option<Phase> {
        if !self.state.phase.is_timed() {
            return None;
        }
        let longest = self.config.preparation_ms.max(self.config.attack_ms);
        let limit = self.config.ticks_for(longest) + 1;
        for _ in 0..limit {
            if let Some(phase) = self.tick() {
                return Some(phase);
            }
        }
        None
    }

    /// Replace the live game with a fresh one. RNG and instance ids carry on.
    pub(crate) fn restart(&mut self) {
        info!(
            wave = self.state.wave,
            phase = %self.state.phase,
            games = self.games_started,
            "restarting game"
        );
        self.state = GameState::new(&self.config);
        self.last_attack = None;
        self.begin_game();
    }

    /// Summary -> Preparation of the next wave.
    pub(crate) fn next_wave(&mut self) {
        self.state.wave += 1;
        self.state.hand.clear();
        self.enter_preparation();
        self.draw_hand(self.config.hand_draw_count);
        info!(wave = self.state.wave, "preparation started");
    }

    fn begin_game(&mut self) {
        self.games_started += 1;
        self.enter_preparation();
        self.draw_hand(self.config.hand_draw_count);
        info!(
            game = self.games_started,
            seed = self.rng.seed(),
            money = self.state.money(),
            "game started"
        );
    }

    fn enter_preparation(&mut self) {
        self.state.phase = Phase::Preparation;
        self.schedule_deadline(self.config.preparation_ms);
    }

    fn schedule_deadline(&mut self, duration_ms: u64) {
        self.timeline.cancel_all();
        let kind = TaskKind::PhaseDeadline {
            phase: self.state.phase,
            wave: self.state.wave,
        };
        self.deadline = Some(self.timeline.schedule_in(duration_ms, kind));
        self.state.time_left_ms = duration_ms;
    }

    fn clear_deadline(&mut self) {
        self.timeline.cancel_all();
        self.deadline = None;
        self.state.time_left_ms = 0;
    }

    fn begin_attack(&mut self) {
        self.state.phase = Phase::Attack;
        self.schedule_deadline(self.config.attack_ms);

        let wave = self.state.wave;
        let Some(difficulty) = self.catalog.wave_difficulty(wave).copied() else {
            warn!(wave, "no difficulty entry for wave; attack has no risks");
            self.state.active_risks.clear();
            return;
        };

        let risks = self.catalog.risks();
        let picks = self.rng.sample_indices(risks.len(), difficulty.enemy_count);
        self.state.active_risks = picks
            .into_iter()
            .map(|i| {
                self.instancer
                    .instantiate_risk(&risks[i], difficulty.difficulty_multiplier)
            })
            .collect();

        info!(
            wave,
            risks = self.state.active_risks.len(),
            multiplier = difficulty.difficulty_multiplier,
            "attack started"
        );
    }

    fn resolve_attack(&mut self) {
        let risks = std::mem::take(&mut self.state.active_risks);
        let ledger = &mut self.state.ledger;

        let report =
            DamageResolver::resolve_attack(ledger, &risks, self.config.defense_success_bonus);
        ledger.credit(self.config.wave_completion_bonus);

        let entry = WaveHistoryEntry {
            wave: self.state.wave,
            damage_taken: report.hp_lost,
            cumulative_damage: ledger.cumulative_damage(),
            money_earned: report.defense_bonus + self.config.wave_completion_bonus,
            risks_defeated: report.risks_defeated,
        };
        self.state.wave_history.push_back(entry);

        self.clear_deadline();
        self.state.phase = if report.is_fatal() {
            Phase::GameOver
        } else {
            Phase::Summary
        };

        info!(
            wave = entry.wave,
            phase = %self.state.phase,
            damage = entry.damage_taken,
            earned = entry.money_earned,
            rating = %entry.rating(),
            "wave resolved"
        );
        self.last_attack = Some(report);
    }
}

impl Default for WaveOrchestrator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
