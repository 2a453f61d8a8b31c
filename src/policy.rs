//! Autoplay policies.
//!
//! A `Policy` stands in for the presentation layer: it looks at the live game
//! and picks the next command. `play_game` drives one game from wherever the
//! orchestrator currently is to victory or defeat.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;
use crate::core::{CommandRejection, GameRngState, GameState, Phase};
use crate::wave::{GameOutcome, GameTotals, WaveOrchestrator};

/// Chooses commands during the preparation phase.
pub trait Policy {
    /// Next command to issue, or `None` to let the clock run.
    fn decide(&mut self, game: &WaveOrchestrator) -> Option<Command>;
}

/// Never buys anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassivePolicy;

impl Policy for PassivePolicy {
    fn decide(&mut self, _game: &WaveOrchestrator) -> Option<Command> {
        None
    }
}

/// Buys the cheapest affordable card in hand, once per preparation phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy {
    last_purchase: Option<(u32, u32)>,
}

impl GreedyPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for GreedyPolicy {
    fn decide(&mut self, game: &WaveOrchestrator) -> Option<Command> {
        let state = game.state();
        if state.phase != Phase::Preparation {
            return None;
        }
        let phase_key = (game.games_started(), state.wave);
        if self.last_purchase == Some(phase_key) {
            return None;
        }

        let card = state
            .hand
            .iter()
            .filter(|card| state.ledger.can_afford(card.cost()))
            .min_by_key(|card| card.cost())?;

        self.last_purchase = Some(phase_key);
        Some(Command::PlayDefense(card.id))
    }
}

/// Result of one autoplayed game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub totals: GameTotals,
    pub final_state: GameState,
    /// RNG stream position when the game ended, for replaying a session.
    pub rng: GameRngState,
}

/// Play the current game to the end.
///
/// On return the orchestrator sits in `Summary` (victory) or `GameOver`
/// (defeat); call `advance` to start the next game.
pub fn play_game(
    game: &mut WaveOrchestrator,
    policy: &mut impl Policy,
) -> Result<GameReport, CommandRejection> {
    loop {
        if let Some(outcome) = game.outcome() {
            return Ok(GameReport {
                outcome,
                totals: game.totals(),
                final_state: game.snapshot(),
                rng: game.rng_state(),
            });
        }

        match game.state().phase {
            Phase::Preparation => {
                while let Some(command) = policy.decide(game) {
                    if let Err(rejection) = game.apply(command) {
                        debug!(%command, %rejection, "policy command rejected");
                        break;
                    }
                }
                game.tick_until_transition();
            }
            Phase::Attack => {
                game.tick_until_transition();
            }
            Phase::Summary | Phase::GameOver => {
                game.advance()?;
            }
        }
    }
}
