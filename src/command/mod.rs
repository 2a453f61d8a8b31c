//! Command surface: the only inputs the presentation layer can send.
//!
//! A command either applies fully or is rejected with a `CommandRejection`
//! and no observable change. Rejections are logged at debug level and
//! returned; nothing here panics.
//!
//! ```
//! use insurance_defense::command::Command;
//! use insurance_defense::core::{CommandRejection, Phase};
//! use insurance_defense::wave::WaveOrchestrator;
//!
//! let mut game = WaveOrchestrator::with_defaults();
//! let before = game.snapshot();
//!
//! // Advancing is only allowed once a wave has been resolved.
//! let err = game.apply(Command::Advance).unwrap_err();
//! assert!(matches!(err, CommandRejection::WrongPhase { actual: Phase::Preparation, .. }));
//! assert_eq!(game.snapshot(), before);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{CommandRejection, InstanceId, Phase};
use crate::wave::WaveOrchestrator;

/// A player command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "card", rename_all = "snake_case")]
pub enum Command {
    /// Buy a card from hand and attach it to its targets.
    PlayDefense(InstanceId),
    /// Leave the summary or game-over screen.
    Advance,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::PlayDefense(id) => write!(f, "play {id}"),
            Command::Advance => f.write_str("advance"),
        }
    }
}

impl WaveOrchestrator {
    /// Apply a command to the live game.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandRejection> {
        let result = match command {
            Command::PlayDefense(id) => self.play_defense(id),
            Command::Advance => self.advance().map(|_| ()),
        };
        if let Err(rejection) = &result {
            debug!(%command, %rejection, "command rejected");
        }
        result
    }

    /// Buy the card `id` from hand: pay its cost, move it to the played
    /// pile and attach it to every asset it targets.
    ///
    /// Only legal during preparation. Each rejection leaves state unchanged.
    pub fn play_defense(&mut self, id: InstanceId) -> Result<(), CommandRejection> {
        if self.state.phase != Phase::Preparation {
            return Err(CommandRejection::WrongPhase {
                expected: Phase::Preparation.name(),
                actual: self.state.phase,
            });
        }

        let position = self
            .state
            .hand_position(id)
            .ok_or(CommandRejection::CardNotInHand(id))?;

        let cost = self.state.hand[position].cost();
        if !self.state.ledger.can_afford(cost) {
            return Err(CommandRejection::InsufficientFunds {
                have: self.state.money(),
                need: cost,
            });
        }

        let card = self.state.hand.remove(position);
        self.state.ledger.debit(cost);
        for &target in card.targets() {
            self.state.ledger.attach_defense(target, card.clone());
        }

        info!(
            card = %card.id,
            name = card.name(),
            cost,
            targets = ?card.targets(),
            money = self.state.money(),
            "defense played"
        );
        self.state.played_cards.push_back(card);
        Ok(())
    }

    /// Continue from the summary or game-over screen.
    ///
    /// After a non-final wave this starts the next preparation phase. After
    /// the final wave, or after a loss, it starts a brand new game. Returns
    /// the phase entered.
    pub fn advance(&mut self) -> Result<Phase, CommandRejection> {
        match self.state.phase {
            Phase::Summary if self.state.wave < self.config.total_waves => self.next_wave(),
            Phase::Summary | Phase::GameOver => self.restart(),
            actual @ (Phase::Preparation | Phase::Attack) => {
                return Err(CommandRejection::WrongPhase {
                    expected: "summary or game_over",
                    actual,
                });
            }
        }
        Ok(self.state.phase)
    }

    /// Draw up to `count` random defense cards into hand, never past the
    /// hand cap. Templates are picked uniformly with replacement. Returns the
    /// number of cards drawn.
    pub fn draw_hand(&mut self, count: usize) -> usize {
        let room = self.config.hand_size_cap.saturating_sub(self.state.hand.len());
        let wanted = count.min(room);

        let mut drawn = 0;
        for _ in 0..wanted {
            let Some(template) = self.rng.choose(self.catalog.defenses()) else {
                break;
            };
            let card = self.instancer.instantiate_defense(template);
            self.state.hand.push_back(card);
            drawn += 1;
        }

        debug!(requested = count, drawn, hand = self.state.hand.len(), "cards drawn");
        drawn
    }

    /// Commands that would currently be accepted.
    #[must_use]
    pub fn legal_commands(&self) -> Vec<Command> {
        match self.state.phase {
            Phase::Preparation => self
                .state
                .hand
                .iter()
                .filter(|card| self.state.ledger.can_afford(card.cost()))
                .map(|card| Command::PlayDefense(card.id))
                .collect(),
            Phase::Attack => Vec::new(),
            Phase::Summary | Phase::GameOver => vec![Command::Advance],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Catalog;
    use crate::core::{AssetKind, GameConfig};

    fn game() -> WaveOrchestrator {
        WaveOrchestrator::with_defaults()
    }

    #[test]
    fn test_play_defense_moves_card_and_money() {
        let mut game = game();
        let card = game.state().hand[0].clone();
        let money = game.state().money();

        game.play_defense(card.id).unwrap();

        let state = game.state();
        assert_eq!(state.money(), money - card.cost());
        assert!(state.hand_card(card.id).is_none());
        assert_eq!(state.played_cards.len(), 1);
        for &target in card.targets() {
            assert!(state.asset(target).defenses.iter().any(|d| d.id == card.id));
        }
    }

    #[test]
    fn test_play_twice_rejected() {
        let mut game = game();
        let id = game.state().hand[0].id;

        game.play_defense(id).unwrap();
        let after_first = game.snapshot();

        assert_eq!(game.play_defense(id), Err(CommandRejection::CardNotInHand(id)));
        assert_eq!(game.snapshot(), after_first);
    }

    #[test]
    fn test_insufficient_funds() {
        let config = GameConfig::new().with_starting_money(0);
        let mut game = WaveOrchestrator::new(config, Catalog::standard()).unwrap();
        let card = game.state().hand[0].clone();
        let before = game.snapshot();

        assert_eq!(
            game.play_defense(card.id),
            Err(CommandRejection::InsufficientFunds {
                have: 0,
                need: card.cost()
            })
        );
        assert_eq!(game.snapshot(), before);
        assert!(game.legal_commands().is_empty());
    }

    #[test]
    fn test_play_outside_preparation() {
        let mut game = game();
        let id = game.state().hand[0].id;
        game.tick_until_transition();

        let before = game.snapshot();
        let err = game.play_defense(id).unwrap_err();
        assert_eq!(
            err,
            CommandRejection::WrongPhase {
                expected: "preparation",
                actual: Phase::Attack
            }
        );
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_draw_respects_cap() {
        let mut game = game();
        assert_eq!(game.state().hand.len(), 4);

        assert_eq!(game.draw_hand(10), 2);
        assert_eq!(game.state().hand.len(), 6);
        assert_eq!(game.draw_hand(1), 0);
    }

    #[test]
    fn test_advance_to_next_wave_redraws() {
        let mut game = game();
        game.tick_until_transition();
        game.tick_until_transition();
        assert_eq!(game.state().phase, Phase::Summary);

        assert_eq!(game.advance(), Ok(Phase::Preparation));
        let state = game.state();
        assert_eq!(state.wave, 2);
        assert_eq!(state.hand.len(), 4);
        assert_eq!(state.time_left_ms, 15_000);
    }

    #[test]
    fn test_legal_commands() {
        let mut game = game();
        assert_eq!(game.legal_commands().len(), 4);

        game.tick_until_transition();
        assert!(game.legal_commands().is_empty());

        game.tick_until_transition();
        assert_eq!(game.legal_commands(), vec![Command::Advance]);
    }

    #[test]
    fn test_multi_target_card_attaches_everywhere() {
        let mut game = game();
        let vip = game.catalog().defense_by_key("vip_package").unwrap().clone();
        let card = game.instancer.instantiate_defense(&vip);
        game.state.hand.push_back(card.clone());

        game.play_defense(card.id).unwrap();

        for kind in AssetKind::ALL {
            assert_eq!(game.state().asset(kind).defenses.len(), 1);
        }
        assert_eq!(game.state().played_cards.len(), 1);
    }

    #[test]
    fn test_command_serde() {
        let json = serde_json::to_string(&Command::PlayDefense(InstanceId(7))).unwrap();
        assert_eq!(json, r#"{"type":"play_defense","card":7}"#);
        let back: Command = serde_json::from_str(r#"{"type":"advance"}"#).unwrap();
        assert_eq!(back, Command::Advance);
    }
}
