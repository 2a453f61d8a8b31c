//! # insurance-defense
//!
//! Core of a wave-based defense game. The player buys insurance defenses to
//! protect four assets (house, family, car, work) from escalating waves of
//! risks.
//!
//! ## Design Principles
//!
//! 1. **Headless**: No rendering, no wall clock. Presentation code reads a
//!    `GameState` snapshot and sends two commands: play a card, or advance.
//!
//! 2. **Deterministic**: All randomness comes from one seeded ChaCha8 stream
//!    owned by the orchestrator. Same seed, same commands, same game.
//!
//! 3. **Configuration Over Constants**: Durations, economy, HP and the card
//!    catalog come from `GameConfig` and `Catalog`, loadable from TOML.
//!
//! ## Game Loop
//!
//! ```
//! use insurance_defense::command::Command;
//! use insurance_defense::core::Phase;
//! use insurance_defense::wave::WaveOrchestrator;
//!
//! let mut game = WaveOrchestrator::with_defaults();
//! let card = game.state().hand[0].id;
//! game.apply(Command::PlayDefense(card)).unwrap();
//!
//! assert_eq!(game.tick_until_transition(), Some(Phase::Attack));
//! assert_eq!(game.tick_until_transition(), Some(Phase::Summary));
//! game.apply(Command::Advance).unwrap();
//! assert_eq!(game.state().wave, 2);
//! ```
//!
//! ## Modules
//!
//! - `core`: Instance IDs, assets, state, RNG, configuration, errors
//! - `cards`: Card templates, instances, and the catalog
//! - `economy`: Money and asset health
//! - `damage`: Mitigation stacking and attack resolution
//! - `wave`: Phase state machine, simulated clock, wave history
//! - `command`: Player commands
//! - `policy`: Autoplay policies for headless runs

pub mod cards;
pub mod command;
pub mod core;
pub mod damage;
pub mod economy;
pub mod policy;
pub mod wave;

// Re-export commonly used types
pub use crate::core::{
    AssetKind, AssetMap, CatalogError, CommandRejection, ConfigError, GameConfig, GameRng,
    GameRngState, GameState, InstanceId, Phase, ProtectableAsset,
};

pub use crate::cards::{
    CardInstancer, Catalog, DefenseInstance, DefenseKind, DefenseTemplate, RiskInstance,
    RiskKind, RiskTemplate, WaveDifficulty,
};

pub use crate::command::Command;
pub use crate::damage::{AttackReport, DamageResolver, RiskOutcome};
pub use crate::economy::Ledger;
pub use crate::policy::{play_game, GameReport, GreedyPolicy, PassivePolicy, Policy};
pub use crate::wave::{GameOutcome, GameTotals, WaveHistoryEntry, WaveOrchestrator, WaveRating};
