//! Core types: identities, assets, state, RNG, configuration, errors.
//!
//! These are the building blocks every other module works with. Game rules
//! live in `economy`, `damage` and `wave`; this module only holds data.

pub mod asset;
pub mod config;
pub mod entity;
pub mod error;
pub mod rng;
pub mod state;

pub use asset::{AssetKind, AssetMap, ProtectableAsset};
pub use config::{AssetHp, GameConfig};
pub use entity::{IdAllocator, InstanceId};
pub use error::{CatalogError, CommandRejection, ConfigError};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, Phase};
