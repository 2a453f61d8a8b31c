//! Error types.
//!
//! Nothing in the game core is fatal. Commands that are invalid for the
//! current state come back as a `CommandRejection` and leave the state
//! untouched; callers are free to drop the rejection on the floor.
//! Configuration and catalog problems are reported at load time.

use super::asset::AssetKind;
use super::entity::InstanceId;
use super::state::Phase;

/// Why a command was refused. The game state is unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandRejection {
    #[error("command requires phase {expected}, current phase is {actual}")]
    WrongPhase { expected: &'static str, actual: Phase },

    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: i64, need: i64 },

    #[error("card {0} is not in hand")]
    CardNotInHand(InstanceId),
}

/// Catalog validation failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no {0} templates")]
    Empty(&'static str),

    #[error("defense '{0}' has no targets")]
    NoTargets(String),

    #[error("defense '{name}' has protection {percent}% (max 100)")]
    ProtectionOutOfRange { name: String, percent: u8 },

    #[error("defense '{name}' targets {target} more than once")]
    DuplicateTarget { name: String, target: AssetKind },

    #[error("defense '{name}' has negative cost {cost}")]
    NegativeCost { name: String, cost: i64 },

    #[error("defense '{0}' has zero uses (use -1 for unlimited)")]
    ZeroUses(String),

    #[error("wave difficulty table has no entry for wave {0}")]
    MissingWave(u32),

    #[error("wave {wave} is easier than wave {previous}")]
    NonMonotoneDifficulty { wave: u32, previous: u32 },

    #[error("wave {wave} has invalid multiplier {multiplier}")]
    InvalidMultiplier { wave: u32, multiplier: f64 },

    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let funds = CommandRejection::InsufficientFunds { have: 100, need: 5000 };
        assert_eq!(funds.to_string(), "insufficient funds: have 100, need 5000");

        let missing = CommandRejection::CardNotInHand(InstanceId::new(7));
        assert_eq!(missing.to_string(), "card #7 is not in hand");

        let phase = CommandRejection::WrongPhase {
            expected: "preparation",
            actual: Phase::Attack,
        };
        assert_eq!(
            phase.to_string(),
            "command requires phase preparation, current phase is attack"
        );
    }

    #[test]
    fn test_catalog_error_messages() {
        let err = CatalogError::MissingWave(3);
        assert_eq!(err.to_string(), "wave difficulty table has no entry for wave 3");

        let err = CatalogError::DuplicateTarget {
            name: "kasko".into(),
            target: AssetKind::Car,
        };
        assert_eq!(err.to_string(), "defense 'kasko' targets car more than once");
    }
}
