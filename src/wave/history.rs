//! Wave history and end-of-game aggregation.

use serde::{Deserialize, Serialize};

/// Immutable record of one resolved wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveHistoryEntry {
    pub wave: u32,
    /// HP lost across all assets during this wave's attack.
    pub damage_taken: u32,
    /// HP lost across all assets since the game started, measured when the
    /// wave resolved. Non-decreasing across entries.
    pub cumulative_damage: u32,
    /// Defense bonuses plus the wave-completion bonus.
    pub money_earned: i64,
    /// Risks that hit a defended asset.
    pub risks_defeated: u32,
}

impl WaveHistoryEntry {
    #[must_use]
    pub fn rating(&self) -> WaveRating {
        WaveRating::from_damage(self.damage_taken)
    }
}

/// How well a wave went, judged by damage taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveRating {
    Perfect,
    Excellent,
    Good,
    Satisfactory,
    Survived,
}

impl WaveRating {
    #[must_use]
    pub fn from_damage(damage_taken: u32) -> Self {
        match damage_taken {
            0 => WaveRating::Perfect,
            1..=99 => WaveRating::Excellent,
            100..=299 => WaveRating::Good,
            300..=499 => WaveRating::Satisfactory,
            _ => WaveRating::Survived,
        }
    }
}

impl std::fmt::Display for WaveRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WaveRating::Perfect => "Perfect!",
            WaveRating::Excellent => "Excellent!",
            WaveRating::Good => "Good",
            WaveRating::Satisfactory => "Satisfactory",
            WaveRating::Survived => "Survived",
        };
        f.write_str(label)
    }
}

/// Sums over the whole wave history, for the end-of-game screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTotals {
    pub waves: u32,
    pub damage_taken: u32,
    pub money_earned: i64,
    pub risks_defeated: u32,
}

impl GameTotals {
    pub fn from_history<'a>(history: impl IntoIterator<Item = &'a WaveHistoryEntry>) -> Self {
        history.into_iter().fold(Self::default(), |mut acc, entry| {
            acc.waves += 1;
            acc.damage_taken += entry.damage_taken;
            acc.money_earned += entry.money_earned;
            acc.risks_defeated += entry.risks_defeated;
            acc
        })
    }
}
