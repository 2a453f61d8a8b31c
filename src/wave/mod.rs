//! Wave orchestration: the phase state machine, its clock and the wave log.

mod history;
mod orchestrator;
mod timeline;

pub use history::{GameTotals, WaveHistoryEntry, WaveRating};
pub use orchestrator::{GameOutcome, WaveOrchestrator};
pub use timeline::{TaskHandle, TaskKind, Timeline};
