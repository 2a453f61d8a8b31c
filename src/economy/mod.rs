//! Economy and asset ledger: money, reputation, asset HP and attached defenses.

mod ledger;

pub use ledger::Ledger;
