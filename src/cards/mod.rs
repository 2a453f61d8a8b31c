//! Card system: templates, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `DefenseTemplate` / `RiskTemplate`: immutable catalog entries
//! - `DefenseInstance` / `RiskInstance`: a template bound to a unique `InstanceId`
//! - `CardInstancer`: mints instances and scales risk damage
//! - `Catalog`: defense and risk templates plus the wave difficulty table

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{DefenseKind, DefenseTemplate, RiskKind, RiskTemplate, Targets, Uses};
pub use instance::{CardInstancer, DefenseInstance, RiskInstance};
pub use registry::{Catalog, WaveDifficulty};
