//! Card instances - a template bound to a unique identity.
//!
//! `DefenseInstance` is a specific insurance card sitting in the hand or
//! attached to an asset. `RiskInstance` is a specific attack spawned for one
//! wave, carrying its damage already scaled by the wave multiplier.
//!
//! `CardInstancer` is the only place identities are minted.

use serde::{Deserialize, Serialize};

use super::definition::{DefenseTemplate, RiskTemplate};
use crate::core::entity::{IdAllocator, InstanceId};
use crate::core::AssetKind;
use crate::damage::floor_damage;

/// A defense card instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefenseInstance {
    /// Unique ID for this draw.
    pub id: InstanceId,

    /// The template this card was drawn from.
    pub template: DefenseTemplate,
}

impl DefenseInstance {
    #[must_use]
    pub fn cost(&self) -> i64 {
        self.template.cost
    }

    #[must_use]
    pub fn protection_percent(&self) -> u8 {
        self.template.protection_percent
    }

    #[must_use]
    pub fn targets(&self) -> &[AssetKind] {
        &self.template.targets
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.name
    }
}

/// A risk instance spawned for the current wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskInstance {
    pub id: InstanceId,
    pub template: RiskTemplate,
    /// `floor(base_damage * wave multiplier)`.
    pub scaled_damage: u32,
}

impl RiskInstance {
    #[must_use]
    pub fn target(&self) -> AssetKind {
        self.template.target
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.template.name
    }
}

/// Turns catalog templates into uniquely identified instances.
#[derive(Clone, Debug, Default)]
pub struct CardInstancer {
    ids: IdAllocator,
}

impl CardInstancer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: IdAllocator::new(),
        }
    }

    /// Bind a defense template to a fresh identity.
    pub fn instantiate_defense(&mut self, template: &DefenseTemplate) -> DefenseInstance {
        DefenseInstance {
            id: self.ids.next_id(),
            template: template.clone(),
        }
    }

    /// Bind a risk template to a fresh identity with wave-scaled damage.
    pub fn instantiate_risk(&mut self, template: &RiskTemplate, multiplier: f64) -> RiskInstance {
        RiskInstance {
            id: self.ids.next_id(),
            template: template.clone(),
            scaled_damage: Self::scale_damage(template, multiplier),
        }
    }

    /// `floor(base_damage * multiplier)`, clamped at zero.
    #[must_use]
    pub fn scale_damage(template: &RiskTemplate, multiplier: f64) -> u32 {
        floor_damage(f64::from(template.base_damage) * multiplier)
    }

    /// Number of instances minted this session.
    #[must_use]
    pub fn minted(&self) -> u64 {
        self.ids.allocated()
    }
}
