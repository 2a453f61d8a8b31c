//! Protectable assets and per-asset data storage.
//!
//! ## AssetKind
//!
//! The four fixed things the player insures: house, family, car, work.
//!
//! ## AssetMap
//!
//! Per-asset storage backed by a fixed array for O(1) access.
//! Supports iteration and indexing by `AssetKind`.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::cards::DefenseInstance;
use crate::damage::combined_protection_percent;

/// One of the four protectable asset kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    House,
    Family,
    Car,
    Work,
}

impl AssetKind {
    /// All asset kinds in canonical order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::House,
        AssetKind::Family,
        AssetKind::Car,
        AssetKind::Work,
    ];

    /// Index into `AssetMap` storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            AssetKind::House => 0,
            AssetKind::Family => 1,
            AssetKind::Car => 2,
            AssetKind::Work => 3,
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetKind::House => "house",
            AssetKind::Family => "family",
            AssetKind::Car => "car",
            AssetKind::Work => "work",
        };
        f.write_str(name)
    }
}

/// Per-asset data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use insurance_defense::core::{AssetKind, AssetMap};
///
/// let mut hp: AssetMap<u32> = AssetMap::new(|_| 100);
/// hp[AssetKind::Car] = 40;
///
/// assert_eq!(hp[AssetKind::House], 100);
/// assert_eq!(hp[AssetKind::Car], 40);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetMap<T> {
    data: [T; 4],
}

impl<T> AssetMap<T> {
    /// Create a new AssetMap with values from a factory function.
    pub fn new(factory: impl Fn(AssetKind) -> T) -> Self {
        Self {
            data: AssetKind::ALL.map(factory),
        }
    }

    /// Get a reference to an asset's data.
    #[must_use]
    pub fn get(&self, kind: AssetKind) -> &T {
        &self.data[kind.index()]
    }

    /// Get a mutable reference to an asset's data.
    pub fn get_mut(&mut self, kind: AssetKind) -> &mut T {
        &mut self.data[kind.index()]
    }

    /// Iterate over (AssetKind, &T) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &T)> {
        AssetKind::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over values in canonical order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<AssetKind> for AssetMap<T> {
    type Output = T;

    fn index(&self, kind: AssetKind) -> &Self::Output {
        self.get(kind)
    }
}

impl<T> IndexMut<AssetKind> for AssetMap<T> {
    fn index_mut(&mut self, kind: AssetKind) -> &mut Self::Output {
        self.get_mut(kind)
    }
}

/// A protectable asset: hit points plus the defenses attached to it.
///
/// `defenses` is in attachment order, which is also mitigation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProtectableAsset {
    pub kind: AssetKind,
    pub max_hp: u32,
    pub current_hp: u32,
    pub defenses: Vector<DefenseInstance>,
}

impl ProtectableAsset {
    /// Create an asset at full health with no defenses.
    #[must_use]
    pub fn new(kind: AssetKind, max_hp: u32) -> Self {
        Self {
            kind,
            max_hp,
            current_hp: max_hp,
            defenses: Vector::new(),
        }
    }

    /// HP lost so far this game.
    #[must_use]
    pub fn hp_lost(&self) -> u32 {
        self.max_hp - self.current_hp
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.current_hp == 0
    }

    #[must_use]
    pub fn is_defended(&self) -> bool {
        !self.defenses.is_empty()
    }

    /// Combined stacked protection of all attached defenses, 0..=100.
    #[must_use]
    pub fn effective_protection_percent(&self) -> f64 {
        combined_protection_percent(self.defenses.iter())
    }
}
