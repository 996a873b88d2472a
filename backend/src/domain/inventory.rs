//! Inventory snapshots and admin bulk updates.

use std::collections::BTreeMap;

use crate::domain::BloodType;

/// Stock strictly below this many units raises a low-stock alert.
pub const LOW_STOCK_THRESHOLD: u32 = 3;

/// Unit counts for every blood type, in canonical order.
///
/// Types without a stored entry read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLevels {
    levels: BTreeMap<BloodType, u32>,
}

impl InventoryLevels {
    /// Build a snapshot from stored entries, filling gaps with zero.
    pub fn from_entries(entries: impl IntoIterator<Item = (BloodType, u32)>) -> Self {
        let mut levels: BTreeMap<BloodType, u32> =
            BloodType::ALL.into_iter().map(|bt| (bt, 0)).collect();
        levels.extend(entries);
        Self { levels }
    }

    pub fn quantity(&self, blood_type: BloodType) -> u32 {
        self.levels.get(&blood_type).copied().unwrap_or_default()
    }

    /// Entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BloodType, u32)> + '_ {
        self.levels.iter().map(|(bt, qty)| (*bt, *qty))
    }

    /// Blood types currently below [`LOW_STOCK_THRESHOLD`].
    ///
    /// # Examples
    /// ```
    /// use bloodbridge::domain::{BloodType, InventoryLevels};
    ///
    /// let levels = InventoryLevels::from_entries([(BloodType::OPositive, 10)]);
    /// assert!(!levels.low_stock().contains(&BloodType::OPositive));
    /// assert!(levels.low_stock().contains(&BloodType::ONegative));
    /// ```
    pub fn low_stock(&self) -> Vec<BloodType> {
        self.iter()
            .filter(|(_, qty)| *qty < LOW_STOCK_THRESHOLD)
            .map(|(bt, _)| bt)
            .collect()
    }
}

/// Admin bulk update: a partial mapping of new absolute counts.
///
/// Negative inputs clamp to zero; blood types not present are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryUpdate {
    entries: BTreeMap<BloodType, u32>,
}

impl InventoryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a requested count, clamping negatives and saturating at `u32::MAX`.
    pub fn set(&mut self, blood_type: BloodType, requested: i64) -> &mut Self {
        let clamped = u32::try_from(requested.max(0)).unwrap_or(u32::MAX);
        self.entries.insert(blood_type, clamped);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BloodType, u32)> + '_ {
        self.entries.iter().map(|(bt, qty)| (*bt, *qty))
    }
}

impl FromIterator<(BloodType, i64)> for InventoryUpdate {
    fn from_iter<T: IntoIterator<Item = (BloodType, i64)>>(iter: T) -> Self {
        let mut update = Self::new();
        for (bt, qty) in iter {
            update.set(bt, qty);
        }
        update
    }
}
