//! Interactive 2-4 way comparator.
//!
//! [`ComparatorSession`] is the per-client slot state; [`compare_set`] is the
//! pure computation it delegates to on every change.

use crate::core::catalog::Catalog;
use crate::core::categories::{self, CategoryResult, CategorySet, WinCount};
use crate::core::extract::NormalizationTables;
use crate::models::Offering;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SLOTS: usize = 2;
pub const MAX_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unknown offering: {0}")]
    UnknownEntity(String),

    #[error("A comparison needs 2-4 slots, got {0}")]
    SlotCount(usize),
}

/// Full N-way result for a valid selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NwayResult {
    /// Compared offerings in slot order
    pub offering_ids: Vec<String>,
    pub rows: Vec<CategoryResult>,
    /// Win counts in catalog order
    pub win_counts: Vec<WinCount>,
    pub best_choice: String,
}

impl NwayResult {
    pub fn wins_of(&self, offering_id: &str) -> usize {
        self.win_counts
            .iter()
            .find(|w| w.offering_id == offering_id)
            .map(|w| w.wins)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NwayOutcome {
    /// Fewer than two offerings selected; nothing is computed
    InsufficientSelection { selected: usize },
    Ranked(NwayResult),
}

impl NwayOutcome {
    pub fn result(&self) -> Option<&NwayResult> {
        match self {
            NwayOutcome::Ranked(result) => Some(result),
            NwayOutcome::InsufficientSelection { .. } => None,
        }
    }
}

/// Compare a set of offerings across every category
///
/// Duplicates are ignored after their first occurrence. The best choice is
/// the offering with the most outright wins; equal counts go to whichever
/// comes first in catalog order.
pub fn compare_set(
    set: &CategorySet,
    tables: &NormalizationTables,
    catalog: &Catalog,
    offerings: &[&Offering],
) -> NwayOutcome {
    let mut unique: Vec<&Offering> = Vec::with_capacity(offerings.len());
    for &offering in offerings {
        if !unique.iter().any(|o| o.id == offering.id) {
            unique.push(offering);
        }
    }

    if unique.len() < MIN_SLOTS {
        return NwayOutcome::InsufficientSelection {
            selected: unique.len(),
        };
    }

    let rows: Vec<CategoryResult> = set
        .iter()
        .map(|category| categories::evaluate(category, &unique, tables))
        .collect();

    let mut in_catalog_order: Vec<&str> = unique.iter().map(|o| o.id.as_str()).collect();
    in_catalog_order.sort_by_key(|id| catalog.position(id).unwrap_or(usize::MAX));

    let win_counts = categories::tally(&rows, &in_catalog_order);

    // Strict `>` keeps the first maximum, i.e. the earliest in catalog order
    let mut best = &win_counts[0];
    for count in &win_counts[1..] {
        if count.wins > best.wins {
            best = count;
        }
    }
    let best_choice = best.offering_id.clone();

    NwayOutcome::Ranked(NwayResult {
        offering_ids: unique.iter().map(|o| o.id.clone()).collect(),
        rows,
        win_counts,
        best_choice,
    })
}

/// Slot state of one comparator widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparatorSession {
    slots: Vec<Option<String>>,
}

impl Default for ComparatorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparatorSession {
    /// Two empty slots
    pub fn new() -> Self {
        Self {
            slots: vec![None; MIN_SLOTS],
        }
    }

    /// Build a session from submitted slots. A repeated offering is
    /// dropped from the later slot, matching what the selector would offer.
    pub fn from_slots(slots: &[Option<String>], catalog: &Catalog) -> Result<Self, SelectionError> {
        if !(MIN_SLOTS..=MAX_SLOTS).contains(&slots.len()) {
            return Err(SelectionError::SlotCount(slots.len()));
        }

        let mut session = Self {
            slots: vec![None; slots.len()],
        };
        for (idx, slot) in slots.iter().enumerate() {
            if let Some(id) = slot {
                if catalog.get(id).is_none() {
                    return Err(SelectionError::UnknownEntity(id.clone()));
                }
                session.select(idx, id, catalog);
            }
        }
        Ok(session)
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.slots.iter().flatten().map(String::as_str).collect()
    }

    pub fn can_add(&self) -> bool {
        self.slots.len() < MAX_SLOTS
    }

    pub fn can_remove(&self) -> bool {
        self.slots.len() > MIN_SLOTS
    }

    /// Append an empty slot
    pub fn add(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        self.slots.push(None);
        true
    }

    /// Drop a slot entirely
    pub fn remove(&mut self, slot: usize) -> bool {
        if !self.can_remove() || slot >= self.slots.len() {
            return false;
        }
        self.slots.remove(slot);
        true
    }

    /// Offerings that may be placed in `slot`: the whole catalog minus
    /// whatever the other slots hold, in catalog order
    pub fn available_for<'c>(&self, slot: usize, catalog: &'c Catalog) -> Vec<&'c Offering> {
        catalog
            .iter()
            .filter(|o| {
                !self
                    .slots
                    .iter()
                    .enumerate()
                    .any(|(idx, s)| idx != slot && s.as_deref() == Some(o.id.as_str()))
            })
            .collect()
    }

    /// Assign an offering to a slot. Only offerings from `available_for`
    /// are accepted; anything else leaves the session untouched.
    pub fn select(&mut self, slot: usize, offering_id: &str, catalog: &Catalog) -> bool {
        if slot >= self.slots.len() {
            return false;
        }
        let allowed = self
            .available_for(slot, catalog)
            .iter()
            .any(|o| o.id == offering_id);
        if !allowed {
            return false;
        }
        self.slots[slot] = Some(offering_id.to_string());
        true
    }

    pub fn clear(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(s) => {
                *s = None;
                true
            }
            None => false,
        }
    }

    /// Recompute the comparison for the current selection
    pub fn evaluate(
        &self,
        set: &CategorySet,
        tables: &NormalizationTables,
        catalog: &Catalog,
    ) -> NwayOutcome {
        let offerings: Vec<&Offering> = self
            .selected_ids()
            .into_iter()
            .filter_map(|id| catalog.get(id))
            .collect();
        compare_set(set, tables, catalog, &offerings)
    }
}
