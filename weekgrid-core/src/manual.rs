//! Manual busy-slot selection.

use std::collections::BTreeSet;

use crate::error::GridResult;
use crate::grid::{SlotGrid, SlotId};

/// Slots a person has clicked as busy while entering a calendar by hand.
#[derive(Debug, Clone, Default)]
pub struct ManualSelection {
    grid: SlotGrid,
    selected: BTreeSet<SlotId>,
}

impl ManualSelection {
    pub fn new(grid: SlotGrid) -> Self {
        ManualSelection {
            grid,
            selected: BTreeSet::new(),
        }
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Flip a slot between selected and unselected.
    /// Returns whether the slot is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> GridResult<bool> {
        let slot = self.grid.parse_id(id)?;
        if self.selected.remove(&slot) {
            Ok(false)
        } else {
            self.selected.insert(slot);
            Ok(true)
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.grid
            .parse_id(id)
            .is_ok_and(|slot| self.selected.contains(&slot))
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in grid order (day, then slot).
    pub fn ids(&self) -> impl Iterator<Item = String> + '_ {
        self.selected.iter().map(SlotId::to_string)
    }

    /// Hand over the selected ids and start a fresh selection.
    pub fn take(&mut self) -> Vec<String> {
        let ids = self.ids().collect();
        self.selected.clear();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn test_toggle_selects_then_unselects() {
        let mut selection = ManualSelection::default();

        assert!(selection.toggle("B3").unwrap());
        assert!(selection.is_selected("B3"));
        assert!(!selection.toggle("B3").unwrap());
        assert!(!selection.is_selected("B3"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_ids_are_in_grid_order() {
        let mut selection = ManualSelection::default();
        for id in ["C1", "A10", "A2"] {
            selection.toggle(id).unwrap();
        }

        assert_eq!(selection.ids().collect::<Vec<_>>(), ["A2", "A10", "C1"]);
    }

    #[test]
    fn test_toggle_rejects_unknown_slot() {
        let mut selection = ManualSelection::new(SlotGrid::new(60, 9, 17).unwrap());
        assert!(matches!(selection.toggle("A9"), Err(GridError::Schema(_))));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_take_drains_selection() {
        let mut selection = ManualSelection::default();
        selection.toggle("A1").unwrap();
        selection.toggle("D4").unwrap();

        assert_eq!(selection.take(), ["A1", "D4"]);
        assert_eq!(selection.len(), 0);
    }
}
