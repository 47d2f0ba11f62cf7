//! Merging calendar documents into one availability grid.
//!
//! Ordering convention: the result lists `a`'s cells in their original order
//! followed by the cells only `b` has, in `b`'s order. Within a merged cell
//! `a`'s occupants come first. Occupants are never deduplicated: each source
//! document is an independent calendar, so a person registered twice counts
//! twice.

use std::collections::HashMap;

use crate::cell::Cell;
use crate::document::CalendarDocument;

/// Accumulates documents with an id-keyed index, O(cells) per document.
#[derive(Debug, Default)]
struct Combiner {
    cells: Vec<Cell>,
    index: HashMap<String, usize>,
}

impl Combiner {
    fn seeded(doc: &CalendarDocument) -> Self {
        let mut combiner = Combiner {
            cells: Vec::with_capacity(doc.len()),
            index: HashMap::with_capacity(doc.len()),
        };
        combiner.absorb(doc);
        combiner
    }

    fn absorb(&mut self, doc: &CalendarDocument) {
        for cell in doc.cells() {
            match self.index.get(&cell.id) {
                Some(&pos) => {
                    let merged = &mut self.cells[pos];
                    merged.users.extend(cell.users.iter().cloned());
                    merged.num_people = merged.users.len();
                }
                None => {
                    self.index.insert(cell.id.clone(), self.cells.len());
                    self.cells.push(cell.clone());
                }
            }
        }
    }

    fn finish(self) -> CalendarDocument {
        CalendarDocument::from_unique_cells(self.cells)
    }
}

/// Combine two documents. `{cells: []}` is the identity on either side.
pub fn combine(a: &CalendarDocument, b: &CalendarDocument) -> CalendarDocument {
    let mut combiner = Combiner::seeded(a);
    combiner.absorb(b);
    combiner.finish()
}

/// Left fold of [`combine`] over `docs`, seeded with the empty document.
///
/// Equivalent to repeated pairwise combination but keeps one index for the
/// whole fold instead of rebuilding it per step.
pub fn combine_all<'a, I>(docs: I) -> CalendarDocument
where
    I: IntoIterator<Item = &'a CalendarDocument>,
{
    let mut combiner = Combiner::default();
    for doc in docs {
        combiner.absorb(doc);
    }
    combiner.finish()
}
