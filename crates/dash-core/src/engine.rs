//! Record filtering and grouping.
//!
//! Every redraw recomputes the view from scratch in a single pass; datasets
//! are small enough that incremental filtering is not worth its state.

use std::collections::HashMap;

use dash_model::Record;

use crate::filter::{FilterState, Selection, SlotRole};

/// The records matching the current selections, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    pub fn all(records: &'a [Record]) -> Self {
        Self::new(records.iter().collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// Sub-view of records whose `field` equals `value`.
    pub fn where_eq(&self, field: &str, value: &str) -> FilteredView<'a> {
        Self::new(
            self.records
                .iter()
                .copied()
                .filter(|r| r.matches(field, value))
                .collect(),
        )
    }

    /// Partitions the view by `key_field`. Groups appear in first-seen order
    /// and each keeps its records in view order.
    pub fn group_by(&self, key_field: &str) -> Vec<Group<'a>> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group<'a>> = Vec::new();
        for record in self.records.iter().copied() {
            let Some(key) = record.label(key_field) else {
                continue;
            };
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    key,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].records.push(record);
        }
        groups
    }
}

/// One partition of a [`FilteredView`].
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: String,
    pub records: Vec<&'a Record>,
}

impl Group<'_> {
    /// `(x, y)` points ordered by `x_field` (stable for equal x). Records
    /// without a finite value on either axis are skipped.
    pub fn points(&self, x_field: &str, y_field: &str) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .records
            .iter()
            .filter_map(|r| Some((r.number(x_field)?, r.number(y_field)?)))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }
}

/// Evaluates the conjunction of every filter slot against `records`.
///
/// - single-value slots match by equality, an unset slot imposes nothing;
/// - multi-select slots match by membership, and an empty multi-select
///   yields an empty view ("no states selected" shows nothing);
/// - a slot holding a value outside its current vocabulary also yields an
///   empty view rather than matching unrelated records.
pub fn apply<'a>(records: &'a [Record], state: &FilterState) -> FilteredView<'a> {
    let mut predicates: Vec<(&str, &Selection)> = Vec::new();
    for slot in state.slots() {
        if slot.role != SlotRole::Filter {
            continue;
        }
        let Some(field) = slot.field.as_deref() else {
            continue;
        };
        if !slot.is_current() {
            return FilteredView::default();
        }
        match &slot.selection {
            Selection::Single(None) | Selection::Toggle(_) => {}
            Selection::Many(values) if values.is_empty() => return FilteredView::default(),
            selection => predicates.push((field, selection)),
        }
    }

    let records = records
        .iter()
        .filter(|record| {
            predicates.iter().all(|(field, selection)| match selection {
                Selection::Single(Some(value)) => record.matches(field, value),
                Selection::Many(values) => values.iter().any(|v| record.matches(field, v)),
                Selection::Single(None) | Selection::Toggle(_) => true,
            })
        })
        .collect();
    FilteredView::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Slot;
    use dash_model::Vocabulary;

    fn records() -> Vec<Record> {
        ["2021", "2022", "2022"]
            .into_iter()
            .map(|year| Record::new().with_text("year", year))
            .collect()
    }

    fn year_slot(options: &[&str], selection: Selection, role: SlotRole) -> Slot {
        Slot {
            name: "year",
            field: Some("year".to_string()),
            role,
            depends_on: None,
            options: options.iter().copied().collect::<Vocabulary>(),
            selection,
        }
    }

    #[test]
    fn current_single_selection_filters_by_equality() {
        let records = records();
        let state = FilterState::from_slots(vec![year_slot(
            &["2021", "2022"],
            Selection::Single(Some("2022".to_string())),
            SlotRole::Filter,
        )]);
        assert_eq!(apply(&records, &state).len(), 2);
    }

    #[test]
    fn stale_selection_yields_empty_view() {
        let records = records();
        // "2022" matches records but is no longer offered.
        let state = FilterState::from_slots(vec![year_slot(
            &["2021"],
            Selection::Single(Some("2022".to_string())),
            SlotRole::Filter,
        )]);
        assert!(!state.slots()[0].is_current());
        assert!(apply(&records, &state).is_empty());

        let state = FilterState::from_slots(vec![year_slot(
            &["2021"],
            Selection::Many(vec!["2021".to_string(), "2022".to_string()]),
            SlotRole::Filter,
        )]);
        assert!(apply(&records, &state).is_empty());
    }

    #[test]
    fn stale_panel_slot_does_not_filter() {
        let records = records();
        let state = FilterState::from_slots(vec![year_slot(
            &["2021"],
            Selection::Single(Some("2022".to_string())),
            SlotRole::Panel,
        )]);
        assert_eq!(apply(&records, &state).len(), 3);
    }
}
