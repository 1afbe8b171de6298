//! Filter state and the control layer that mutates it.
//!
//! [`FilterState`] is a snapshot of every control selection for one panel
//! group. Only [`Controls`] mutates it; view controllers receive it by shared
//! reference, so a redraw can never feed back into the selection.

use std::sync::Arc;

use tracing::debug;

use dash_model::{DashError, Dataset, Result, Vocabulary, fields};

use crate::vocabulary::{extract, extract_dependent};

/// Slot names used by the built-in sections.
pub mod slots {
    pub const VARIABLE: &str = "variable";
    pub const PERCENTILE: &str = "percentile";
    pub const STATES: &str = "states";
    pub const YEAR: &str = "year";
    pub const OPTION_1: &str = "option_1";
    pub const OPTION_2: &str = "option_2";
    pub const PLOT_ALL: &str = "plot_all";
}

/// What a slot contributes to record filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    /// Part of the record predicate evaluated by the filter engine.
    Filter,
    /// Read by a specific panel (e.g. which category a comparison panel shows).
    Panel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Option<String>),
    Many(Vec<String>),
    Toggle(bool),
}

impl Selection {
    pub fn single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => value.as_deref(),
            _ => None,
        }
    }

    pub fn many(&self) -> &[String] {
        match self {
            Self::Many(values) => values,
            _ => &[],
        }
    }

    pub fn toggled(&self) -> bool {
        matches!(self, Self::Toggle(true))
    }
}

/// Declarative description of one control.
#[derive(Debug, Clone)]
pub struct SlotSpec {
    pub name: &'static str,
    pub field: Option<String>,
    pub role: SlotRole,
    pub initial: Selection,
    /// Slot whose value conditions this slot's vocabulary.
    pub depends_on: Option<&'static str>,
}

impl SlotSpec {
    /// Single-choice dropdown; starts on the first option.
    pub fn dropdown(name: &'static str, field: &str, role: SlotRole) -> Self {
        Self {
            name,
            field: Some(field.to_string()),
            role,
            initial: Selection::Single(None),
            depends_on: None,
        }
    }

    /// Multi-select list; starts empty.
    pub fn multi_select(name: &'static str, field: &str) -> Self {
        Self {
            name,
            field: Some(field.to_string()),
            role: SlotRole::Filter,
            initial: Selection::Many(Vec::new()),
            depends_on: None,
        }
    }

    pub fn checkbox(name: &'static str) -> Self {
        Self {
            name,
            field: None,
            role: SlotRole::Panel,
            initial: Selection::Toggle(false),
            depends_on: None,
        }
    }

    #[must_use]
    pub fn depends_on(mut self, primary: &'static str) -> Self {
        self.depends_on = Some(primary);
        self
    }

    #[must_use]
    pub fn initially(mut self, value: &str) -> Self {
        self.initial = Selection::Single(Some(value.to_string()));
        self
    }
}

/// Controls of the state indicator line chart: metric, dependent
/// percentile and the state multi-select.
pub fn indicator_slots() -> Vec<SlotSpec> {
    vec![
        SlotSpec::dropdown(slots::VARIABLE, fields::VARIABLE, SlotRole::Filter),
        SlotSpec::dropdown(slots::PERCENTILE, fields::PERCENTILE, SlotRole::Filter)
            .depends_on(slots::VARIABLE),
        SlotSpec::multi_select(slots::STATES, fields::COUNTRY),
    ]
}

/// Controls of a two-panel comparison: year radio group, one option
/// dropdown per panel and the plot-all checkbox.
pub fn comparison_slots(category_field: &str) -> Vec<SlotSpec> {
    vec![
        SlotSpec::dropdown(slots::YEAR, fields::CENSUS_YEAR, SlotRole::Filter),
        SlotSpec::dropdown(slots::OPTION_1, category_field, SlotRole::Panel),
        SlotSpec::dropdown(slots::OPTION_2, category_field, SlotRole::Panel),
        SlotSpec::checkbox(slots::PLOT_ALL),
    ]
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub name: &'static str,
    pub field: Option<String>,
    pub role: SlotRole,
    pub depends_on: Option<&'static str>,
    pub options: Vocabulary,
    pub selection: Selection,
}

impl Slot {
    /// True when the current selection lies inside the slot's vocabulary.
    pub fn is_current(&self) -> bool {
        match &self.selection {
            Selection::Single(Some(value)) => self.options.contains(value),
            Selection::Many(values) => values.iter().all(|v| self.options.contains(v)),
            Selection::Single(None) | Selection::Toggle(_) => true,
        }
    }
}

/// Snapshot of all selections for one panel group.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    slots: Vec<Slot>,
}

impl FilterState {
    #[cfg(test)]
    pub(crate) fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    fn slot_mut(&mut self, name: &str) -> Result<&mut Slot> {
        self.slots
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| DashError::InvalidSelection {
                slot: name.to_string(),
                value: "<unknown slot>".to_string(),
            })
    }

    pub fn single(&self, name: &str) -> Option<&str> {
        self.slot(name).and_then(|s| s.selection.single())
    }

    pub fn many(&self, name: &str) -> &[String] {
        self.slot(name).map_or(&[], |s| s.selection.many())
    }

    pub fn toggled(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|s| s.selection.toggled())
    }

    pub fn options(&self, name: &str) -> Option<&Vocabulary> {
        self.slot(name).map(|s| &s.options)
    }

    /// Sets a primary dropdown and re-derives every dependent vocabulary from
    /// `dataset`. A dependent selection no longer in its vocabulary falls back
    /// to the first option (or none). Returns true if anything changed.
    pub fn set_primary(&mut self, name: &str, value: &str, dataset: &Dataset) -> Result<bool> {
        let changed = self.set_single(name, value)?;
        let mut dependent_changed = false;
        for index in self.dependents_of(Some(name)) {
            dependent_changed |= self.refresh_dependent(index, dataset);
        }
        Ok(changed || dependent_changed)
    }

    /// Sets a dropdown that no other slot depends on.
    pub fn set_dependent(&mut self, name: &str, value: &str) -> Result<bool> {
        self.set_single(name, value)
    }

    /// Sets the year radio group.
    pub fn set_year(&mut self, name: &str, year: &str) -> Result<bool> {
        self.set_single(name, year)
    }

    pub fn set_multi_select(&mut self, name: &str, values: &[String]) -> Result<bool> {
        let slot = self.slot_mut(name)?;
        if let Some(stale) = values.iter().find(|v| !slot.options.contains(v)) {
            return Err(DashError::InvalidSelection {
                slot: name.to_string(),
                value: stale.clone(),
            });
        }
        let next = Selection::Many(values.to_vec());
        let changed = slot.selection != next;
        slot.selection = next;
        Ok(changed)
    }

    pub fn set_toggle(&mut self, name: &str, on: bool) -> Result<bool> {
        let slot = self.slot_mut(name)?;
        let next = Selection::Toggle(on);
        let changed = slot.selection != next;
        slot.selection = next;
        Ok(changed)
    }

    fn set_single(&mut self, name: &str, value: &str) -> Result<bool> {
        let slot = self.slot_mut(name)?;
        if !slot.options.contains(value) {
            return Err(DashError::InvalidSelection {
                slot: name.to_string(),
                value: value.to_string(),
            });
        }
        let next = Selection::Single(Some(value.to_string()));
        let changed = slot.selection != next;
        slot.selection = next;
        Ok(changed)
    }

    /// Indices of slots conditioned on `primary`, or of every dependent slot
    /// when `primary` is `None`.
    fn dependents_of(&self, primary: Option<&str>) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| match primary {
                Some(name) => s.depends_on == Some(name),
                None => s.depends_on.is_some(),
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Re-derives the vocabulary of the dependent slot at `index`.
    fn refresh_dependent(&mut self, index: usize, dataset: &Dataset) -> bool {
        let Some(primary) = self.slots[index].depends_on.and_then(|p| self.slot(p)) else {
            return false;
        };
        let primary_field = primary.field.clone().unwrap_or_default();
        let primary_value = primary.selection.single().map(str::to_string);

        let slot = &mut self.slots[index];
        let target_field = slot.field.clone().unwrap_or_default();
        slot.options = match &primary_value {
            Some(value) => {
                extract_dependent(&dataset.records, &primary_field, value, &target_field)
            }
            None => Vocabulary::new(),
        };
        if slot.is_current() && slot.selection.single().is_some() {
            return false;
        }
        let corrected = Selection::Single(slot.options.first().map(str::to_string));
        if let Selection::Single(Some(previous)) = &slot.selection {
            debug!(
                slot = slot.name,
                previous = %previous,
                replacement = ?corrected.single(),
                "dependent selection no longer valid, resetting"
            );
        }
        let changed = slot.selection != corrected;
        slot.selection = corrected;
        changed
    }
}

/// One user action on a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlChange {
    Select { slot: String, value: String },
    SelectMany { slot: String, values: Vec<String> },
    Toggle { slot: String, on: bool },
}

impl ControlChange {
    pub fn select(slot: &str, value: &str) -> Self {
        Self::Select {
            slot: slot.to_string(),
            value: value.to_string(),
        }
    }

    pub fn select_many<S: AsRef<str>>(slot: &str, values: &[S]) -> Self {
        Self::SelectMany {
            slot: slot.to_string(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn toggle(slot: &str, on: bool) -> Self {
        Self::Toggle {
            slot: slot.to_string(),
            on,
        }
    }
}

/// The UI-event layer for one dataset: owns the dataset and its
/// [`FilterState`], and turns control changes into state transitions.
#[derive(Debug, Clone)]
pub struct Controls {
    dataset: Arc<Dataset>,
    state: FilterState,
}

impl Controls {
    /// Builds option lists from `dataset` and applies initial selections.
    /// Dropdowns without an explicit initial value start on their first
    /// option, as a native select element does.
    pub fn new(dataset: Arc<Dataset>, specs: Vec<SlotSpec>) -> Self {
        let mut slots = Vec::with_capacity(specs.len());
        for spec in specs {
            let options = match (&spec.field, spec.depends_on) {
                (Some(field), None) => extract(&dataset.records, field),
                _ => Vocabulary::new(),
            };
            let selection = match spec.initial {
                Selection::Single(Some(value)) if options.contains(&value) => {
                    Selection::Single(Some(value))
                }
                Selection::Single(_) => Selection::Single(options.first().map(str::to_string)),
                other => other,
            };
            slots.push(Slot {
                name: spec.name,
                field: spec.field,
                role: spec.role,
                depends_on: spec.depends_on,
                options,
                selection,
            });
        }
        let mut state = FilterState { slots };
        for index in state.dependents_of(None) {
            state.refresh_dependent(index, &dataset);
        }
        Self { dataset, state }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    fn has_dependents(&self, name: &str) -> bool {
        self.state.slots.iter().any(|s| s.depends_on == Some(name))
    }

    /// Applies one user action. All slot changes caused by the action
    /// (including dependent resets) happen here, so the caller redraws once
    /// when this returns `Ok(true)`.
    pub fn apply(&mut self, change: &ControlChange) -> Result<bool> {
        match change {
            ControlChange::Select { slot, value } => {
                if self.has_dependents(slot) {
                    self.state.set_primary(slot, value, &self.dataset)
                } else if slot == slots::YEAR {
                    self.state.set_year(slot, value)
                } else {
                    self.state.set_dependent(slot, value)
                }
            }
            ControlChange::SelectMany { slot, values } => {
                self.state.set_multi_select(slot, values)
            }
            ControlChange::Toggle { slot, on } => self.state.set_toggle(slot, *on),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_model::{DatasetKind, Record};

    fn indicators(rows: &[(&str, &str)]) -> Arc<Dataset> {
        let records = rows
            .iter()
            .map(|(variable, percentile)| {
                Record::new()
                    .with_text(fields::COUNTRY, "A")
                    .with_text(fields::VARIABLE, *variable)
                    .with_text(fields::PERCENTILE, *percentile)
            })
            .collect();
        Arc::new(Dataset::new(DatasetKind::StateIndicators.schema(), records))
    }

    #[test]
    fn dependents_start_on_first_option() {
        let controls = Controls::new(
            indicators(&[("M1", "p1"), ("M1", "p2"), ("M2", "p3")]),
            indicator_slots(),
        );
        let state = controls.state();
        assert_eq!(state.single(slots::VARIABLE), Some("M1"));
        assert_eq!(state.single(slots::PERCENTILE), Some("p1"));
        assert_eq!(
            state.options(slots::PERCENTILE).map(Vocabulary::as_slice),
            Some(&["p1".to_string(), "p2".to_string()][..])
        );
    }

    #[test]
    fn primary_change_refreshes_only_its_dependents() {
        let data = indicators(&[("M1", "p1"), ("M1", "p2"), ("M2", "p2")]);
        let mut state = Controls::new(Arc::clone(&data), indicator_slots())
            .state()
            .clone();
        state
            .set_single(slots::PERCENTILE, "p2")
            .expect("percentile");

        assert_eq!(state.dependents_of(Some(slots::VARIABLE)), vec![1]);
        assert!(state.dependents_of(Some(slots::STATES)).is_empty());
        assert_eq!(state.dependents_of(None), vec![1]);

        // p2 survives the switch, so only the primary changed.
        assert!(
            state
                .set_primary(slots::VARIABLE, "M2", &data)
                .expect("variable")
        );
        assert_eq!(state.single(slots::PERCENTILE), Some("p2"));
        assert!(!state.refresh_dependent(1, &data));
        assert!(!state.refresh_dependent(0, &data));
    }
}
