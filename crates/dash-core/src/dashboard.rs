//! The dashboard event loop.
//!
//! Elm-style: every input (a finished load, a control change, a timer
//! tick, a pointer hover) is a [`DashboardMessage`] handled synchronously
//! by [`Dashboard::update`]. Sections whose data has not loaded do not
//! have controls yet, so messages addressed to them are dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use dash_ingest::{DataSource, FeatureCollection, load_feature_collection};
use dash_model::{DashError, Dataset, DatasetKind, HoverPayload, Result};

use crate::animator::{AnimationConfig, Animator};
use crate::filter::{ControlChange, Controls, FilterState, comparison_slots, indicator_slots};
use crate::surface::{MapSurface, RecordingMapSurface, RecordingSurface, Surface};
use crate::timer::{TimerId, TimerQueue};
use crate::view::{
    ChoroplethController, ChoroplethStyle, ComparisonController, ComparisonStyle,
    LineChartController, ViewController,
};

/// The six dashboard sections, each fed by its own dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Indicators,
    Household,
    Age,
    Unemployment,
    Employment,
    Gsp,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        Self::Indicators,
        Self::Household,
        Self::Age,
        Self::Unemployment,
        Self::Employment,
        Self::Gsp,
    ];

    pub fn dataset_kind(self) -> DatasetKind {
        match self {
            Self::Indicators => DatasetKind::StateIndicators,
            Self::Household => DatasetKind::HouseholdIncome,
            Self::Age => DatasetKind::AgeIncome,
            Self::Unemployment => DatasetKind::Unemployment,
            Self::Employment => DatasetKind::Employment,
            Self::Gsp => DatasetKind::Gsp,
        }
    }

    pub fn needs_features(self) -> bool {
        matches!(self, Self::Unemployment | Self::Employment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Indicators => "indicators",
            Self::Household => "household",
            Self::Age => "age",
            Self::Unemployment => "unemployment",
            Self::Employment => "employment",
            Self::Gsp => "gsp",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a section needs before its controls can be wired.
#[derive(Debug, Clone)]
pub struct SectionData {
    pub dataset: Arc<Dataset>,
    pub features: Option<FeatureCollection>,
}

impl SectionData {
    /// Loads the dataset for `section` (and its GeoJSON for map sections).
    pub fn load(
        source: &dyn DataSource,
        section: SectionId,
        csv: &Path,
        geojson: Option<&Path>,
    ) -> Result<Self> {
        let dataset = source.load_kind(csv, section.dataset_kind())?;
        let features = match (section.needs_features(), geojson) {
            (true, Some(path)) => Some(load_feature_collection(path)?),
            (true, None) => {
                return Err(DashError::SchemaMismatch {
                    field: "geojson".to_string(),
                    detail: format!("section '{section}' needs a feature collection"),
                });
            }
            (false, _) => None,
        };
        Ok(Self { dataset, features })
    }
}

/// Pointer target inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    /// Shape `index` on chart panel `panel`.
    Shape { panel: usize, index: usize },
    /// Map feature by name.
    Feature(String),
}

#[derive(Debug, Clone)]
pub enum DashboardMessage {
    // =========================================================================
    // Loading
    // =========================================================================
    Loaded {
        section: SectionId,
        result: std::result::Result<SectionData, String>,
    },

    // =========================================================================
    // User input
    // =========================================================================
    Control {
        section: SectionId,
        change: ControlChange,
    },
    PlayPause,
    Hover {
        section: SectionId,
        target: Option<HoverTarget>,
    },

    // =========================================================================
    // Timers
    // =========================================================================
    Tick(TimerId),
}

/// A wired section: controls plus the controller drawing it.
#[derive(Debug)]
pub enum Section<S, M> {
    Indicators {
        controls: Controls,
        chart: LineChartController<S>,
    },
    Comparison {
        controls: Controls,
        chart: ComparisonController<S>,
    },
    Map {
        chart: ChoroplethController<M>,
    },
    Animation {
        animator: Animator<S>,
    },
}

impl<S: Surface, M: MapSurface> Section<S, M> {
    pub fn controls(&self) -> Option<&Controls> {
        match self {
            Self::Indicators { controls, .. } | Self::Comparison { controls, .. } => {
                Some(controls)
            }
            Self::Map { .. } | Self::Animation { .. } => None,
        }
    }

    /// Applies a control change and redraws once if anything changed.
    fn apply(&mut self, change: &ControlChange) -> Result<usize> {
        match self {
            Self::Indicators { controls, chart } => redraw_if_changed(controls, chart, change),
            Self::Comparison { controls, chart } => redraw_if_changed(controls, chart, change),
            Self::Map { .. } | Self::Animation { .. } => Ok(0),
        }
    }

    fn redraw(&mut self) {
        match self {
            Self::Indicators { controls, chart } => {
                chart.on_state_change(controls.state());
            }
            Self::Comparison { controls, chart } => {
                chart.on_state_change(controls.state());
            }
            Self::Map { chart } => {
                chart.on_state_change(&FilterState::default());
            }
            Self::Animation { animator } => {
                animator.render_full();
            }
        }
    }
}

fn redraw_if_changed(
    controls: &mut Controls,
    chart: &mut impl ViewController,
    change: &ControlChange,
) -> Result<usize> {
    if !controls.apply(change)? {
        return Ok(0);
    }
    chart.on_state_change(controls.state());
    Ok(1)
}

#[derive(Debug)]
pub enum SectionState<S, M> {
    Loading,
    Ready(Section<S, M>),
    /// Load failed; the section stays inert.
    Failed(String),
}

/// Readiness of one section without its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Failed(_) => f.write_str("failed"),
        }
    }
}

#[derive(Debug)]
pub struct Dashboard<S = RecordingSurface, M = RecordingMapSurface> {
    sections: BTreeMap<SectionId, SectionState<S, M>>,
    timers: TimerQueue,
    animation: AnimationConfig,
    hovered: Option<HoverPayload>,
}

impl<S: Surface + Default, M: MapSurface + Default> Dashboard<S, M> {
    pub fn new(animation: AnimationConfig) -> Self {
        Self {
            sections: SectionId::ALL
                .into_iter()
                .map(|id| (id, SectionState::Loading))
                .collect(),
            timers: TimerQueue::new(),
            animation,
            hovered: None,
        }
    }

    pub fn section(&self, id: SectionId) -> Option<&Section<S, M>> {
        match self.sections.get(&id) {
            Some(SectionState::Ready(section)) => Some(section),
            _ => None,
        }
    }

    pub fn status(&self, id: SectionId) -> SectionStatus {
        match self.sections.get(&id) {
            Some(SectionState::Ready(_)) => SectionStatus::Ready,
            Some(SectionState::Failed(reason)) => SectionStatus::Failed(reason.clone()),
            Some(SectionState::Loading) | None => SectionStatus::Loading,
        }
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn hovered(&self) -> Option<&HoverPayload> {
        self.hovered.as_ref()
    }

    /// Handles one message and returns the number of panel redraws it
    /// caused.
    pub fn update(&mut self, message: DashboardMessage) -> usize {
        match message {
            DashboardMessage::Loaded { section, result } => self.on_loaded(section, result),
            DashboardMessage::Control { section, change } => {
                let Some(SectionState::Ready(ready)) = self.sections.get_mut(&section) else {
                    debug!(%section, ?change, "section not ready, control change ignored");
                    return 0;
                };
                match ready.apply(&change) {
                    Ok(redraws) => redraws,
                    Err(err) => {
                        warn!(%section, error = %err, "control change rejected");
                        0
                    }
                }
            }
            DashboardMessage::PlayPause => {
                let Some(SectionState::Ready(Section::Animation { animator })) =
                    self.sections.get_mut(&SectionId::Gsp)
                else {
                    debug!("animation not ready, play/pause ignored");
                    return 0;
                };
                let label = animator.toggle(&mut self.timers);
                debug!(label, "play/pause");
                0
            }
            DashboardMessage::Hover { section, target } => {
                self.hovered = target.and_then(|t| self.resolve_hover(section, &t));
                0
            }
            DashboardMessage::Tick(id) => {
                let Some(SectionState::Ready(Section::Animation { animator })) =
                    self.sections.get_mut(&SectionId::Gsp)
                else {
                    self.timers.cancel(id);
                    return 0;
                };
                usize::from(animator.on_tick(id, &mut self.timers).is_some())
            }
        }
    }

    /// Advances the clock by `by`, dispatching every due tick as a message.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let until = self.timers.now() + by;
        let mut redraws = 0;
        while let Some(id) = self.timers.pop_due(until) {
            redraws += self.update(DashboardMessage::Tick(id));
        }
        self.timers.settle(until);
        redraws
    }

    fn on_loaded(
        &mut self,
        id: SectionId,
        result: std::result::Result<SectionData, String>,
    ) -> usize {
        if let Some(SectionState::Ready(Section::Animation { animator })) =
            self.sections.get_mut(&id)
        {
            animator.stop(&mut self.timers);
        }
        match result.and_then(|data| self.build(id, data)) {
            Ok(mut section) => {
                section.redraw();
                info!(%id, "section ready");
                self.sections.insert(id, SectionState::Ready(section));
                1
            }
            Err(reason) => {
                error!(%id, %reason, "section failed to load");
                self.sections.insert(id, SectionState::Failed(reason));
                0
            }
        }
    }

    fn build(
        &self,
        id: SectionId,
        data: SectionData,
    ) -> std::result::Result<Section<S, M>, String> {
        let SectionData { dataset, features } = data;
        let section = match id {
            SectionId::Indicators => Section::Indicators {
                controls: Controls::new(Arc::clone(&dataset), indicator_slots()),
                chart: LineChartController::new(dataset, S::default()),
            },
            SectionId::Household | SectionId::Age => {
                let style = if id == SectionId::Household {
                    ComparisonStyle::Household
                } else {
                    ComparisonStyle::Age
                };
                Section::Comparison {
                    controls: Controls::new(
                        Arc::clone(&dataset),
                        comparison_slots(style.category_field()),
                    ),
                    chart: ComparisonController::new(
                        dataset,
                        style,
                        [S::default(), S::default()],
                    ),
                }
            }
            SectionId::Unemployment | SectionId::Employment => {
                let style = if id == SectionId::Unemployment {
                    ChoroplethStyle::Unemployment
                } else {
                    ChoroplethStyle::Employment
                };
                let features =
                    features.ok_or_else(|| format!("section '{id}' has no feature collection"))?;
                Section::Map {
                    chart: ChoroplethController::new(dataset, features, style, M::default()),
                }
            }
            SectionId::Gsp => Section::Animation {
                animator: Animator::new(dataset, S::default(), self.animation),
            },
        };
        Ok(section)
    }

    fn resolve_hover(&self, id: SectionId, target: &HoverTarget) -> Option<HoverPayload> {
        let section = self.section(id)?;
        match (section, target) {
            (Section::Map { chart }, HoverTarget::Feature(name)) => chart.hover(name),
            (Section::Indicators { chart, .. }, HoverTarget::Shape { index, .. }) => {
                chart.surface().hover_at(*index).cloned()
            }
            (Section::Comparison { chart, .. }, HoverTarget::Shape { panel, index }) => {
                chart.panel(*panel)?.hover_at(*index).cloned()
            }
            (Section::Animation { animator }, HoverTarget::Shape { index, .. }) => {
                animator.surface().hover_at(*index).cloned()
            }
            _ => None,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}
