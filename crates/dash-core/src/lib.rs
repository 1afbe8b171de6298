//! Linked multi-view filter-and-render engine.
//!
//! Data flows one way: a loaded [`dash_model::Dataset`] feeds control
//! vocabularies, user actions mutate a [`FilterState`] through
//! [`Controls`], and each [`ViewController`] re-derives its panel from the
//! state (filter, scale, clear-then-draw). The [`Animator`] is driven by
//! timer ticks instead of controls. [`Dashboard`] wires all sections into
//! one message-driven loop.

pub mod animator;
pub mod dashboard;
pub mod engine;
pub mod filter;
pub mod scale;
pub mod surface;
pub mod timer;
pub mod view;
pub mod vocabulary;

pub use animator::{AnimationConfig, Animator, PlaybackState};
pub use dashboard::{
    Dashboard, DashboardMessage, HoverTarget, Section, SectionData, SectionId, SectionState,
    SectionStatus,
};
pub use engine::{FilteredView, Group};
pub use filter::{
    ControlChange, Controls, FilterState, Selection, Slot, SlotRole, SlotSpec, comparison_slots,
    indicator_slots, slots,
};
pub use scale::{BandScale, CATEGORY10, Extent, LinearScale, OrdinalColors};
pub use surface::{
    MapSurface, RecordingMapSurface, RecordingSurface, Shape, ShapeTag, Surface,
};
pub use timer::{TimerId, TimerQueue};
pub use view::{
    ChoroplethController, ChoroplethStyle, ComparisonController, ComparisonStyle, Geometry,
    LineChartController, RedrawOutcome, ViewController,
};
