//! Per-panel view controllers.
//!
//! Each controller owns its dataset handle, its surface and whatever
//! encoding state must survive redraws (color assignments, last scales).
//! Controllers read a [`FilterState`] and never mutate it.

mod choropleth;
mod comparison;
mod line_chart;

pub use choropleth::{ChoroplethController, ChoroplethStyle, interpolate_color};
pub use comparison::{ComparisonController, ComparisonStyle};
pub use line_chart::{ChartScales, LineChartController};

use dash_model::PanelKind;

use crate::filter::FilterState;

/// Inner plotting area of a chart panel, margins excluded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub const INDICATOR_LINES: Geometry = Geometry::new(890.0, 430.0);
    pub const COMPARISON_BARS: Geometry = Geometry::new(310.0, 250.0);
    pub const GSP_LINES: Geometry = Geometry::new(1000.0, 500.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Result of one `on_state_change` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOutcome {
    Drawn { shapes: usize },
    /// Nothing to plot; the panel was left empty.
    Cleared,
}

impl RedrawOutcome {
    pub fn shapes(self) -> usize {
        match self {
            Self::Drawn { shapes } => shapes,
            Self::Cleared => 0,
        }
    }
}

pub trait ViewController {
    fn kind(&self) -> PanelKind;

    /// Re-derives the panel from `state`: filter, resolve scales, then
    /// clear-then-draw. Calling it twice with the same state leaves the
    /// same shapes on the surface as calling it once.
    fn on_state_change(&mut self, state: &FilterState) -> RedrawOutcome;
}
