use std::sync::Arc;

use tracing::debug;

use dash_model::{Dataset, HoverPayload, PanelKind, fields};

use crate::engine::{self, FilteredView};
use crate::filter::{FilterState, slots};
use crate::scale::{BandScale, CATEGORY10, LinearScale, categorical_domain, numeric_extent};
use crate::surface::{AxisShape, AxisSide, BarShape, LabelShape, Shape, Surface};
use crate::view::{Geometry, RedrawOutcome, ViewController};

const BAND_PADDING: f64 = 0.1;
const LEFT_MARGIN: f64 = 60.0;
const Y_AXIS_LABEL: &str = "Median Income (Dollars)";

/// Which comparison section a controller draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStyle {
    Household,
    Age,
}

impl ComparisonStyle {
    pub fn category_field(self) -> &'static str {
        match self {
            Self::Household => fields::HOUSEHOLD_TYPE,
            Self::Age => fields::AGE_GROUP,
        }
    }

    fn all_title(self) -> &'static str {
        match self {
            Self::Household => "All Categories",
            Self::Age => "All Age Categories",
        }
    }

    fn panel(self) -> PanelKind {
        match self {
            Self::Household => PanelKind::HouseholdBars,
            Self::Age => PanelKind::AgeBars,
        }
    }

    fn hover(self, category: &str, income: f64) -> HoverPayload {
        match self {
            Self::Household => HoverPayload::HouseholdBar {
                household_type: category.to_string(),
                income,
            },
            Self::Age => HoverPayload::AgeBar {
                age_group: category.to_string(),
                income,
            },
        }
    }
}

/// Two side-by-side bar panels filtered by year.
///
/// In plot-all mode the first panel shows every category and the second
/// stays empty; otherwise each panel shows the category chosen by its
/// option dropdown. Both panels are cleared on every redraw so switching
/// modes never leaves bars from the other mode behind.
#[derive(Debug)]
pub struct ComparisonController<S> {
    dataset: Arc<Dataset>,
    style: ComparisonStyle,
    panels: [S; 2],
    geometry: Geometry,
}

impl<S: Surface> ComparisonController<S> {
    pub fn new(dataset: Arc<Dataset>, style: ComparisonStyle, panels: [S; 2]) -> Self {
        Self {
            dataset,
            style,
            panels,
            geometry: Geometry::COMPARISON_BARS,
        }
    }

    pub fn panel(&self, index: usize) -> Option<&S> {
        self.panels.get(index)
    }

    fn draw_bars(&mut self, index: usize, view: &FilteredView<'_>, title: &str) -> usize {
        let category_field = self.style.category_field();
        let Ok(extent) = numeric_extent(view.iter(), fields::MEDIAN_INCOME) else {
            return 0;
        };
        let (width, height) = (self.geometry.width, self.geometry.height);
        let x = BandScale::new(
            categorical_domain(view.iter(), category_field),
            (0.0, width),
            BAND_PADDING,
        );
        let y = LinearScale::new(extent.from_zero(), (height, 0.0)).nice();

        let mut shapes = vec![
            Shape::Axis(AxisShape::Linear {
                side: AxisSide::Left,
                scale: y,
            }),
            Shape::Label(LabelShape {
                text: Y_AXIS_LABEL.to_string(),
                x: -height / 2.0,
                y: -LEFT_MARGIN + 15.0,
            }),
        ];
        for (i, record) in view.iter().enumerate() {
            let (Some(category), Some(income)) = (
                record.label(category_field),
                record.number(fields::MEDIAN_INCOME),
            ) else {
                continue;
            };
            let Some(left) = x.position(&category) else {
                continue;
            };
            let top = y.map(income);
            shapes.push(Shape::Bar(BarShape {
                x: left,
                y: top,
                width: x.bandwidth(),
                height: height - top,
                color: CATEGORY10[i % CATEGORY10.len()].to_string(),
                hover: self.style.hover(&category, income),
                category,
            }));
        }
        shapes.push(Shape::Label(LabelShape {
            text: title.to_string(),
            x: width / 2.0,
            y: -10.0,
        }));

        let count = shapes.len();
        let panel = &mut self.panels[index];
        for shape in shapes {
            panel.add(shape);
        }
        count
    }
}

impl<S: Surface> ViewController for ComparisonController<S> {
    fn kind(&self) -> PanelKind {
        self.style.panel()
    }

    fn on_state_change(&mut self, state: &FilterState) -> RedrawOutcome {
        let dataset = Arc::clone(&self.dataset);
        let view = engine::apply(&dataset.records, state);
        for panel in &mut self.panels {
            panel.clear();
        }

        let drawn = if state.toggled(slots::PLOT_ALL) {
            let title = self.style.all_title();
            self.draw_bars(0, &view, title)
        } else {
            let field = self.style.category_field();
            let mut drawn = 0;
            for (index, slot) in [slots::OPTION_1, slots::OPTION_2].into_iter().enumerate() {
                let Some(option) = state.single(slot) else {
                    continue;
                };
                let subset = view.where_eq(field, option);
                drawn += self.draw_bars(index, &subset, option);
            }
            drawn
        };
        for panel in &mut self.panels {
            panel.present();
        }

        debug!(
            panel = ?self.style.panel(),
            plot_all = state.toggled(slots::PLOT_ALL),
            records = view.len(),
            shapes = drawn,
            "comparison redrawn"
        );
        if drawn == 0 {
            RedrawOutcome::Cleared
        } else {
            RedrawOutcome::Drawn { shapes: drawn }
        }
    }
}
