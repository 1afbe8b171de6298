use std::sync::Arc;

use tracing::debug;

use dash_model::{Dataset, PanelKind, fields};

use crate::engine;
use crate::filter::FilterState;
use crate::scale::{LinearScale, OrdinalColors, numeric_extent};
use crate::surface::{AxisShape, AxisSide, SeriesShape, Shape, Surface};
use crate::view::{Geometry, RedrawOutcome, ViewController};

/// Scales used by the most recent successful draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub x: LinearScale,
    pub y: LinearScale,
}

/// Multi-series line chart of the state indicators: one line per state,
/// x = year, y = value from zero.
#[derive(Debug)]
pub struct LineChartController<S> {
    dataset: Arc<Dataset>,
    surface: S,
    colors: OrdinalColors,
    geometry: Geometry,
    scales: Option<ChartScales>,
}

impl<S: Surface> LineChartController<S> {
    pub fn new(dataset: Arc<Dataset>, surface: S) -> Self {
        Self {
            dataset,
            surface,
            colors: OrdinalColors::new(),
            geometry: Geometry::INDICATOR_LINES,
            scales: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scales(&self) -> Option<ChartScales> {
        self.scales
    }

    fn clear(&mut self) -> RedrawOutcome {
        self.surface.clear();
        self.surface.present();
        self.scales = None;
        RedrawOutcome::Cleared
    }
}

impl<S: Surface> ViewController for LineChartController<S> {
    fn kind(&self) -> PanelKind {
        PanelKind::IndicatorLines
    }

    fn on_state_change(&mut self, state: &FilterState) -> RedrawOutcome {
        let dataset = Arc::clone(&self.dataset);
        let view = engine::apply(&dataset.records, state);
        let (Ok(x_extent), Ok(y_extent)) = (
            numeric_extent(view.iter(), fields::YEAR),
            numeric_extent(view.iter(), fields::VALUE),
        ) else {
            debug!(records = view.len(), "indicator chart has nothing to plot");
            return self.clear();
        };

        let x = LinearScale::new(x_extent, (0.0, self.geometry.width));
        let y = LinearScale::new(y_extent.from_zero(), (self.geometry.height, 0.0));

        self.surface.clear();
        self.surface.add(Shape::Axis(AxisShape::Linear {
            side: AxisSide::Bottom,
            scale: x,
        }));
        self.surface.add(Shape::Axis(AxisShape::Linear {
            side: AxisSide::Left,
            scale: y,
        }));
        let groups = view.group_by(fields::COUNTRY);
        for group in &groups {
            let color = self.colors.color(&group.key);
            let points = group.points(fields::YEAR, fields::VALUE);
            self.surface.add(Shape::Series(SeriesShape::new(
                &group.key, color, points, &x, &y,
            )));
        }
        self.surface.present();
        self.scales = Some(ChartScales { x, y });

        debug!(
            records = view.len(),
            groups = groups.len(),
            "indicator chart redrawn"
        );
        RedrawOutcome::Drawn {
            shapes: groups.len() + 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ControlChange, Controls, indicator_slots, slots};
    use crate::scale::Extent;
    use crate::surface::{RecordingSurface, ShapeTag};
    use dash_model::{DatasetKind, Record};

    fn row(country: &str, year: f64, value: f64) -> Record {
        Record::new()
            .with_text(fields::COUNTRY, country)
            .with_text(fields::VARIABLE, "gdp")
            .with_text(fields::PERCENTILE, "p50")
            .with_number(fields::YEAR, year)
            .with_number(fields::VALUE, value)
    }

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::new(
            DatasetKind::StateIndicators.schema(),
            vec![
                row("A", 2001.0, 12.0),
                row("B", 2000.0, 4.0),
                row("A", 2000.0, 10.0),
            ],
        ))
    }

    #[test]
    fn colors_survive_selection_changes() {
        let data = dataset();
        let mut controls = Controls::new(Arc::clone(&data), indicator_slots());
        let mut chart = LineChartController::new(data, RecordingSurface::new());

        controls
            .apply(&ControlChange::select_many(slots::STATES, &["A", "B"]))
            .expect("states");
        chart.on_state_change(controls.state());
        let color_b = chart
            .surface()
            .series()
            .find(|s| s.key == "B")
            .map(|s| s.color.clone());

        controls
            .apply(&ControlChange::select_many(slots::STATES, &["B"]))
            .expect("states");
        chart.on_state_change(controls.state());
        let series: Vec<_> = chart.surface().series().collect();
        assert_eq!(series.len(), 1);
        assert_eq!(Some(series[0].color.clone()), color_b);
    }

    #[test]
    fn series_points_are_ordered_by_year() {
        let data = dataset();
        let mut controls = Controls::new(Arc::clone(&data), indicator_slots());
        controls
            .apply(&ControlChange::select_many(slots::STATES, &["A"]))
            .expect("states");
        let mut chart = LineChartController::new(data, RecordingSurface::new());
        let outcome = chart.on_state_change(controls.state());

        assert_eq!(outcome, RedrawOutcome::Drawn { shapes: 3 });
        let series = chart.surface().series().next().expect("series");
        assert_eq!(series.points, vec![(2000.0, 10.0), (2001.0, 12.0)]);
        let scales = chart.scales().expect("scales");
        assert_eq!(scales.x.domain, Extent::new(2000.0, 2001.0));
        assert_eq!(scales.y.domain, Extent::new(0.0, 12.0));
    }

    #[test]
    fn clearing_an_empty_panel_is_a_noop() {
        let data = dataset();
        let controls = Controls::new(Arc::clone(&data), indicator_slots());
        let mut chart = LineChartController::new(data, RecordingSurface::new());
        assert_eq!(chart.on_state_change(controls.state()), RedrawOutcome::Cleared);
        assert_eq!(chart.on_state_change(controls.state()), RedrawOutcome::Cleared);
        assert_eq!(chart.surface().count(ShapeTag::Series), 0);
        assert!(chart.scales().is_none());
    }
}
