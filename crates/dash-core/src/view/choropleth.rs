use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use dash_ingest::{Feature, FeatureCollection};
use dash_model::{Dataset, HoverPayload, PanelKind, Record, fields};

use crate::filter::FilterState;
use crate::surface::{FeatureFill, LegendEntry, MapSurface};
use crate::view::{RedrawOutcome, ViewController};

/// Which choropleth a controller draws: the joined properties, the fill
/// stops and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoroplethStyle {
    Unemployment,
    Employment,
}

const UNEMPLOYMENT_STOPS: [(f64, [u8; 3]); 5] = [
    (2.0, [0xfe, 0xe5, 0xd9]),
    (3.0, [0xfc, 0xae, 0x91]),
    (4.0, [0xfb, 0x6a, 0x4a]),
    (5.0, [0xde, 0x2d, 0x26]),
    (6.0, [0xa5, 0x0f, 0x15]),
];

const EMPLOYMENT_STOPS: [(f64, [u8; 3]); 5] = [
    (0.0, [0xe0, 0xf7, 0xe4]),
    (2_000_000.0, [0xa8, 0xe6, 0xa1]),
    (5_000_000.0, [0x70, 0xd4, 0x61]),
    (10_000_000.0, [0x40, 0xb2, 0x2e]),
    (20_000_000.0, [0x14, 0x8f, 0x00]),
];

impl ChoroplethStyle {
    /// Feature property the fill color is interpolated on.
    pub fn value_property(self) -> &'static str {
        match self {
            Self::Unemployment => "unemployment2024",
            Self::Employment => "totalEmployment",
        }
    }

    /// `(feature property, dataset column)` pairs copied onto each feature.
    fn joined(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Unemployment => &[
                ("unemployment2024", fields::UNEMPLOYMENT_2024),
                ("unemployment2023", fields::UNEMPLOYMENT_2023),
            ],
            Self::Employment => &[
                ("totalEmployment", fields::TOTAL_EMPLOYMENT),
                ("netChange", fields::NET_CHANGE),
                ("percentChange", fields::PERCENT_CHANGE),
            ],
        }
    }

    pub fn stops(self) -> &'static [(f64, [u8; 3])] {
        match self {
            Self::Unemployment => &UNEMPLOYMENT_STOPS,
            Self::Employment => &EMPLOYMENT_STOPS,
        }
    }

    pub fn legend_title(self) -> &'static str {
        match self {
            Self::Unemployment => "Unemployment Rate (October 2024)",
            Self::Employment => "Total Employment (2024)",
        }
    }

    pub fn legend(self) -> Vec<LegendEntry> {
        let labels: [&str; 5] = match self {
            Self::Unemployment => [
                "2.0 - 3.2%",
                "3.3 - 3.9%",
                "4.0 - 4.6%",
                "4.7 - 5.2%",
                "5.3% and above",
            ],
            Self::Employment => ["0 - 2M", "2M - 5M", "5M - 10M", "10M - 20M", "20M and above"],
        };
        self.stops()
            .iter()
            .zip(labels)
            .map(|((_, rgb), label)| LegendEntry {
                color: hex(*rgb),
                label: label.to_string(),
            })
            .collect()
    }

    fn panel(self) -> PanelKind {
        match self {
            Self::Unemployment => PanelKind::UnemploymentMap,
            Self::Employment => PanelKind::EmploymentMap,
        }
    }
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Linear RGB interpolation over ascending `stops`, clamped to the first
/// and last color outside their range.
pub fn interpolate_color(value: f64, stops: &[(f64, [u8; 3])]) -> String {
    let Some(&(first_at, first_rgb)) = stops.first() else {
        return hex([0, 0, 0]);
    };
    if !value.is_finite() || value <= first_at {
        return hex(first_rgb);
    }
    for pair in stops.windows(2) {
        let ((lo, lo_rgb), (hi, hi_rgb)) = (pair[0], pair[1]);
        if value <= hi {
            let t = if hi > lo { (value - lo) / (hi - lo) } else { 1.0 };
            let mix = |a: u8, b: u8| (f64::from(a) + t * (f64::from(b) - f64::from(a))).round() as u8;
            return hex([
                mix(lo_rgb[0], hi_rgb[0]),
                mix(lo_rgb[1], hi_rgb[1]),
                mix(lo_rgb[2], hi_rgb[2]),
            ]);
        }
    }
    stops.last().map_or_else(|| hex(first_rgb), |&(_, rgb)| hex(rgb))
}

/// A state-level choropleth over a GeoJSON feature collection.
///
/// Dataset rows are joined onto features by state name once, at
/// construction. A state without a row, or with an unparseable value,
/// gets 0.
#[derive(Debug)]
pub struct ChoroplethController<M> {
    dataset: Arc<Dataset>,
    style: ChoroplethStyle,
    features: FeatureCollection,
    surface: M,
}

impl<M: MapSurface> ChoroplethController<M> {
    pub fn new(
        dataset: Arc<Dataset>,
        mut features: FeatureCollection,
        style: ChoroplethStyle,
        surface: M,
    ) -> Self {
        let mut by_state: HashMap<&str, &Record> = HashMap::new();
        for record in &dataset.records {
            if let Some(state) = record.text(fields::STATE) {
                by_state.insert(state, record);
            }
        }
        let mut unmatched = 0usize;
        for feature in &mut features.features {
            let row = feature.name().and_then(|name| by_state.get(name)).copied();
            if row.is_none() {
                unmatched += 1;
            }
            annotate(feature, row, style);
        }
        info!(
            panel = ?style.panel(),
            features = features.features.len(),
            rows = dataset.len(),
            unmatched,
            "choropleth joined"
        );
        Self {
            dataset,
            style,
            features,
            surface,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    /// Replaces the fill layer and legend.
    pub fn render(&mut self) -> RedrawOutcome {
        self.surface.clear();
        if self.features.features.is_empty() {
            return RedrawOutcome::Cleared;
        }
        let property = self.style.value_property();
        let stops = self.style.stops();
        let fills: Vec<FeatureFill> = self
            .features
            .features
            .iter()
            .map(|feature| {
                let value = feature.number(property).unwrap_or(0.0);
                FeatureFill {
                    name: feature.name().unwrap_or_default().to_string(),
                    value,
                    color: interpolate_color(value, stops),
                }
            })
            .collect();
        let count = fills.len();
        self.surface.set_fills(fills);
        self.surface
            .set_legend(self.style.legend_title(), self.style.legend());
        debug!(panel = ?self.style.panel(), features = count, "choropleth rendered");
        RedrawOutcome::Drawn { shapes: count }
    }

    /// Typed payload for the feature named `name`, as a pointer-move
    /// callback would receive it.
    pub fn hover(&self, name: &str) -> Option<HoverPayload> {
        let feature = self.features.feature(name)?;
        let get = |property: &str| feature.number(property).unwrap_or(0.0);
        Some(match self.style {
            ChoroplethStyle::Unemployment => HoverPayload::Unemployment {
                state: name.to_string(),
                rate_2024: get("unemployment2024"),
                rate_2023: get("unemployment2023"),
            },
            ChoroplethStyle::Employment => HoverPayload::Employment {
                state: name.to_string(),
                total: get("totalEmployment"),
                net_change: get("netChange"),
                percent_change: get("percentChange"),
            },
        })
    }
}

fn annotate(feature: &mut Feature, row: Option<&Record>, style: ChoroplethStyle) {
    for (property, column) in style.joined() {
        let value = row.and_then(|r| r.number(column)).unwrap_or(0.0);
        feature.set_number(property, value);
    }
}

impl<M: MapSurface> ViewController for ChoroplethController<M> {
    fn kind(&self) -> PanelKind {
        self.style.panel()
    }

    /// Maps have no controls; every state change re-renders the same layer.
    fn on_state_change(&mut self, _state: &FilterState) -> RedrawOutcome {
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingMapSurface;
    use dash_ingest::parse_feature_collection;
    use dash_model::DatasetKind;

    fn states() -> FeatureCollection {
        parse_feature_collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Ohio"},"geometry":null},
                {"type":"Feature","properties":{"name":"Utah"},"geometry":null}
            ]}"#,
        )
        .expect("geojson")
    }

    #[test]
    fn interpolates_between_stops() {
        assert_eq!(interpolate_color(1.0, &UNEMPLOYMENT_STOPS), "#fee5d9");
        assert_eq!(interpolate_color(4.0, &UNEMPLOYMENT_STOPS), "#fb6a4a");
        assert_eq!(interpolate_color(9.0, &UNEMPLOYMENT_STOPS), "#a50f15");
        // halfway between #fee5d9 and #fcae91
        assert_eq!(interpolate_color(2.5, &UNEMPLOYMENT_STOPS), "#fdcab5");
    }

    #[test]
    fn joins_rows_and_defaults_missing_states_to_zero() {
        let data = Arc::new(Dataset::new(
            DatasetKind::Unemployment.schema(),
            vec![
                Record::new()
                    .with_text(fields::STATE, "Ohio")
                    .with_number(fields::UNEMPLOYMENT_2024, 4.0)
                    .with_number(fields::UNEMPLOYMENT_2023, 3.6),
            ],
        ));
        let mut map = ChoroplethController::new(
            data,
            states(),
            ChoroplethStyle::Unemployment,
            RecordingMapSurface::new(),
        );
        assert_eq!(map.render(), RedrawOutcome::Drawn { shapes: 2 });

        let ohio = map.surface().fill("Ohio").expect("ohio");
        assert_eq!(ohio.color, "#fb6a4a");
        let utah = map.surface().fill("Utah").expect("utah");
        assert_eq!(utah.value, 0.0);
        assert_eq!(map.surface().legend.len(), 5);
        assert_eq!(map.surface().legend[4].label, "5.3% and above");

        assert_eq!(
            map.hover("Ohio"),
            Some(HoverPayload::Unemployment {
                state: "Ohio".to_string(),
                rate_2024: 4.0,
                rate_2023: 3.6,
            })
        );
        assert_eq!(map.hover("Nowhere"), None);
    }
}
