//! Scale domains, coordinate scales and color palettes.
//!
//! Domains are computed only from the view being rendered, never from the
//! whole dataset, so different selections produce differently scaled axes.

use std::collections::HashMap;

use dash_model::{DashError, Record, Result};

use crate::vocabulary::extract;

/// A numeric `[min, max]` axis domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[0, max]`, the value-axis convention of every chart.
    #[must_use]
    pub fn from_zero(self) -> Self {
        Self {
            min: 0.0,
            max: self.max,
        }
    }

    pub fn span(self) -> f64 {
        self.max - self.min
    }
}

/// Min/max of the finite values of `field`. `NaN` sentinels and missing
/// cells are skipped; no plottable value at all is [`DashError::EmptyDomain`].
pub fn numeric_extent<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    field: &str,
) -> Result<Extent> {
    let mut extent: Option<Extent> = None;
    for value in records.into_iter().filter_map(|r| r.number(field)) {
        extent = Some(match extent {
            None => Extent::new(value, value),
            Some(e) => Extent::new(e.min.min(value), e.max.max(value)),
        });
    }
    extent.ok_or_else(|| DashError::empty_domain(field))
}

/// Distinct values of `field` in first-seen order within `records`.
pub fn categorical_domain<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    field: &str,
) -> Vec<String> {
    extract(records, field).as_slice().to_vec()
}

fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * 10f64.powf(power)
}

/// Linear mapping from a data extent to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: Extent,
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: Extent, range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain.span();
        let t = if span == 0.0 {
            0.5
        } else {
            (value - self.domain.min) / span
        };
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Extends the domain outward to round tick steps (roughly ten ticks).
    #[must_use]
    pub fn nice(mut self) -> Self {
        let (mut start, mut stop) = (self.domain.min, self.domain.max);
        if start.is_nan() || stop.is_nan() || stop <= start {
            return self;
        }
        let mut previous: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, 10.0);
            if !step.is_finite() || step <= 0.0 || previous == Some(step) {
                break;
            }
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
            previous = Some(step);
        }
        self.domain = Extent::new(start, stop);
        self
    }
}

/// Evenly spaced bands for categorical axes.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    pub domain: Vec<String>,
    pub range: (f64, f64),
    pub padding: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self {
            domain,
            range,
            padding: padding.clamp(0.0, 1.0),
        }
    }

    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        (self.range.1 - self.range.0) / (n - self.padding + self.padding * 2.0).max(1.0)
    }

    fn start(&self) -> f64 {
        let n = self.domain.len() as f64;
        let free = self.range.1 - self.range.0 - self.step() * (n - self.padding);
        self.range.0 + free * 0.5
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the band for `category`.
    pub fn position(&self, category: &str) -> Option<f64> {
        let idx = self.domain.iter().position(|c| c == category)?;
        Some(self.start() + self.step() * idx as f64)
    }
}

/// The ten-color categorical palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Ordinal color scale with sticky assignments: a key keeps the color it
/// was first given for the lifetime of the panel.
#[derive(Debug, Clone, Default)]
pub struct OrdinalColors {
    assigned: HashMap<String, usize>,
}

impl OrdinalColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&mut self, key: &str) -> &'static str {
        let next = self.assigned.len();
        let idx = *self.assigned.entry(key.to_string()).or_insert(next);
        CATEGORY10[idx % CATEGORY10.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_rounds_to_tick_steps() {
        let scale = LinearScale::new(Extent::new(0.0, 96_922.0), (250.0, 0.0)).nice();
        assert_eq!(scale.domain, Extent::new(0.0, 100_000.0));
        assert_eq!(scale.map(50_000.0), 125.0);
    }

    #[test]
    fn degenerate_domain_maps_to_middle() {
        let scale = LinearScale::new(Extent::new(5.0, 5.0), (0.0, 100.0));
        assert_eq!(scale.map(5.0), 50.0);
        assert_eq!(scale.nice().domain, Extent::new(5.0, 5.0));
    }

    #[test]
    fn bands_split_range_with_padding() {
        let bands = BandScale::new(
            vec!["a".to_string(), "b".to_string()],
            (0.0, 210.0),
            0.1,
        );
        // step = 210 / (2 - 0.1 + 0.2) = 100
        assert!((bands.bandwidth() - 90.0).abs() < 1e-9);
        assert!((bands.position("a").expect("a") - 10.0).abs() < 1e-9);
        assert!((bands.position("b").expect("b") - 110.0).abs() < 1e-9);
        assert_eq!(bands.position("c"), None);
    }

    #[test]
    fn colors_stick_to_keys() {
        let mut colors = OrdinalColors::new();
        assert_eq!(colors.color("Ohio"), CATEGORY10[0]);
        assert_eq!(colors.color("Utah"), CATEGORY10[1]);
        assert_eq!(colors.color("Ohio"), CATEGORY10[0]);
    }
}
