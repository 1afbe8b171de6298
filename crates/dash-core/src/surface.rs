//! Renderer collaborators.
//!
//! Controllers never paint. They hand fully resolved shapes to a
//! [`Surface`] (charts) or [`MapSurface`] (choropleths); the shapes carry
//! their own hover payloads so pointer lookup needs no rendering logic.

use dash_model::{HoverPayload, format_numeric};

use crate::scale::LinearScale;

/// Group tag used by `remove` to drop every shape of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeTag {
    Axis,
    Series,
    Bar,
    Label,
}

impl ShapeTag {
    pub const ALL: [ShapeTag; 4] = [Self::Axis, Self::Series, Self::Bar, Self::Label];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AxisShape {
    Linear { side: AxisSide, scale: LinearScale },
    Band { side: AxisSide, categories: Vec<String> },
}

/// One line of a multi-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesShape {
    pub key: String,
    pub color: String,
    /// Data-space points, ordered by x.
    pub points: Vec<(f64, f64)>,
    /// Pixel-space points.
    pub pixels: Vec<(f64, f64)>,
    pub hover: HoverPayload,
}

impl SeriesShape {
    pub fn new(
        key: &str,
        color: &str,
        points: Vec<(f64, f64)>,
        x: &LinearScale,
        y: &LinearScale,
    ) -> Self {
        let pixels = points.iter().map(|&(px, py)| (x.map(px), y.map(py))).collect();
        Self {
            key: key.to_string(),
            color: color.to_string(),
            points,
            pixels,
            hover: HoverPayload::Series {
                key: key.to_string(),
            },
        }
    }

    /// SVG path data (`M x,y L x,y ...`); empty for a series with no points.
    pub fn path_data(&self) -> String {
        let mut path = String::new();
        for (idx, (x, y)) in self.pixels.iter().enumerate() {
            path.push(if idx == 0 { 'M' } else { 'L' });
            path.push_str(&coord(*x));
            path.push(',');
            path.push_str(&coord(*y));
        }
        path
    }
}

fn coord(v: f64) -> String {
    format_numeric((v * 1000.0).round() / 1000.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarShape {
    pub category: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub hover: HoverPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelShape {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Axis(AxisShape),
    Series(SeriesShape),
    Bar(BarShape),
    Label(LabelShape),
}

impl Shape {
    pub fn tag(&self) -> ShapeTag {
        match self {
            Self::Axis(_) => ShapeTag::Axis,
            Self::Series(_) => ShapeTag::Series,
            Self::Bar(_) => ShapeTag::Bar,
            Self::Label(_) => ShapeTag::Label,
        }
    }

    pub fn hover(&self) -> Option<&HoverPayload> {
        match self {
            Self::Series(series) => Some(&series.hover),
            Self::Bar(bar) => Some(&bar.hover),
            Self::Axis(_) | Self::Label(_) => None,
        }
    }
}

/// A 2-D chart panel.
pub trait Surface {
    /// Removes every shape carrying `tag`. Removing from an empty surface
    /// is a no-op.
    fn remove(&mut self, tag: ShapeTag);

    fn add(&mut self, shape: Shape);

    /// Payload of the shape at `index`, as a pointer-hover callback
    /// receives it.
    fn hover_at(&self, index: usize) -> Option<&HoverPayload>;

    fn clear(&mut self) {
        for tag in ShapeTag::ALL {
            self.remove(tag);
        }
    }

    /// Called once after a complete redraw.
    fn present(&mut self) {}
}

/// In-memory surface that records what a panel currently shows.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    shapes: Vec<Shape>,
    frames: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn count(&self, tag: ShapeTag) -> usize {
        self.shapes.iter().filter(|s| s.tag() == tag).count()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of completed redraws.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn series(&self) -> impl Iterator<Item = &SeriesShape> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Series(series) => Some(series),
            _ => None,
        })
    }

    pub fn bars(&self) -> impl Iterator<Item = &BarShape> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Bar(bar) => Some(bar),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Label(label) => Some(label.text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn remove(&mut self, tag: ShapeTag) {
        self.shapes.retain(|s| s.tag() != tag);
    }

    fn add(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    fn hover_at(&self, index: usize) -> Option<&HoverPayload> {
        self.shapes.get(index).and_then(Shape::hover)
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

/// Fill color resolved for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFill {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

/// A choropleth map panel.
pub trait MapSurface {
    fn set_fills(&mut self, fills: Vec<FeatureFill>);

    fn set_legend(&mut self, title: &str, entries: Vec<LegendEntry>);

    fn clear(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMapSurface {
    pub fills: Vec<FeatureFill>,
    pub legend_title: String,
    pub legend: Vec<LegendEntry>,
}

impl RecordingMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&self, name: &str) -> Option<&FeatureFill> {
        self.fills.iter().find(|f| f.name == name)
    }
}

impl MapSurface for RecordingMapSurface {
    fn set_fills(&mut self, fills: Vec<FeatureFill>) {
        self.fills = fills;
    }

    fn set_legend(&mut self, title: &str, entries: Vec<LegendEntry>) {
        self.legend_title = title.to_string();
        self.legend = entries;
    }

    fn clear(&mut self) {
        self.fills.clear();
        self.legend.clear();
        self.legend_title.clear();
    }
}
