//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dash_core::surface::{BarShape, FeatureFill, LegendEntry, SeriesShape};
use dash_core::{SectionId, SectionStatus};
use dash_model::{HoverPayload, format_numeric, format_thousands};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// One row of the `dashboard` readiness table.
#[derive(Debug, Clone)]
pub struct SectionRow {
    pub section: SectionId,
    pub records: Option<usize>,
    pub issues: usize,
    pub status: SectionStatus,
}

pub fn section_table(rows: &[SectionRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Records"),
        header_cell("Issues"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in rows {
        let detail = match &row.status {
            SectionStatus::Failed(reason) => Cell::new(reason).fg(Color::Red),
            _ => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(row.section)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            row.records.map_or_else(|| dim_cell("-"), Cell::new),
            count_cell(row.issues, Color::Yellow),
            status_cell(&row.status),
            detail,
        ]);
    }
    table
}

pub fn series_table(series: &[&SeriesShape]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Series"),
        header_cell("Color"),
        header_cell("Points"),
        header_cell("First"),
        header_cell("Last"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for shape in series {
        table.add_row(vec![
            Cell::new(&shape.key),
            Cell::new(&shape.color),
            Cell::new(shape.points.len()),
            point_cell(shape.points.first()),
            point_cell(shape.points.last()),
        ]);
    }
    table
}

pub fn bar_table(bars: &[&BarShape]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Median Income"),
        header_cell("Height"),
        header_cell("Color"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for bar in bars {
        let income = match &bar.hover {
            HoverPayload::HouseholdBar { income, .. } | HoverPayload::AgeBar { income, .. } => {
                Cell::new(format!("${}", format_thousands(*income)))
            }
            _ => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&bar.category),
            income,
            Cell::new(format!("{:.1}", bar.height)),
            Cell::new(&bar.color),
        ]);
    }
    table
}

pub fn fill_table(fills: &[FeatureFill]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("State"),
        header_cell("Value"),
        header_cell("Fill"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for fill in fills {
        table.add_row(vec![
            Cell::new(&fill.name),
            Cell::new(format_thousands(fill.value)),
            Cell::new(&fill.color),
        ]);
    }
    table
}

/// Legend as plain lines (`#fee5d9  2.0 - 3.2%`).
pub fn legend_lines(title: &str, entries: &[LegendEntry]) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("{}  {}", entry.color, entry.label)),
    );
    lines
}

fn point_cell(point: Option<&(f64, f64)>) -> Cell {
    match point {
        Some((x, y)) => Cell::new(format!("{} = {}", format_numeric(*x), format_numeric(*y))),
        None => dim_cell("-"),
    }
}

fn status_cell(status: &SectionStatus) -> Cell {
    match status {
        SectionStatus::Ready => Cell::new("ready")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        SectionStatus::Loading => Cell::new("loading").fg(Color::Yellow),
        SectionStatus::Failed(_) => Cell::new("failed")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
