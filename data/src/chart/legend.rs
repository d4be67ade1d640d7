use iced_core::{Color, Point, Rectangle, Size};

use crate::catalog::SeriesCatalog;

/// Legend anchor relative to the chart surface origin.
pub const LEGEND_ORIGIN: Point = Point { x: 620.0, y: 50.0 };
pub const ROW_SPACING: f32 = 24.0;
pub const SWATCH_SIZE: f32 = 16.0;
pub const SWATCH_RADIUS: f32 = 3.0;
pub const LABEL_OFFSET: Point = Point { x: 22.0, y: 11.0 };
pub const LABEL_SIZE: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub name: String,
    pub color: Color,
    pub swatch: Rectangle,
    /// Baseline-left of the label text.
    pub label_pos: Point,
}

/// One row per catalog entry, in catalog order. Always a fresh set, so a
/// rebuild never duplicates rows.
pub fn build(catalog: &SeriesCatalog) -> Vec<LegendRow> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let top = LEGEND_ORIGIN.y + index as f32 * ROW_SPACING;

            LegendRow {
                name: entry.name.clone(),
                color: entry.color,
                swatch: Rectangle::new(
                    Point::new(LEGEND_ORIGIN.x, top),
                    Size::new(SWATCH_SIZE, SWATCH_SIZE),
                ),
                label_pos: Point::new(LEGEND_ORIGIN.x + LABEL_OFFSET.x, top + LABEL_OFFSET.y),
            }
        })
        .collect()
}

pub fn swatch_at(rows: &[LegendRow], p: Point) -> Option<usize> {
    rows.iter().position(|row| row.swatch.contains(p))
}

/// Horizontal room the legend needs past its anchor.
pub fn width(catalog: &SeriesCatalog) -> f32 {
    let longest = catalog.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    LABEL_OFFSET.x + longest as f32 * LABEL_SIZE * 0.6
}
