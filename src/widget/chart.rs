pub mod streamgraph;

use crate::style;

use data::chart::streamgraph::EdgePoint;
use iced::widget::canvas::{self, Path};
use iced::{Alignment, Color, Point};

/// Closed outline of one band: left to right along the top edge, then back
/// along the bottom edge.
pub fn band_path(polygon: &[EdgePoint]) -> Path {
    Path::new(|builder| {
        let Some((first, rest)) = polygon.split_first() else {
            return;
        };

        builder.move_to(Point::new(first.x, first.top));
        for p in rest {
            builder.line_to(Point::new(p.x, p.top));
        }
        for p in polygon.iter().rev() {
            builder.line_to(Point::new(p.x, p.bottom));
        }
        builder.close();
    })
}

/// Vertical sliver for a band that exists at a single date only.
pub fn band_sliver(point: &EdgePoint) -> Path {
    Path::line(
        Point::new(point.x, point.top),
        Point::new(point.x, point.bottom),
    )
}

pub fn fill_label(
    frame: &mut canvas::Frame,
    content: &str,
    position: Point,
    color: Color,
    size: f32,
    align: (Alignment, Alignment),
) {
    frame.fill_text(canvas::Text {
        content: content.to_string(),
        position,
        color,
        size: size.into(),
        font: style::TEXT_FONT,
        align_x: align.0.into(),
        align_y: align.1.into(),
        ..Default::default()
    });
}
