use iced_core::{Color, Point, Size, Vector};

use super::mini_bars::MiniBarChart;
use crate::observation::Observation;

/// Tooltip placement relative to the pointer.
pub const POINTER_OFFSET: Vector = Vector { x: 15.0, y: -20.0 };
pub const PADDING: f32 = 10.0;
pub const TITLE_HEIGHT: f32 = 18.0;

/// Hover card state. Lives as long as the chart widget that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    visible: bool,
    position: Point,
    chart: Option<MiniBarChart>,
}

impl Tooltip {
    pub fn size() -> Size {
        let chart = MiniBarChart::size();
        Size::new(
            chart.width + PADDING * 2.0,
            chart.height + TITLE_HEIGHT + PADDING * 2.0,
        )
    }

    /// Shows the card next to `pointer` and redraws its chart from scratch,
    /// even when the same series is hovered again.
    pub fn on_hover(
        &mut self,
        series: &str,
        pointer: Point,
        observations: &[Observation],
        color: Color,
    ) {
        self.visible = true;
        self.position = pointer + POINTER_OFFSET;
        self.chart = Some(MiniBarChart::build(series, observations, color));
    }

    pub fn on_leave(&mut self) {
        self.visible = false;
        self.chart = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f32 {
        if self.visible { 1.0 } else { 0.0 }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn chart(&self) -> Option<&MiniBarChart> {
        self.chart.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scenario() -> Vec<Observation> {
        let date = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        vec![
            Observation::new(date(1))
                .with_value("A", 10.0)
                .with_value("B", 5.0),
            Observation::new(date(2))
                .with_value("A", 4.0)
                .with_value("B", 12.0),
        ]
    }

    #[test]
    fn starts_hidden_and_empty() {
        let tooltip = Tooltip::default();

        assert!(!tooltip.is_visible());
        assert_eq!(tooltip.opacity(), 0.0);
        assert!(tooltip.chart().is_none());
    }

    #[test]
    fn hover_shows_one_chart_next_to_pointer() {
        let mut tooltip = Tooltip::default();
        tooltip.on_hover("A", Point::new(100.0, 200.0), &scenario(), Color::BLACK);

        assert!(tooltip.is_visible());
        assert_eq!(tooltip.opacity(), 1.0);
        assert_eq!(tooltip.position(), Point::new(115.0, 180.0));

        let chart = tooltip.chart().unwrap();
        assert_eq!(chart.title, "A");
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].value, 10.0);
        assert_eq!(chart.bars[1].value, 4.0);
    }

    #[test]
    fn moving_to_another_series_replaces_chart() {
        let mut tooltip = Tooltip::default();
        tooltip.on_hover("A", Point::new(10.0, 10.0), &scenario(), Color::BLACK);
        tooltip.on_hover("B", Point::new(20.0, 30.0), &scenario(), Color::WHITE);

        let chart = tooltip.chart().unwrap();
        assert_eq!(chart.title, "B");
        assert_eq!(chart.color, Color::WHITE);
        assert_eq!(tooltip.position(), Point::new(35.0, 10.0));
    }

    #[test]
    fn re_hover_same_series_rebuilds_identically() {
        let mut tooltip = Tooltip::default();
        tooltip.on_hover("A", Point::new(10.0, 10.0), &scenario(), Color::BLACK);
        let first = tooltip.chart().cloned();

        tooltip.on_hover("A", Point::new(10.0, 10.0), &scenario(), Color::BLACK);
        assert_eq!(tooltip.chart().cloned(), first);
    }

    #[test]
    fn leave_hides_and_clears() {
        let mut tooltip = Tooltip::default();
        tooltip.on_hover("A", Point::new(10.0, 10.0), &scenario(), Color::BLACK);
        tooltip.on_leave();

        assert!(!tooltip.is_visible());
        assert_eq!(tooltip.opacity(), 0.0);
        assert!(tooltip.chart().is_none());
    }
}
