use chrono::NaiveDate;
use iced_core::{Color, Point, Rectangle, Size};

use super::scale::{BandScale, LinearScale};
use super::{AxisTick, Margin};
use crate::observation::Observation;
use crate::util::format_with_commas;

pub const WIDTH: f32 = 180.0;
pub const HEIGHT: f32 = 100.0;
pub const MARGIN: Margin = Margin::new(5.0, 5.0, 20.0, 25.0);
pub const BAND_PADDING: f32 = 0.15;
pub const BAR_RADIUS: f32 = 2.0;
pub const Y_TICK_COUNT: usize = 3;
pub const TICK_LABEL_SIZE: f32 = 9.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub value: f64,
    pub bounds: Rectangle,
}

/// Per-date bars of a single series, drawn inside the hover tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniBarChart {
    pub title: String,
    pub color: Color,
    pub bars: Vec<Bar>,
    /// Month labels, `offset` is the band center.
    pub x_ticks: Vec<AxisTick>,
    /// Value labels, `offset` is the y pixel.
    pub y_ticks: Vec<AxisTick>,
}

impl MiniBarChart {
    pub fn size() -> Size {
        Size::new(WIDTH, HEIGHT)
    }

    /// Y pixel of the bars' baseline.
    pub fn baseline() -> f32 {
        HEIGHT - MARGIN.bottom
    }

    pub fn build(series: &str, observations: &[Observation], color: Color) -> Self {
        let x = BandScale::new(
            observations.len(),
            (MARGIN.left, WIDTH - MARGIN.right),
            BAND_PADDING,
        );

        let max = observations
            .iter()
            .map(|o| o.value(series))
            .filter(|v| v.is_finite())
            .reduce(f64::max);
        let y = LinearScale::new((0.0, max.unwrap_or(0.0)), (Self::baseline(), MARGIN.top));

        let bars = observations
            .iter()
            .enumerate()
            .filter_map(|(i, obs)| {
                let left = x.position(i)?;
                let value = obs.value(series);

                let top = if value.is_finite() && max.is_some_and(|m| m > 0.0) {
                    y.map(value).min(Self::baseline())
                } else {
                    Self::baseline()
                };

                Some(Bar {
                    date: obs.date,
                    value,
                    bounds: Rectangle::new(
                        Point::new(left, top),
                        Size::new(x.bandwidth(), Self::baseline() - top),
                    ),
                })
            })
            .collect();

        let x_ticks = observations
            .iter()
            .enumerate()
            .filter_map(|(i, obs)| {
                Some(AxisTick {
                    offset: x.center(i)?,
                    label: obs.date.format("%b").to_string(),
                })
            })
            .collect();

        let precision = y.tick_precision(Y_TICK_COUNT);
        let y_ticks = y
            .ticks(Y_TICK_COUNT)
            .into_iter()
            .map(|v| AxisTick {
                offset: y.map(v),
                label: format_with_commas(v, precision),
            })
            .collect();

        Self {
            title: series.to_string(),
            color,
            bars,
            x_ticks,
            y_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn scenario() -> Vec<Observation> {
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
    fn one_bar_per_observation_scaled_to_series_max() {
        let chart = MiniBarChart::build("A", &scenario(), Color::BLACK);

        assert_eq!(chart.title, "A");
        assert_eq!(chart.bars.len(), 2);

        let full = MiniBarChart::baseline() - MARGIN.top;
        assert!(close(chart.bars[0].bounds.height, full));
        assert!(close(chart.bars[1].bounds.height, full * 0.4));
        assert!(close(chart.bars[0].bounds.y, MARGIN.top));
        assert!(close(
            chart.bars[1].bounds.y + chart.bars[1].bounds.height,
            MiniBarChart::baseline()
        ));
    }

    #[test]
    fn bars_sit_in_padded_bands() {
        let chart = MiniBarChart::build("A", &scenario(), Color::BLACK);
        let (a, b) = (&chart.bars[0].bounds, &chart.bars[1].bounds);

        assert!(a.x > MARGIN.left);
        assert!(b.x + b.width < WIDTH - MARGIN.right);
        assert!(close(a.width, b.width));
        assert!(b.x > a.x + a.width);
    }

    #[test]
    fn heights_are_monotonic_in_value() {
        let data: Vec<Observation> = [3.0, 9.0, 1.0, 6.0]
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(date(i as u32 + 1)).with_value("A", *v))
            .collect();
        let chart = MiniBarChart::build("A", &data, Color::BLACK);

        let mut by_value: Vec<&Bar> = chart.bars.iter().collect();
        by_value.sort_by(|a, b| a.value.total_cmp(&b.value));
        for pair in by_value.windows(2) {
            assert!(pair[0].bounds.height < pair[1].bounds.height);
        }
    }

    #[test]
    fn axes_label_months_and_values() {
        let chart = MiniBarChart::build("A", &scenario(), Color::BLACK);

        let months: Vec<&str> = chart.x_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(months, vec!["Jan", "Feb"]);

        let values: Vec<&str> = chart.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(values, vec!["0", "5", "10"]);
        assert!(close(chart.y_ticks[0].offset, MiniBarChart::baseline()));
        assert!(close(chart.y_ticks[2].offset, MARGIN.top));
    }

    #[test]
    fn missing_or_zero_values_draw_flat_bars() {
        let data = vec![
            Observation::new(date(1)).with_value("A", 0.0),
            Observation::new(date(2)),
        ];
        let chart = MiniBarChart::build("A", &data, Color::BLACK);

        assert_eq!(chart.bars.len(), 2);
        assert!(chart.bars.iter().all(|b| b.bounds.height == 0.0));
    }

    #[test]
    fn no_observations_no_bars() {
        let chart = MiniBarChart::build("A", &[], Color::BLACK);
        assert!(chart.bars.is_empty());
        assert!(chart.x_ticks.is_empty());
    }
}
