use chrono::NaiveDate;
use iced_core::{Color, Point};

use super::legend::{self, LegendRow};
use super::scale::{LinearScale, TimeScale, format_date_tick};
use super::stack::{self, Band};
use super::{AxisTick, Margin};
use crate::catalog::SeriesCatalog;
use crate::observation::Observation;

pub const SURFACE_WIDTH: f32 = 600.0;
pub const SURFACE_HEIGHT: f32 = 500.0;
pub const SURFACE_MARGIN: Margin = Margin::new(40.0, 20.0, 40.0, 50.0);

pub const REGION_OPACITY: f32 = 0.85;
pub const X_TICK_COUNT: usize = 10;

/// Slack for hit testing regions that collapse to a vertical line.
const DEGENERATE_HIT_PX: f32 = 0.5;

/// The drawable area the chart is laid out on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    pub margin: Margin,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            margin: SURFACE_MARGIN,
        }
    }
}

impl Surface {
    pub fn inner_width(&self) -> f32 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f32 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// Top-left of the plot area in surface coordinates.
    pub fn plot_origin(&self) -> Point {
        Point::new(self.margin.left, self.margin.top)
    }
}

/// A vertex of a filled region: one x with its top and bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePoint {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

impl EdgePoint {
    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.top.is_finite() && self.bottom.is_finite()
    }
}

/// One series' filled area, in plot coordinates. Split into several
/// polygons wherever a point is undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub series: String,
    pub color: Color,
    pub opacity: f32,
    pub polygons: Vec<Vec<EdgePoint>>,
}

impl Region {
    pub fn contains(&self, p: Point) -> bool {
        self.polygons.iter().any(|poly| polygon_contains(poly, p))
    }
}

fn polygon_contains(poly: &[EdgePoint], p: Point) -> bool {
    let within = |top: f32, bottom: f32| p.y >= top.min(bottom) && p.y <= top.max(bottom);

    if let [only] = poly {
        return (p.x - only.x).abs() <= DEGENERATE_HIT_PX && within(only.top, only.bottom);
    }

    poly.windows(2).any(|pair| {
        let (a, b) = (pair[0], pair[1]);
        let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };

        if p.x < left.x || p.x > right.x {
            return false;
        }

        let dx = right.x - left.x;
        if dx <= f32::EPSILON {
            return (p.x - left.x).abs() <= DEGENERATE_HIT_PX
                && (within(left.top, left.bottom) || within(right.top, right.bottom));
        }

        let t = (p.x - left.x) / dx;
        let top = left.top + (right.top - left.top) * t;
        let bottom = left.bottom + (right.bottom - left.bottom) * t;
        within(top, bottom)
    })
}

/// Everything one render pass draws, derived from the observations alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub surface: Surface,
    pub x_scale: TimeScale,
    pub y_scale: LinearScale,
    pub bands: Vec<Band>,
    pub regions: Vec<Region>,
    pub x_axis: Vec<AxisTick>,
    pub legend: Vec<LegendRow>,
}

impl Scene {
    /// `None` when there is nothing to draw.
    pub fn build(
        observations: &[Observation],
        catalog: &SeriesCatalog,
        surface: Surface,
    ) -> Option<Self> {
        let (first, last) = date_extent(observations)?;

        let x_scale = TimeScale::new(first, last, (0.0, surface.inner_width()));

        let keys = catalog.names();
        let bands = stack::stack_wiggle(observations, &keys);

        let (lo, hi) = stack::extent(&bands).unwrap_or((0.0, 0.0));
        let y_scale = LinearScale::new((lo, hi), (surface.inner_height(), 0.0));

        let regions = catalog
            .iter()
            .zip(&bands)
            .map(|(entry, band)| Region {
                series: entry.name.clone(),
                color: entry.color,
                opacity: REGION_OPACITY,
                polygons: band_polygons(band, &x_scale, &y_scale),
            })
            .collect();

        let x_axis = x_scale
            .ticks(X_TICK_COUNT)
            .into_iter()
            .map(|date| AxisTick {
                offset: x_scale.map(date),
                label: format_date_tick(date),
            })
            .collect();

        Some(Self {
            surface,
            x_scale,
            y_scale,
            bands,
            regions,
            x_axis,
            legend: legend::build(catalog),
        })
    }

    /// Topmost region under `p`, given in surface coordinates.
    pub fn region_at(&self, p: Point) -> Option<usize> {
        let origin = self.surface.plot_origin();
        let local = Point::new(p.x - origin.x, p.y - origin.y);

        self.regions.iter().rposition(|region| region.contains(local))
    }
}

fn date_extent(observations: &[Observation]) -> Option<(NaiveDate, NaiveDate)> {
    let first = observations.iter().map(|o| o.date).min()?;
    let last = observations.iter().map(|o| o.date).max()?;
    Some((first, last))
}

fn band_polygons(band: &Band, x: &TimeScale, y: &LinearScale) -> Vec<Vec<EdgePoint>> {
    let mut polygons = Vec::new();
    let mut current = Vec::new();

    for p in &band.points {
        let point = EdgePoint {
            x: x.map(p.date),
            top: y.map(p.upper),
            bottom: y.map(p.lower),
        };

        if point.is_finite() {
            current.push(point);
        } else if !current.is_empty() {
            polygons.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        polygons.push(current);
    }
    polygons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SeriesEntry;

    fn date(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, 1).unwrap()
    }

    fn catalog_ab() -> SeriesCatalog {
        SeriesCatalog::new(vec![
            SeriesEntry::new("A", Color::from_rgb8(228, 26, 28)),
            SeriesEntry::new("B", Color::from_rgb8(55, 126, 184)),
        ])
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
    fn empty_observations_build_nothing() {
        assert_eq!(Scene::build(&[], &catalog_ab(), Surface::default()), None);
    }

    #[test]
    fn one_region_per_series_in_catalog_order() {
        let scene = Scene::build(&scenario(), &catalog_ab(), Surface::default()).unwrap();

        assert_eq!(scene.regions.len(), 2);
        assert_eq!(scene.regions[0].series, "A");
        assert_eq!(scene.regions[1].series, "B");
        assert!(scene.regions.iter().all(|r| r.opacity == REGION_OPACITY));
        assert_eq!(scene.regions[0].color, Color::from_rgb8(228, 26, 28));
    }

    #[test]
    fn scales_fill_the_plot_area() {
        let surface = Surface::default();
        let scene = Scene::build(&scenario(), &catalog_ab(), surface).unwrap();

        assert_eq!(surface.inner_width(), 530.0);
        assert_eq!(surface.inner_height(), 420.0);

        let a = &scene.regions[0].polygons[0];
        assert!((a[0].x - 0.0).abs() < 1e-3);
        assert!((a[1].x - 530.0).abs() < 1e-3);

        // global max upper sits at the top, global min lower at the bottom
        let b = &scene.regions[1].polygons[0];
        assert!(b[1].top.abs() < 1e-3);
        assert!((a[0].bottom - 420.0).abs() < 1e-3);
    }

    #[test]
    fn combined_band_height_matches_totals() {
        let scene = Scene::build(&scenario(), &catalog_ab(), Surface::default()).unwrap();

        let total = |j: usize| -> f64 {
            scene
                .bands
                .iter()
                .map(|b| b.points[j].upper - b.points[j].lower)
                .sum()
        };
        assert!((total(0) - 15.0).abs() < 1e-9);
        assert!((total(1) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let first = Scene::build(&scenario(), &catalog_ab(), Surface::default());
        let second = Scene::build(&scenario(), &catalog_ab(), Surface::default());

        assert_eq!(first, second);
        assert_eq!(second.unwrap().legend.len(), 2);
    }

    #[test]
    fn axis_ticks_stay_inside_plot() {
        let data: Vec<Observation> = (1..=12)
            .map(|m| Observation::new(date(m)).with_value("A", 1.0))
            .collect();
        let scene = Scene::build(&data, &catalog_ab(), Surface::default()).unwrap();

        assert_eq!(scene.x_axis.len(), 12);
        assert_eq!(scene.x_axis[0].label, "2024");
        assert!(
            scene
                .x_axis
                .iter()
                .all(|t| t.offset >= 0.0 && t.offset <= 530.0 + 1e-3)
        );
    }

    #[test]
    fn hit_testing_finds_the_band_under_the_pointer() {
        let scene = Scene::build(&scenario(), &catalog_ab(), Surface::default()).unwrap();
        let origin = scene.surface.plot_origin();

        let a = scene.regions[0].polygons[0][0];
        let b = scene.regions[1].polygons[0][0];

        let in_a = Point::new(origin.x + 1.0, origin.y + (a.top + a.bottom) / 2.0);
        let in_b = Point::new(origin.x + 1.0, origin.y + (b.top + b.bottom) / 2.0);

        assert_eq!(scene.region_at(in_a), Some(0));
        assert_eq!(scene.region_at(in_b), Some(1));

        // above every band at the left edge
        assert_eq!(scene.region_at(Point::new(origin.x + 1.0, origin.y - 10.0)), None);
        // left of the plot
        assert_eq!(scene.region_at(Point::new(0.0, in_a.y)), None);
    }

    #[test]
    fn missing_points_split_regions() {
        let data = vec![
            Observation::new(date(1)).with_value("A", 1.0).with_value("B", 1.0),
            Observation::new(date(2)).with_value("B", 2.0),
            Observation::new(date(3)).with_value("A", 1.0).with_value("B", 1.0),
        ];
        let scene = Scene::build(&data, &catalog_ab(), Surface::default()).unwrap();

        assert_eq!(scene.regions[0].polygons.len(), 2);
        assert_eq!(scene.regions[1].polygons.len(), 1);
        assert_eq!(scene.regions[1].polygons[0].len(), 3);
    }

    #[test]
    fn single_date_collapses_to_the_middle() {
        let data = vec![Observation::new(date(3)).with_value("A", 2.0).with_value("B", 1.0)];
        let scene = Scene::build(&data, &catalog_ab(), Surface::default()).unwrap();

        let a = scene.regions[0].polygons[0][0];
        assert!((a.x - 265.0).abs() < 1e-3);

        let origin = scene.surface.plot_origin();
        let hit = Point::new(origin.x + a.x, origin.y + (a.top + a.bottom) / 2.0);
        assert_eq!(scene.region_at(hit), Some(0));
    }
}
