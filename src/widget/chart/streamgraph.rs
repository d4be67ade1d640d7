use crate::style;
use crate::widget::chart::{band_path, band_sliver, fill_label};

use data::chart::streamgraph::Surface;
use data::chart::{LegendRow, MiniBarChart, Scene, Tooltip, legend, mini_bars, tooltip};
use data::{Observation, SeriesCatalog};

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::theme::palette::Extended;
use iced::widget::canvas::{self, Path};
use iced::{
    Alignment, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse,
    window,
};

const AXIS_TICK_SIZE: f32 = 6.0;
const AXIS_LABEL_GAP: f32 = 9.0;
const AXIS_TEXT_SIZE: f32 = 11.0;
const TITLE_TEXT_SIZE: f32 = 13.0;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamgraphEvent {
    /// `None` once the pointer leaves every band.
    SeriesHovered(Option<String>),
}

struct State {
    plot_cache: canvas::Cache,
    axis_cache: canvas::Cache,
    legend_cache: canvas::Cache,
    tooltip_cache: canvas::Cache,
    scene: Option<Scene>,
    tooltip: Tooltip,
    hovered: Option<usize>,
    last_cache_rev: u64,
    is_synced: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            plot_cache: canvas::Cache::new(),
            axis_cache: canvas::Cache::new(),
            legend_cache: canvas::Cache::new(),
            tooltip_cache: canvas::Cache::new(),
            scene: None,
            tooltip: Tooltip::default(),
            hovered: None,
            last_cache_rev: 0,
            is_synced: false,
        }
    }
}

impl State {
    fn clear_all_caches(&mut self) {
        self.plot_cache.clear();
        self.axis_cache.clear();
        self.legend_cache.clear();
        self.tooltip_cache.clear();
    }

    /// Rebuilds everything from scratch whenever the data revision moves.
    fn sync(&mut self, chart: &Streamgraph<'_>) {
        if self.is_synced && self.last_cache_rev == chart.version {
            return;
        }

        log::debug!(
            "Rendering streamgraph rev {}: {} dates, {} series",
            chart.version,
            chart.observations.len(),
            chart.catalog.len(),
        );
        if let (Some(first), Some(last)) = (chart.observations.first(), chart.observations.last())
        {
            log::debug!("Date range {} .. {}", first.date, last.date);
        }

        self.scene = Scene::build(chart.observations, chart.catalog, chart.surface);
        self.tooltip.on_leave();
        self.hovered = None;
        self.clear_all_caches();

        self.last_cache_rev = chart.version;
        self.is_synced = true;
    }

    fn hover<M: From<StreamgraphEvent>>(
        &mut self,
        pointer: Point,
        observations: &[Observation],
        shell: &mut Shell<'_, M>,
    ) {
        let hit = self.scene.as_ref().and_then(|scene| {
            let index = scene.region_at(pointer)?;
            let region = scene.regions.get(index)?;
            Some((index, region.series.clone(), region.color))
        });

        let Some((index, series, color)) = hit else {
            self.leave(shell);
            return;
        };

        self.tooltip.on_hover(&series, pointer, observations, color);
        self.tooltip_cache.clear();

        if self.hovered != Some(index) {
            self.hovered = Some(index);
            self.plot_cache.clear();
            shell.publish(M::from(StreamgraphEvent::SeriesHovered(Some(series))));
        }
    }

    fn leave<M: From<StreamgraphEvent>>(&mut self, shell: &mut Shell<'_, M>) {
        if !self.tooltip.is_visible() && self.hovered.is_none() {
            return;
        }

        self.tooltip.on_leave();
        self.tooltip_cache.clear();

        if self.hovered.take().is_some() {
            self.plot_cache.clear();
            shell.publish(M::from(StreamgraphEvent::SeriesHovered(None)));
        }
    }
}

/// Stacked-area view of every catalog series over time, with a legend to
/// the right and a per-series bar chart tooltip on hover.
pub struct Streamgraph<'a> {
    observations: &'a [Observation],
    catalog: &'a SeriesCatalog,
    surface: Surface,
    version: u64,
}

impl<'a> Streamgraph<'a> {
    pub fn new(observations: &'a [Observation], catalog: &'a SeriesCatalog) -> Self {
        Self {
            observations,
            catalog,
            surface: Surface::default(),
            version: 0,
        }
    }

    pub fn version(mut self, rev: u64) -> Self {
        self.version = rev;
        self
    }

    /// Surface plus the legend gutter on its right.
    fn footprint(&self) -> Size {
        let legend_right = legend::LEGEND_ORIGIN.x + legend::width(self.catalog);
        Size::new(self.surface.width.max(legend_right), self.surface.height)
    }
}

impl<'a, M> Widget<M, Theme, Renderer> for Streamgraph<'a>
where
    M: Clone + 'static + From<StreamgraphEvent>,
{
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        let footprint = self.footprint();

        Size {
            width: Length::Fixed(footprint.width),
            height: Length::Fixed(footprint.height),
        }
    }

    fn layout(
        &mut self,
        tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        tree.state.downcast_mut::<State>().sync(self);

        let footprint = self.footprint();
        layout::atomic(limits, footprint.width, footprint.height)
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        let state = tree.state.downcast_mut::<State>();

        match event {
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if shell.is_event_captured() {
                    return;
                }

                match cursor.position_in(layout.bounds()) {
                    Some(pointer) => state.hover(pointer, self.observations, shell),
                    None => state.leave(shell),
                }
            }
            Event::Mouse(mouse::Event::CursorLeft) => {
                state.leave(shell);
            }
            Event::Window(window::Event::RedrawRequested(_)) => {
                state.sync(self);
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;
        use iced::advanced::graphics::geometry::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let Some(scene) = state.scene.as_ref() else {
            return;
        };

        let bounds = layout.bounds();
        let palette = theme.extended_palette();

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            let origin = scene.surface.plot_origin();
            let plot_size = Size::new(scene.surface.inner_width(), scene.surface.inner_height());

            let plot_geom = state.plot_cache.draw(r, plot_size, |frame| {
                fill_regions(frame, scene, state.hovered, palette);
            });

            let axis_geom = state.axis_cache.draw(r, bounds.size(), |frame| {
                fill_x_axis(frame, scene, palette);
            });

            let legend_geom = state.legend_cache.draw(r, bounds.size(), |frame| {
                fill_legend(frame, &scene.legend, palette);
            });

            r.with_translation(Vector::new(origin.x, origin.y), |r| {
                r.draw_geometry(plot_geom);
            });
            r.draw_geometry(axis_geom);
            r.draw_geometry(legend_geom);

            if state.tooltip.is_visible() {
                let tooltip_geom = state.tooltip_cache.draw(r, bounds.size(), |frame| {
                    fill_tooltip(frame, &state.tooltip, bounds.size());
                });

                r.with_layer(
                    Rectangle {
                        x: 0.0,
                        y: 0.0,
                        width: bounds.width,
                        height: bounds.height,
                    },
                    |r| {
                        r.draw_geometry(tooltip_geom);
                    },
                );
            }
        });
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: advanced::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> advanced::mouse::Interaction {
        let state = tree.state.downcast_ref::<State>();

        if let Some(pointer) = cursor.position_in(layout.bounds())
            && let Some(scene) = state.scene.as_ref()
            && legend::swatch_at(&scene.legend, pointer).is_some()
        {
            return advanced::mouse::Interaction::Pointer;
        }

        advanced::mouse::Interaction::default()
    }
}

impl<'a, M> From<Streamgraph<'a>> for Element<'a, M, Theme, Renderer>
where
    M: Clone + 'a + 'static + From<StreamgraphEvent>,
{
    fn from(chart: Streamgraph<'a>) -> Self {
        Element::new(chart)
    }
}

/// Regions in catalog order, so later series paint over earlier ones.
fn fill_regions(
    frame: &mut canvas::Frame,
    scene: &Scene,
    hovered: Option<usize>,
    palette: &Extended,
) {
    for (index, region) in scene.regions.iter().enumerate() {
        let fill = region.color.scale_alpha(region.opacity);

        for polygon in &region.polygons {
            if let [point] = polygon.as_slice() {
                frame.stroke(
                    &band_sliver(point),
                    canvas::Stroke::default().with_color(fill).with_width(1.0),
                );
                continue;
            }

            let path = band_path(polygon);
            frame.fill(&path, fill);

            if hovered == Some(index) {
                frame.stroke(&path, style::hovered_outline(region.color, palette));
            }
        }
    }
}

fn fill_x_axis(frame: &mut canvas::Frame, scene: &Scene, palette: &Extended) {
    let origin = scene.surface.plot_origin();
    let y = origin.y + scene.surface.inner_height();
    let ink = style::axis_ink(palette);

    frame.stroke(
        &Path::line(
            Point::new(origin.x, y),
            Point::new(origin.x + scene.surface.inner_width(), y),
        ),
        style::axis_stroke(palette),
    );

    for tick in &scene.x_axis {
        let x = origin.x + tick.offset;

        frame.stroke(
            &Path::line(Point::new(x, y), Point::new(x, y + AXIS_TICK_SIZE)),
            style::axis_stroke(palette),
        );
        fill_label(
            frame,
            &tick.label,
            Point::new(x, y + AXIS_LABEL_GAP),
            ink,
            AXIS_TEXT_SIZE,
            (Alignment::Center, Alignment::Start),
        );
    }
}

fn fill_legend(frame: &mut canvas::Frame, rows: &[LegendRow], palette: &Extended) {
    for row in rows {
        frame.fill(
            &Path::rounded_rectangle(
                row.swatch.position(),
                row.swatch.size(),
                legend::SWATCH_RADIUS.into(),
            ),
            row.color,
        );

        fill_label(
            frame,
            &row.name,
            row.label_pos,
            palette.background.base.text,
            legend::LABEL_SIZE,
            (Alignment::Start, Alignment::End),
        );
    }
}

/// White card next to the pointer, kept inside the widget bounds.
fn fill_tooltip(frame: &mut canvas::Frame, tooltip: &Tooltip, bounds: Size) {
    let Some(chart) = tooltip.chart() else {
        return;
    };

    let size = Tooltip::size();
    let origin = card_origin(tooltip.position(), size, bounds);

    let card = Path::rounded_rectangle(origin, size, style::TOOLTIP_RADIUS.into());
    frame.fill(&card, style::TOOLTIP_BACKGROUND.scale_alpha(tooltip.opacity()));
    frame.stroke(&card, style::tooltip_border());

    frame.fill_text(canvas::Text {
        content: chart.title.clone(),
        position: origin + Vector::new(tooltip::PADDING, tooltip::PADDING),
        color: style::TOOLTIP_TEXT,
        size: TITLE_TEXT_SIZE.into(),
        font: style::BOLD_FONT,
        align_x: Alignment::Start.into(),
        align_y: Alignment::Start.into(),
        ..Default::default()
    });

    frame.with_save(|frame| {
        frame.translate(Vector::new(
            origin.x + tooltip::PADDING,
            origin.y + tooltip::PADDING + tooltip::TITLE_HEIGHT,
        ));
        fill_mini_chart(frame, chart);
    });
}

/// Near the widget edges the card shifts inward, overriding the fixed
/// pointer offset, so it is never clipped.
fn card_origin(anchor: Point, card: Size, bounds: Size) -> Point {
    Point::new(
        anchor.x.min(bounds.width - card.width).max(0.0),
        anchor.y.min(bounds.height - card.height).max(0.0),
    )
}

fn fill_mini_chart(frame: &mut canvas::Frame, chart: &MiniBarChart) {
    for bar in &chart.bars {
        if bar.bounds.height <= 0.0 {
            continue;
        }

        frame.fill(
            &Path::rounded_rectangle(
                bar.bounds.position(),
                bar.bounds.size(),
                mini_bars::BAR_RADIUS.into(),
            ),
            chart.color,
        );
    }

    let baseline = MiniBarChart::baseline();
    let left = mini_bars::MARGIN.left;
    let right = mini_bars::WIDTH - mini_bars::MARGIN.right;

    frame.stroke(
        &Path::line(Point::new(left, baseline), Point::new(right, baseline)),
        style::tooltip_border(),
    );
    frame.stroke(
        &Path::line(Point::new(left, mini_bars::MARGIN.top), Point::new(left, baseline)),
        style::tooltip_border(),
    );

    for tick in &chart.x_ticks {
        fill_label(
            frame,
            &tick.label,
            Point::new(tick.offset, baseline + 3.0),
            style::TOOLTIP_TEXT,
            mini_bars::TICK_LABEL_SIZE,
            (Alignment::Center, Alignment::Start),
        );
    }

    for tick in &chart.y_ticks {
        fill_label(
            frame,
            &tick.label,
            Point::new(left - 3.0, tick.offset),
            style::TOOLTIP_TEXT,
            mini_bars::TICK_LABEL_SIZE,
            (Alignment::End, Alignment::Center),
        );
    }
}
