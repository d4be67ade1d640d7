mod logger;
mod screen;
mod style;
mod widget;

use data::config::state::WindowSpec;
use data::{Observation, SeriesCatalog};
use screen::{AppError, DataSource};
use widget::chart::streamgraph::{Streamgraph, StreamgraphEvent};

use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length, Size, Subscription, Task, window};

use std::path::{Path, PathBuf};

const TITLE: &str = "LLM Usage";

fn main() -> iced::Result {
    if let Err(err) = logger::setup(cfg!(debug_assertions)) {
        eprintln!("Failed to set up logging: {err}");
    }

    let saved = data::load_saved_state();
    let window = saved.main_window.unwrap_or_default();

    iced::application(move || App::new(saved.clone()), App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .subscription(App::subscription)
        .window_size(Size::new(window.width, window.height))
        .exit_on_close_request(false)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    DataLoaded(Result<Vec<Observation>, AppError>),
    Reload,
    Chart(StreamgraphEvent),
    WindowResized(Size),
    CloseRequested(window::Id),
}

impl From<StreamgraphEvent> for Message {
    fn from(event: StreamgraphEvent) -> Self {
        Message::Chart(event)
    }
}

enum Status {
    Loading,
    Ready,
    Failed(AppError),
}

struct App {
    theme: data::Theme,
    catalog: SeriesCatalog,
    source: DataSource,
    observations: Vec<Observation>,
    revision: u64,
    status: Status,
    hovered: Option<String>,
    window_size: Size,
}

impl App {
    fn new(saved: data::State) -> (Self, Task<Message>) {
        let arg = std::env::args_os().nth(1).map(PathBuf::from);
        let window = saved.main_window.unwrap_or_default();

        let app = App {
            catalog: saved.catalog(),
            source: DataSource::resolve(arg, saved.data_file),
            theme: saved.selected_theme,
            observations: Vec::new(),
            revision: 0,
            status: Status::Loading,
            hovered: None,
            window_size: Size::new(window.width, window.height),
        };

        log::info!(
            "Starting with {} series from {}",
            app.catalog.len(),
            app.source
        );

        let load = app.load();
        (app, load)
    }

    fn title(&self) -> String {
        format!("{TITLE} - {}", self.source)
    }

    fn theme(&self) -> iced::Theme {
        self.theme.clone().into()
    }

    fn load(&self) -> Task<Message> {
        Task::perform(self.source.clone().load(), Message::DataLoaded)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DataLoaded(Ok(observations)) => {
                log::info!(
                    "Loaded {} observations from {}",
                    observations.len(),
                    self.source
                );

                self.observations = observations;
                // identical data still redraws
                self.revision = self.revision.wrapping_add(1);
                self.status = Status::Ready;
                self.hovered = None;
            }
            Message::DataLoaded(Err(err)) => {
                log::error!("{err}");
                self.status = Status::Failed(err);
            }
            Message::Reload => {
                self.status = Status::Loading;
                return self.load();
            }
            Message::Chart(StreamgraphEvent::SeriesHovered(series)) => {
                log::debug!("Hovered series: {series:?}");
                self.hovered = series;
            }
            Message::WindowResized(size) => {
                self.window_size = size;
            }
            Message::CloseRequested(_) => {
                self.save_state();
                return iced::exit();
            }
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let header = row![
            container(text(TITLE).size(16).font(style::BOLD_FONT)).width(Length::Fill),
            button(text("Reload")).on_press(Message::Reload),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let chart = container(
            Streamgraph::new(&self.observations, &self.catalog).version(self.revision),
        )
        .padding(4)
        .style(style::chart_container);

        let (status, is_error) = match &self.status {
            Status::Loading => (format!("Loading {}...", self.source), false),
            Status::Ready => (
                format!("{} dates from {}", self.observations.len(), self.source),
                false,
            ),
            Status::Failed(err) => (err.to_string(), true),
        };

        let footer = row![
            container(
                text(status)
                    .size(12)
                    .style(move |theme: &iced::Theme| style::status_text(theme, is_error))
            )
            .width(Length::Fill),
            text(self.hovered.clone().unwrap_or_default()).size(12),
        ]
        .spacing(8);

        column![header, chart, footer]
            .spacing(8)
            .padding(12)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::close_requests().map(Message::CloseRequested),
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }

    fn save_state(&self) {
        let state = data::State::from_parts(
            self.theme.clone(),
            &self.catalog,
            self.source.path().map(Path::to_path_buf),
            Some(WindowSpec {
                width: self.window_size.width,
                height: self.window_size.height,
            }),
        );

        match serde_json::to_string_pretty(&state) {
            Ok(json) => {
                if let Err(err) = data::write_json_to_file(&json, data::SAVED_STATE_PATH) {
                    log::error!("Failed to write saved state: {err}");
                }
            }
            Err(err) => log::error!("Failed to serialize saved state: {err}"),
        }
    }
}
