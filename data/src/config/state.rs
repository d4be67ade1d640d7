use crate::catalog::SeriesCatalog;
use crate::util::ok_or_default;
use crate::Theme;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WindowSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 780.0,
            height: 620.0,
        }
    }
}

#[derive(Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct State {
    pub selected_theme: Theme,
    /// Overrides the built-in model list when present.
    #[serde(deserialize_with = "ok_or_default")]
    pub catalog: Option<SeriesCatalog>,
    pub data_file: Option<PathBuf>,
    pub main_window: Option<WindowSpec>,
}

impl State {
    pub fn from_parts(
        selected_theme: Theme,
        catalog: &SeriesCatalog,
        data_file: Option<PathBuf>,
        main_window: Option<WindowSpec>,
    ) -> Self {
        State {
            selected_theme,
            catalog: (*catalog != SeriesCatalog::default()).then(|| catalog.clone()),
            data_file,
            main_window,
        }
    }

    pub fn catalog(&self) -> SeriesCatalog {
        self.catalog.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SeriesEntry;

    #[test]
    fn empty_document_uses_defaults() {
        let state: State = serde_json::from_str("{}").unwrap();

        assert!(state.catalog.is_none());
        assert_eq!(state.catalog(), SeriesCatalog::llm_models());
        assert!(state.data_file.is_none());
    }

    #[test]
    fn broken_catalog_falls_back() {
        let state: State =
            serde_json::from_str(r#"{"catalog":[{"name":"A","color":"nope"}]}"#).unwrap();
        assert!(state.catalog.is_none());
    }

    #[test]
    fn round_trips_overrides() {
        let catalog = SeriesCatalog::new(vec![SeriesEntry::new("A", iced_core::Color::BLACK)]);
        let state = State::from_parts(
            Theme::default(),
            &catalog,
            Some(PathBuf::from("usage.csv")),
            Some(WindowSpec::default()),
        );

        let json = serde_json::to_string(&state).unwrap();
        let back: State = serde_json::from_str(&json).unwrap();

        assert_eq!(back.catalog(), catalog);
        assert_eq!(back.data_file, Some(PathBuf::from("usage.csv")));
        assert_eq!(back.main_window, Some(WindowSpec::default()));
    }

    #[test]
    fn default_catalog_is_not_persisted() {
        let state = State::from_parts(Theme::default(), &SeriesCatalog::default(), None, None);
        assert!(state.catalog.is_none());
    }
}
