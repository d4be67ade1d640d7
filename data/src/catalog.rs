use crate::config::theme::{color_to_hex, hex_to_color};

use iced_core::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models tracked by default, in stacking order.
pub const LLM_MODELS: [(&str, &str); 5] = [
    ("GPT-4", "#e41a1c"),
    ("Gemini", "#377eb8"),
    ("PaLM-2", "#4daf4a"),
    ("Claude", "#984ea3"),
    ("LLaMA-3.1", "#ff7f00"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub name: String,
    #[serde(serialize_with = "ser_hex", deserialize_with = "de_hex")]
    pub color: Color,
}

impl SeriesEntry {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Ordered list of tracked series. Order decides stacking and legend order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesCatalog {
    entries: Vec<SeriesEntry>,
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        Self::llm_models()
    }
}

impl SeriesCatalog {
    pub fn new(entries: Vec<SeriesEntry>) -> Self {
        Self { entries }
    }

    pub fn llm_models() -> Self {
        let entries = LLM_MODELS
            .iter()
            .map(|(name, hex)| SeriesEntry::new(*name, hex_to_color(hex).unwrap_or(Color::BLACK)))
            .collect();

        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn color_of(&self, name: &str) -> Option<Color> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn ser_hex<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    color_to_hex(*color).serialize(serializer)
}

fn de_hex<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let hex = String::deserialize(deserializer)?;
    hex_to_color(&hex).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {hex}")))
}
