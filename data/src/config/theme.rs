use iced_core::{
    Color,
    theme::{Custom, Palette},
};
use palette::{FromColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

const DEFAULT_THEME_NAME: &str = "Paper";

#[derive(Debug, Clone)]
pub struct Theme(pub iced_core::Theme);

#[derive(Serialize, Deserialize)]
struct SerTheme {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    palette: Option<Palette>,
}

impl Default for Theme {
    fn default() -> Self {
        Self(iced_core::Theme::Custom(paper_theme().into()))
    }
}

impl From<Theme> for iced_core::Theme {
    fn from(val: Theme) -> Self {
        val.0
    }
}

/// Light theme matching the white tooltip card and gray axis ink.
pub fn paper_theme() -> Custom {
    Custom::new(
        DEFAULT_THEME_NAME.to_string(),
        Palette {
            background: Color::from_rgb8(255, 255, 255),
            text: Color::from_rgb8(51, 51, 51),
            primary: Color::from_rgb8(55, 126, 184),
            success: Color::from_rgb8(77, 175, 74),
            danger: Color::from_rgb8(228, 26, 28),
            warning: Color::from_rgb8(255, 127, 0),
        },
    )
}

fn builtin_by_name(name: &str) -> Option<iced_core::Theme> {
    let theme = match name {
        "paper" => Theme::default().0,
        "light" => iced_core::Theme::Light,
        "dark" => iced_core::Theme::Dark,
        "dracula" => iced_core::Theme::Dracula,
        "nord" => iced_core::Theme::Nord,
        "solarized_light" => iced_core::Theme::SolarizedLight,
        "solarized_dark" => iced_core::Theme::SolarizedDark,
        "gruvbox_light" => iced_core::Theme::GruvboxLight,
        "gruvbox_dark" => iced_core::Theme::GruvboxDark,
        "tokyo_night" => iced_core::Theme::TokyoNight,
        "tokyo_night_light" => iced_core::Theme::TokyoNightLight,
        _ => return None,
    };
    Some(theme)
}

fn builtin_name(theme: &iced_core::Theme) -> Option<&'static str> {
    let name = match theme {
        iced_core::Theme::Light => "light",
        iced_core::Theme::Dark => "dark",
        iced_core::Theme::Dracula => "dracula",
        iced_core::Theme::Nord => "nord",
        iced_core::Theme::SolarizedLight => "solarized_light",
        iced_core::Theme::SolarizedDark => "solarized_dark",
        iced_core::Theme::GruvboxLight => "gruvbox_light",
        iced_core::Theme::GruvboxDark => "gruvbox_dark",
        iced_core::Theme::TokyoNight => "tokyo_night",
        iced_core::Theme::TokyoNightLight => "tokyo_night_light",
        iced_core::Theme::Custom(custom) if custom.to_string() == DEFAULT_THEME_NAME => "paper",
        _ => return None,
    };
    Some(name)
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let Some(name) = builtin_name(&self.0) {
            return name.serialize(serializer);
        }

        SerTheme {
            name: "custom".to_string(),
            palette: Some(self.0.palette()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value =
            serde_json::Value::deserialize(deserializer).map_err(serde::de::Error::custom)?;

        if let Some(s) = value.as_str() {
            return builtin_by_name(s)
                .map(Theme)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid theme: {s}")));
        }

        let serialized = SerTheme::deserialize(value).map_err(serde::de::Error::custom)?;

        match (serialized.name.as_str(), serialized.palette) {
            ("custom", Some(palette)) => Ok(Theme(iced_core::Theme::Custom(
                Custom::new("Custom".to_string(), palette).into(),
            ))),
            ("custom", None) => Err(serde::de::Error::custom(
                "Custom theme missing palette data",
            )),
            (name, _) => builtin_by_name(name)
                .map(Theme)
                .ok_or_else(|| serde::de::Error::custom("Invalid theme")),
        }
    }
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    if hex.len() != 7 && hex.len() != 9 {
        return None;
    }

    let digits = hex.strip_prefix('#')?;
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };

    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let a = if digits.len() == 8 { channel(6)? } else { u8::MAX };

    Some(Color::from_rgba8(r, g, b, f32::from(a) / 255.0))
}

pub fn color_to_hex(color: Color) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(9);
    let [r, g, b, a] = color.into_rgba8();

    let _ = write!(&mut hex, "#{r:02X}{g:02X}{b:02X}");
    if a < u8::MAX {
        let _ = write!(&mut hex, "{a:02X}");
    }

    hex
}

fn to_hsl(color: Color) -> Hsl {
    Hsl::from_color(Srgb::new(color.r, color.g, color.b))
}

fn from_hsl(hsl: Hsl, alpha: f32) -> Color {
    let rgb = Srgb::from_color(hsl);
    Color {
        r: rgb.red.clamp(0.0, 1.0),
        g: rgb.green.clamp(0.0, 1.0),
        b: rgb.blue.clamp(0.0, 1.0),
        a: alpha,
    }
}

pub fn darken(color: Color, amount: f32) -> Color {
    let mut hsl = to_hsl(color);
    hsl.lightness = (hsl.lightness - amount).max(0.0);
    from_hsl(hsl, color.a)
}

pub fn lighten(color: Color, amount: f32) -> Color {
    let mut hsl = to_hsl(color);
    hsl.lightness = (hsl.lightness + amount).min(1.0);
    from_hsl(hsl, color.a)
}

pub fn is_dark(color: Color) -> bool {
    let brightness = (color.r * 299.0 + color.g * 587.0 + color.b * 114.0) / 1000.0;
    brightness < 0.5
}
