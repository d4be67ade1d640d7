use data::config::theme::{darken, is_dark, lighten};
use iced::font::{Font, Weight};
use iced::theme::palette::Extended;
use iced::widget::{canvas, container, text};
use iced::{Border, Color, Theme};

pub const TEXT_FONT: Font = Font::DEFAULT;
pub const BOLD_FONT: Font = Font {
    weight: Weight::Bold,
    ..Font::DEFAULT
};

pub const TOOLTIP_BACKGROUND: Color = Color::WHITE;
pub const TOOLTIP_BORDER: Color = Color::from_rgb8(0xaa, 0xaa, 0xaa);
pub const TOOLTIP_TEXT: Color = Color::from_rgb8(0x33, 0x33, 0x33);
pub const TOOLTIP_RADIUS: f32 = 4.0;

pub fn axis_stroke(palette: &Extended) -> canvas::Stroke<'static> {
    canvas::Stroke::default()
        .with_color(axis_ink(palette))
        .with_width(1.0)
}

pub fn axis_ink(palette: &Extended) -> Color {
    palette.background.base.text.scale_alpha(0.75)
}

/// Outline of the region under the pointer, contrasted against the page.
pub fn hovered_outline(color: Color, palette: &Extended) -> canvas::Stroke<'static> {
    let outline = if is_dark(palette.background.base.color) {
        lighten(color, 0.25)
    } else {
        darken(color, 0.2)
    };

    canvas::Stroke::default().with_color(outline).with_width(1.5)
}

pub fn tooltip_border() -> canvas::Stroke<'static> {
    canvas::Stroke::default()
        .with_color(TOOLTIP_BORDER)
        .with_width(1.0)
}

pub fn chart_container(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(palette.background.base.color.into()),
        border: Border {
            width: 1.0,
            color: palette.background.strong.color.scale_alpha(0.4),
            ..Border::default()
        },
        ..Default::default()
    }
}

pub fn status_text(theme: &Theme, is_error: bool) -> text::Style {
    let palette = theme.extended_palette();

    text::Style {
        color: Some(if is_error {
            palette.danger.base.color
        } else {
            palette.background.weak.text
        }),
    }
}
