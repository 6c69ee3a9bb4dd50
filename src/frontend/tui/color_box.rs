//! Solid color box with a centered number label.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

pub struct ColorBox<'a> {
    number: u8,
    color: &'a str,
    show_label: bool,
}

impl<'a> ColorBox<'a> {
    pub fn new(number: u8, color: &'a str) -> Self {
        Self {
            number,
            color,
            show_label: true,
        }
    }

    pub fn show_label(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }

    /// Parse a hex color string to ratatui Color
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return Color::DarkGray;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(128);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(128);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(128);

        Color::Rgb(r, g, b)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        let background = Self::parse_color(self.color);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].set_char(' ').set_bg(background);
            }
        }

        if !self.show_label {
            return;
        }

        let label = self.number.to_string();
        let label_width = label.len() as u16;
        if label_width > area.width {
            return;
        }
        let x = area.x + (area.width - label_width) / 2;
        let y = area.y + area.height / 2;
        let style = Style::default()
            .fg(Color::White)
            .bg(background)
            .add_modifier(Modifier::BOLD);
        buf.set_string(x, y, label, style);
    }
}
