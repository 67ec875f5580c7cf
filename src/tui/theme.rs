use ratatui::style::{Color, Style};

use crate::model::{RiskBand, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Cell being edited
    pub edit_bg: Color,
    /// Risk band cells: (foreground, background)
    pub band_low: (Color, Color),
    pub band_medium: (Color, Color),
    pub band_high: (Color, Color),
    pub band_extreme: (Color, Color),
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            edit_bg: Color::Rgb(0x1F, 0x1A, 0x3A),
            band_low: (Color::Rgb(0x06, 0x5F, 0x46), Color::Rgb(0xA7, 0xF3, 0xD0)),
            band_medium: (Color::Rgb(0x9A, 0x34, 0x12), Color::Rgb(0xFD, 0xE6, 0x8A)),
            band_high: (Color::Rgb(0x92, 0x40, 0x0E), Color::Rgb(0xFC, 0xD3, 0x4D)),
            band_extreme: (Color::Rgb(0x99, 0x1B, 0x1B), Color::Rgb(0xFC, 0xA5, 0xA5)),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        // Apply color overrides from [ui.colors]
        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "cyan" => theme.cyan = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    "edit_bg" => theme.edit_bg = color,
                    "band_low" => theme.band_low.1 = color,
                    "band_medium" => theme.band_medium.1 = color,
                    "band_high" => theme.band_high.1 = color,
                    "band_extreme" => theme.band_extreme.1 = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Cell style for a risk band
    pub fn band_style(&self, band: RiskBand) -> Style {
        let (fg, bg) = match band {
            RiskBand::Low => self.band_low,
            RiskBand::Medium => self.band_medium,
            RiskBand::High => self.band_high,
            RiskBand::Extreme => self.band_extreme,
        };
        Style::default().fg(fg).bg(bg)
    }
}
