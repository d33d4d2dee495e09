use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::task::Quadrant;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub q1: Color,
    pub q2: Color,
    pub q3: Color,
    pub q4: Color,
    pub backlog: Color,
    pub green: Color,
    pub red: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Per-tag colors
    pub tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut tag_colors = HashMap::new();
        tag_colors.insert("Work".into(), Color::Rgb(0x60, 0xA5, 0xFA));
        tag_colors.insert("Home".into(), Color::Rgb(0x34, 0xD3, 0x99));
        tag_colors.insert("Health".into(), Color::Rgb(0xF8, 0x71, 0x71));
        tag_colors.insert("Money".into(), Color::Rgb(0xFB, 0xBF, 0x24));
        tag_colors.insert("Admin".into(), Color::Rgb(0xA7, 0x8B, 0xFA));

        Theme {
            background: Color::Rgb(0x0F, 0x17, 0x2A),
            panel: Color::Rgb(0x1E, 0x29, 0x3B),
            text: Color::Rgb(0xCB, 0xD5, 0xE1),
            text_bright: Color::Rgb(0xF8, 0xFA, 0xFC),
            highlight: Color::Rgb(0xA8, 0x55, 0xF7),
            dim: Color::Rgb(0x64, 0x74, 0x8B),
            q1: Color::Rgb(0xEF, 0x44, 0x44),
            q2: Color::Rgb(0x3B, 0x82, 0xF6),
            q3: Color::Rgb(0xEA, 0xB3, 0x08),
            q4: Color::Rgb(0x94, 0xA3, 0xB8),
            backlog: Color::Rgb(0x9C, 0xA3, 0xAF),
            green: Color::Rgb(0x22, 0xC5, 0x5E),
            red: Color::Rgb(0xF8, 0x71, 0x71),
            selection_bg: Color::Rgb(0x3B, 0x1D, 0x5C),
            selection_border: Color::Rgb(0xC0, 0x84, 0xFC),
            tag_colors,
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
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "panel" => theme.panel = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "q1" => theme.q1 = color,
                "q2" => theme.q2 = color,
                "q3" => theme.q3 = color,
                "q4" => theme.q4 = color,
                "backlog" => theme.backlog = color,
                "green" => theme.green = color,
                "red" => theme.red = color,
                "selection_bg" => theme.selection_bg = color,
                "selection_border" => theme.selection_border = color,
                _ => {}
            }
        }

        for (tag, value) in &ui.tag_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.tag_colors.insert(tag.clone(), color);
            }
        }

        theme
    }

    /// Get the color for a tag, falling back to the dim text color
    pub fn tag_color(&self, tag: &str) -> Color {
        self.tag_colors.get(tag).copied().unwrap_or(self.dim)
    }

    /// Accent color of a quadrant's pane
    pub fn quadrant_color(&self, quadrant: Quadrant) -> Color {
        match quadrant {
            Quadrant::Q1 => self.q1,
            Quadrant::Q2 => self.q2,
            Quadrant::Q3 => self.q3,
            Quadrant::Q4 => self.q4,
            Quadrant::Backlog => self.backlog,
        }
    }
}
