use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::task::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Glyph for the toggle button: shows the theme you would switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Colours the window is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub surface: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub border: Color32,
    pub error: Color32,
    pub high: Color32,
    pub medium: Color32,
    pub low: Color32,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color32::from_rgb(239, 241, 245),
                surface: Color32::from_rgb(255, 255, 255),
                foreground: Color32::from_rgb(76, 79, 105),
                muted: Color32::from_rgb(140, 143, 161),
                accent: Color32::from_rgb(30, 102, 245),
                border: Color32::from_rgb(204, 208, 218),
                error: Color32::from_rgb(210, 15, 57),
                high: Color32::from_rgb(210, 15, 57),
                medium: Color32::from_rgb(223, 142, 29),
                low: Color32::from_rgb(64, 160, 43),
            },
            // Catppuccin-like
            Theme::Dark => Self {
                background: Color32::from_rgb(26, 27, 38),
                surface: Color32::from_rgb(36, 39, 58),
                foreground: Color32::from_rgb(205, 214, 244),
                muted: Color32::from_rgb(166, 173, 200),
                accent: Color32::from_rgb(116, 199, 236),
                border: Color32::from_rgb(88, 91, 112),
                error: Color32::from_rgb(243, 139, 168),
                high: Color32::from_rgb(243, 139, 168),
                medium: Color32::from_rgb(249, 226, 175),
                low: Color32::from_rgb(166, 227, 161),
            },
        }
    }

    pub fn priority(&self, priority: Priority) -> Color32 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    /// Builds egui visuals for `theme` starting from egui's own light/dark base.
    pub fn visuals(&self, theme: Theme) -> egui::Visuals {
        let mut visuals = match theme {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        };
        visuals.window_fill = self.background;
        visuals.panel_fill = self.background;
        visuals.extreme_bg_color = self.surface;
        visuals.faint_bg_color = self.border;
        visuals.override_text_color = Some(self.foreground);
        visuals.selection.bg_fill = self.accent;
        visuals.hyperlink_color = self.accent;
        visuals
    }
}
