//! Color theme system for revue.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! revue renders. Two built-in themes are provided:
//!
//! - `dark` — ANSI 16 colors, works on any terminal including 256-color SSH sessions.
//! - `catppuccin_mocha` — Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

use revue_core::presenter::{ScoreBand, SeverityBand};

/// All color values used across revue's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the currently focused panel.
    pub border_active: Color,
    /// Border color for unfocused panels.
    pub border_inactive: Color,

    // Score and severity bands
    pub success: Color,
    pub warning: Color,
    pub critical: Color,
    /// Low-severity badge.
    pub secondary: Color,

    // Text
    /// Accent for headings, the "Suggested Fix" label and the active tab.
    pub primary: Color,
    /// De-emphasised text (descriptions, hints, line numbers).
    pub muted: Color,
    pub text: Color,
    /// Skeleton bars shown while analysing.
    pub skeleton: Color,

    /// Particle tints for the animated background.
    pub particles: [Color; 3],

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Mode indicator color when in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color when entering a path.
    pub status_mode_insert: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            success: Color::Green,
            warning: Color::Yellow,
            critical: Color::Red,
            secondary: Color::Blue,

            primary: Color::Cyan,
            muted: Color::DarkGray,
            text: Color::Reset,
            skeleton: Color::DarkGray,

            particles: [Color::Blue, Color::Magenta, Color::Cyan],

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let red = Color::Rgb(243, 139, 168);      // #f38ba8
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let blue = Color::Rgb(137, 180, 250);     // #89b4fa
        let teal = Color::Rgb(148, 226, 213);     // #94e2d5
        let mauve = Color::Rgb(203, 166, 247);    // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let surface2 = Color::Rgb(88, 91, 112);   // #585b70
        let base = Color::Rgb(30, 30, 46);        // #1e1e2e
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            success: green,
            warning: yellow,
            critical: red,
            secondary: blue,

            primary: lavender,
            muted: overlay1,
            text,
            skeleton: surface2,

            particles: [blue, mauve, teal],

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    pub fn score_color(&self, band: ScoreBand) -> Color {
        match band {
            ScoreBand::Success => self.success,
            ScoreBand::Warning => self.warning,
            ScoreBand::Critical => self.critical,
        }
    }

    pub fn severity_color(&self, band: SeverityBand) -> Color {
        match band {
            SeverityBand::Destructive => self.critical,
            SeverityBand::Warning => self.warning,
            SeverityBand::Secondary => self.secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized").border_active, Theme::dark().border_active);
    }

    #[test]
    fn bands_map_to_semantic_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.score_color(ScoreBand::Success), Color::Green);
        assert_eq!(theme.score_color(ScoreBand::Warning), Color::Yellow);
        assert_eq!(theme.severity_color(SeverityBand::Destructive), Color::Red);
    }
}
