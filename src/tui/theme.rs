//! Color themes for the TUI
//!
//! Palettes follow Catppuccin, Dracula and Nord. Measure colors (ratings,
//! quality gate levels) are derived from the accent colors.

use ratatui::style::Color;

use crate::config::TuiTheme;
use crate::models::MetricType;

/// A complete color theme for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub surface0: Color, // Selected row background
    pub surface1: Color, // Borders, separators
    pub text: Color,
    pub subtext0: Color, // Dimmed text, best values
    pub blue: Color,     // Headers, focus
    pub green: Color,    // Good ratings, passed gates
    pub yellow: Color,   // Middling ratings, warnings
    pub red: Color,      // Bad ratings, failures
    pub mauve: Color,    // Titles
    pub peach: Color,    // Branch labels
}

impl Theme {
    pub fn for_config(theme: TuiTheme) -> Self {
        match theme {
            TuiTheme::CatppuccinMocha => CATPPUCCIN_MOCHA,
            TuiTheme::CatppuccinLatte => CATPPUCCIN_LATTE,
            TuiTheme::Dracula => DRACULA,
            TuiTheme::Nord => NORD,
        }
    }

    /// Color for a raw measure value, when its type carries a judgement
    pub fn measure_color(&self, value: &str, metric_type: MetricType) -> Color {
        match metric_type {
            MetricType::Rating => match value.parse::<f64>().map(|n| n.round() as i64) {
                Ok(1) => self.green,
                Ok(2) => self.blue,
                Ok(3) => self.yellow,
                Ok(4) => self.peach,
                Ok(5) => self.red,
                _ => self.text,
            },
            MetricType::Level => match value {
                "OK" => self.green,
                "WARN" => self.yellow,
                "ERROR" => self.red,
                _ => self.text,
            },
            _ => self.text,
        }
    }
}

/// Catppuccin Mocha - Dark theme with warm pastels
pub const CATPPUCCIN_MOCHA: Theme = Theme {
    name: "Catppuccin Mocha",
    surface0: Color::Rgb(49, 50, 68),
    surface1: Color::Rgb(69, 71, 90),
    text: Color::Rgb(205, 214, 244),
    subtext0: Color::Rgb(166, 173, 200),
    blue: Color::Rgb(137, 180, 250),
    green: Color::Rgb(166, 227, 161),
    yellow: Color::Rgb(249, 226, 175),
    red: Color::Rgb(243, 139, 168),
    mauve: Color::Rgb(203, 166, 247),
    peach: Color::Rgb(250, 179, 135),
};

/// Catppuccin Latte - Light theme with warm pastels
pub const CATPPUCCIN_LATTE: Theme = Theme {
    name: "Catppuccin Latte",
    surface0: Color::Rgb(220, 224, 232),
    surface1: Color::Rgb(188, 192, 204),
    text: Color::Rgb(76, 79, 105),
    subtext0: Color::Rgb(108, 111, 133),
    blue: Color::Rgb(30, 102, 245),
    green: Color::Rgb(64, 160, 43),
    yellow: Color::Rgb(223, 142, 29),
    red: Color::Rgb(210, 15, 57),
    mauve: Color::Rgb(136, 57, 239),
    peach: Color::Rgb(254, 100, 11),
};

/// Dracula - Dark theme with vibrant colors
pub const DRACULA: Theme = Theme {
    name: "Dracula",
    surface0: Color::Rgb(68, 71, 90),
    surface1: Color::Rgb(98, 114, 164),
    text: Color::Rgb(248, 248, 242),
    subtext0: Color::Rgb(189, 147, 249),
    blue: Color::Rgb(139, 233, 253),
    green: Color::Rgb(80, 250, 123),
    yellow: Color::Rgb(241, 250, 140),
    red: Color::Rgb(255, 85, 85),
    mauve: Color::Rgb(189, 147, 249),
    peach: Color::Rgb(255, 184, 108),
};

/// Nord - Arctic, bluish color palette
pub const NORD: Theme = Theme {
    name: "Nord",
    surface0: Color::Rgb(59, 66, 82),
    surface1: Color::Rgb(76, 86, 106),
    text: Color::Rgb(236, 239, 244),
    subtext0: Color::Rgb(216, 222, 233),
    blue: Color::Rgb(136, 192, 208),
    green: Color::Rgb(163, 190, 140),
    yellow: Color::Rgb(235, 203, 139),
    red: Color::Rgb(191, 97, 106),
    mauve: Color::Rgb(180, 142, 173),
    peach: Color::Rgb(208, 135, 112),
};
