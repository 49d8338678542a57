use ansi_term::{Color, Style};
use serde::Deserialize;

/// Accent colour of a part. Closed set so content cannot name arbitrary styles.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Green,
    Blue,
    Purple,
    Orange,
    Red,
    Teal,
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn accent(&self, accent: Accent) -> Style {
        if !self.color {
            return Style::new();
        }
        match accent {
            Accent::Green => Color::Green.bold(),
            Accent::Blue => Color::Blue.bold(),
            Accent::Purple => Color::Purple.bold(),
            Accent::Orange => Color::Fixed(208).bold(),
            Accent::Red => Color::Red.bold(),
            Accent::Teal => Color::Cyan.bold(),
        }
    }

    pub fn correct(&self) -> Style {
        self.plain_or(Color::Green.normal())
    }

    pub fn wrong(&self) -> Style {
        self.plain_or(Color::Red.normal())
    }

    pub fn progress(&self) -> Style {
        self.plain_or(Color::Yellow.normal())
    }

    pub fn dim(&self) -> Style {
        self.plain_or(Style::new().dimmed())
    }

    fn plain_or(&self, style: Style) -> Style {
        if self.color {
            style
        } else {
            Style::new()
        }
    }
}
