use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Highlight colours a run can carry, mirroring the WordprocessingML
/// `w:highlight` palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightColor {
    Black,
    Blue,
    Turquoise,
    BrightGreen,
    Pink,
    Red,
    Yellow,
    White,
    DarkBlue,
    Teal,
    Green,
    Violet,
    DarkRed,
    DarkYellow,
    Gray25,
    Gray50,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 16] = [
        HighlightColor::Black,
        HighlightColor::Blue,
        HighlightColor::Turquoise,
        HighlightColor::BrightGreen,
        HighlightColor::Pink,
        HighlightColor::Red,
        HighlightColor::Yellow,
        HighlightColor::White,
        HighlightColor::DarkBlue,
        HighlightColor::Teal,
        HighlightColor::Green,
        HighlightColor::Violet,
        HighlightColor::DarkRed,
        HighlightColor::DarkYellow,
        HighlightColor::Gray25,
        HighlightColor::Gray50,
    ];

    /// Kebab-case name, as accepted by [`FromStr`] and used in JSON.
    pub fn name(self) -> &'static str {
        match self {
            HighlightColor::Black => "black",
            HighlightColor::Blue => "blue",
            HighlightColor::Turquoise => "turquoise",
            HighlightColor::BrightGreen => "bright-green",
            HighlightColor::Pink => "pink",
            HighlightColor::Red => "red",
            HighlightColor::Yellow => "yellow",
            HighlightColor::White => "white",
            HighlightColor::DarkBlue => "dark-blue",
            HighlightColor::Teal => "teal",
            HighlightColor::Green => "green",
            HighlightColor::Violet => "violet",
            HighlightColor::DarkRed => "dark-red",
            HighlightColor::DarkYellow => "dark-yellow",
            HighlightColor::Gray25 => "gray25",
            HighlightColor::Gray50 => "gray50",
        }
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown highlight color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for HighlightColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        HighlightColor::ALL
            .into_iter()
            .find(|color| color.name() == wanted)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Underline styles carried by a run's font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Underline {
    Single,
    Double,
    Dotted,
    Wavy,
}

/// Break placed after a run's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakType {
    Line,
    Page,
    Column,
}

/// Character formatting of a run. `None` means "inherit from style".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<Underline>,
    /// Font size in half-points (`w:sz`).
    pub size: Option<u16>,
    /// Bold for complex-script text (`w:bCs`).
    pub cs_bold: Option<bool>,
    /// Text colour as an RGB hex string, e.g. `"FF0000"`.
    pub color: Option<String>,
}

/// A run of text sharing one set of character formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Run {
    pub text: String,
    /// Character style name.
    pub style: Option<String>,
    pub font: Font,
    pub highlight: Option<HighlightColor>,
    #[serde(rename = "break")]
    pub break_type: Option<BreakType>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A new run with `text` and this run's style and font. Neither the
    /// highlight nor the break is copied.
    pub fn with_formatting_of(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: self.style.clone(),
            font: self.font.clone(),
            highlight: None,
            break_type: None,
        }
    }

    /// Number of characters (not bytes) in the run's text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn add_break(&mut self, break_type: BreakType) {
        self.break_type = Some(break_type);
    }
}
