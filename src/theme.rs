//! Dark/light theme
//!
//! The mode is a persisted user preference (`"dark"` / `"light"`); each mode
//! resolves to a palette embedded at compile time from `themes/*.yaml`.

use serde::Deserialize;

pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// The two display modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    #[default]
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Value stored in the snapshot store
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ThemeMode::Dark),
            "light" => Some(ThemeMode::Light),
            _ => None,
        }
    }

    fn yaml(&self) -> &'static str {
        match self {
            ThemeMode::Dark => DARK_YAML,
            ThemeMode::Light => LIGHT_YAML,
        }
    }

    /// Resolved palette; an unreadable embedded theme falls back to the
    /// hard-coded light colors
    pub fn palette(&self) -> Palette {
        Palette::from_yaml(self.yaml()).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {} theme: {}", self.as_str(), e);
            Palette::fallback()
        })
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from "#RRGGBB"
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
        };
        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ThemeData {
    name: String,
    colors: ColorData,
}

#[derive(Debug, Clone, Deserialize)]
struct ColorData {
    desk: String,
    page: String,
    text: String,
    accent: String,
    muted: String,
}

/// Colors used by the preview page and the terminal status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    /// Background behind the pages
    pub desk: Color,
    pub page: Color,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Ok(Palette {
            name: data.name,
            desk: Color::from_hex(&data.colors.desk)?,
            page: Color::from_hex(&data.colors.page)?,
            text: Color::from_hex(&data.colors.text)?,
            accent: Color::from_hex(&data.colors.accent)?,
            muted: Color::from_hex(&data.colors.muted)?,
        })
    }

    fn fallback() -> Self {
        Palette {
            name: "Fallback".to_string(),
            desk: Color::rgb(0xE8, 0xEA, 0xED),
            page: Color::rgb(0xFF, 0xFF, 0xFF),
            text: Color::rgb(0x1F, 0x23, 0x28),
            accent: Color::rgb(0x09, 0x69, 0xDA),
            muted: Color::rgb(0x65, 0x6D, 0x76),
        }
    }
}
