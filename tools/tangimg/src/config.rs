use std::path::PathBuf;

/// NES palette indices used when rendering the menu and by the loader's cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuColors {
    /// Fill for pages without a background image.
    pub background: u8,
    pub cursor_background: u8,
    pub cursor_foreground: u8,
    /// Rom names.
    pub bright_text: u8,
    /// Page number.
    pub dark_text: u8,
}

impl Default for MenuColors {
    fn default() -> Self {
        Self {
            background: 0x0F,
            cursor_background: 0x11,
            cursor_foreground: 0x30,
            bright_text: 0x30,
            dark_text: 0x10,
        }
    }
}

/// Everything one `build` run needs.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub output: Option<PathBuf>,
    pub roms: Vec<PathBuf>,
    /// Order roms by numeric prefix, then name, before placing them.
    pub sort: bool,
    /// 256x240 image drawn behind every page.
    pub background: Option<PathBuf>,
    pub colors: MenuColors,
}

/// Parses a palette index written as decimal or `0x` hex.
pub fn parse_color(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    let value = parsed.map_err(|e| format!("invalid color index '{}': {}", s, e))?;
    if value > 0x3F {
        return Err(format!("color index {:#04x} is outside the 64-entry palette", value));
    }
    Ok(value)
}
