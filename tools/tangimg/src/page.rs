//! Renders one menu page.

use tracing::{debug, warn};

use crate::background::Background;
use crate::config::MenuColors;
use crate::font::{self, PLACEHOLDER, TEXT_COLUMNS};
use crate::layout::RomEntry;
use crate::meta::{ENTRY_COLUMN, entry_cell};
use crate::pixels::PixelBuffer;

/// Characters of a rom name that fit on screen.
pub const MAX_NAME_WIDTH: usize = TEXT_COLUMNS - ENTRY_COLUMN as usize - 2;

pub const PAGE_NUMBER_ROW: usize = 27;
/// The page number is right-aligned against this column.
pub const PAGE_NUMBER_LAST_COLUMN: usize = 30;

/// On-screen name for a rom: no extension, ASCII only, at most [`MAX_NAME_WIDTH`] characters.
pub fn menu_label(rom: &RomEntry) -> String {
    let name = rom.display_name();
    let label: String = name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { PLACEHOLDER })
        .take(MAX_NAME_WIDTH)
        .collect();

    if name.chars().count() > MAX_NAME_WIDTH {
        warn!("name of {} truncated to \"{}\"", rom.source_path.display(), label);
    }
    label
}

pub struct PageComposer<'a> {
    background: &'a Background,
    colors: MenuColors,
}

impl<'a> PageComposer<'a> {
    pub fn new(background: &'a Background, colors: MenuColors) -> Self {
        Self { background, colors }
    }

    /// Draws page `page` (0-based) of `page_count` listing `roms`.
    pub fn compose(&self, page: u32, roms: &[RomEntry], page_count: u32) -> PixelBuffer {
        let mut buf = self.background.fresh_buffer();

        for (i, rom) in roms.iter().enumerate() {
            let (column, row) = entry_cell(i);
            font::draw_text(
                &mut buf,
                row as usize,
                column as usize,
                &menu_label(rom),
                self.colors.bright_text,
            );
        }

        let number = (page + 1).to_string();
        let column = (PAGE_NUMBER_LAST_COLUMN + 1).saturating_sub(number.len());
        font::draw_text(&mut buf, PAGE_NUMBER_ROW, column, &number, self.colors.dark_text);

        debug!("composed page {}/{} with {} entries", page + 1, page_count, roms.len());
        buf
    }
}
