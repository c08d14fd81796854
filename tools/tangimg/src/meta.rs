//! Meta sector: the 512-byte record in front of every menu page.
//!
//! ```text
//! 0..4    "TANG"
//! 4..7    previous page's meta sector (u24 LE)
//! 7..10   next page's meta sector (u24 LE)
//! 10      entry count
//! 11      cursor background color
//! 12      cursor foreground color
//! 16..    entries, 8 bytes each: column, row, start sector (u24 LE), length (u24 LE)
//! ```
//! Everything else is zero.

use crate::config::MenuColors;
use crate::error::{Error, Result};
use crate::layout::{Layout, RomEntry};
use crate::{ENTRIES_PER_PAGE, SECTOR_SIZE};

pub const TAG: &[u8; 4] = b"TANG";

const ENTRIES_OFFSET: usize = 16;
const ENTRY_SIZE: usize = 8;

/// Text column of every rom name. The loader draws its cursor from the same
/// row/column values, so the menu renderer must use these too.
pub const ENTRY_COLUMN: u8 = 2;
/// Text row of the first rom name on a page.
pub const FIRST_ENTRY_ROW: u8 = 4;
pub const ENTRY_ROW_STRIDE: u8 = 1;

/// Text cell (column, row) of the `index`th entry on a page.
pub fn entry_cell(index: usize) -> (u8, u8) {
    (ENTRY_COLUMN, FIRST_ENTRY_ROW + index as u8 * ENTRY_ROW_STRIDE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaEntry {
    pub column: u8,
    pub row: u8,
    pub start_sector: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSector {
    pub prev_meta: u32,
    pub next_meta: u32,
    pub cursor_background: u8,
    pub cursor_foreground: u8,
    pub entries: Vec<MetaEntry>,
}

impl MetaSector {
    /// Builds the record for page `page` of `page_count`.
    ///
    /// The first page links back to itself and the last page forward to itself,
    /// so moving past either end leaves the cursor where it is.
    pub fn for_page(page: u32, roms: &[RomEntry], page_count: u32, colors: &MenuColors) -> Result<Self> {
        if roms.len() > ENTRIES_PER_PAGE {
            return Err(Error::TooManyEntries { count: roms.len() });
        }

        let prev_page = page.saturating_sub(1);
        let next_page = (page + 1).min(page_count.saturating_sub(1).max(page));

        let entries = roms
            .iter()
            .enumerate()
            .map(|(i, rom)| {
                let (column, row) = entry_cell(i);
                MetaEntry {
                    column,
                    row,
                    start_sector: rom.start_sector,
                    length: rom.byte_length,
                }
            })
            .collect();

        Ok(Self {
            prev_meta: Layout::meta_sector(prev_page),
            next_meta: Layout::meta_sector(next_page),
            cursor_background: colors.cursor_background,
            cursor_foreground: colors.cursor_foreground,
            entries,
        })
    }

    pub fn to_bytes(&self) -> [u8; SECTOR_SIZE] {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[0..4].copy_from_slice(TAG);
        put_u24(&mut sector[4..7], self.prev_meta);
        put_u24(&mut sector[7..10], self.next_meta);
        sector[10] = self.entries.len() as u8;
        sector[11] = self.cursor_background;
        sector[12] = self.cursor_foreground;

        let slots = sector[ENTRIES_OFFSET..].chunks_exact_mut(ENTRY_SIZE);
        for (slot, entry) in slots.zip(&self.entries) {
            slot[0] = entry.column;
            slot[1] = entry.row;
            put_u24(&mut slot[2..5], entry.start_sector);
            put_u24(&mut slot[5..8], entry.length);
        }
        sector
    }
}

fn put_u24(dst: &mut [u8], value: u32) {
    dst.copy_from_slice(&value.to_le_bytes()[..3]);
}
