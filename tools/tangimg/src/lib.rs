//! tangimg - NESTang SD card image builder
//!
//! Packs a list of `.nes` files behind a paged navigation menu:
//! - layout: sector placement of pages and roms
//! - meta: the 512-byte control record in front of every page
//! - page: menu page rendering (background + font)
//! - writer: streams the whole image
//! - legacy: the old single-rom packer

pub mod background;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod legacy;
pub mod meta;
pub mod page;
pub mod pixels;
pub mod sort;
pub mod writer;

pub use config::{BuildConfig, MenuColors};
pub use error::{Error, Result};

/// Size of one addressable unit on the card.
pub const SECTOR_SIZE: usize = 512;

/// Roms listed on one menu page.
pub const ENTRIES_PER_PAGE: usize = 20;

/// Sectors taken by one rendered page (240 rows of 256 one-byte pixels).
pub const PAGE_IMAGE_SECTORS: u32 = (pixels::WIDTH * pixels::HEIGHT / SECTOR_SIZE) as u32;

/// Stride between consecutive meta sectors: the meta sector plus its page image.
pub const META_MENU_SECTORS: u32 = 1 + PAGE_IMAGE_SECTORS;

/// Largest value a 24-bit record field holds.
pub const MAX_24BIT: u32 = 0xFF_FFFF;

/// Number of sectors needed to hold `len` bytes.
pub fn sectors_for(len: u64) -> u64 {
    len.div_ceil(SECTOR_SIZE as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_one_meta_plus_120_image_sectors() {
        assert_eq!(PAGE_IMAGE_SECTORS, 120);
        assert_eq!(META_MENU_SECTORS, 121);
    }

    #[test]
    fn sector_rounding() {
        assert_eq!(sectors_for(0), 0);
        assert_eq!(sectors_for(1), 1);
        assert_eq!(sectors_for(512), 1);
        assert_eq!(sectors_for(513), 2);
        assert_eq!(sectors_for(40976), 81);
    }
}
