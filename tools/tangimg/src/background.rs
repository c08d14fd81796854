//! Page backgrounds.
//!
//! An image asset is decoded once, quantized to the NES palette and then
//! cloned for every page.

use std::path::Path;

use image::GenericImageView;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pixels::{HEIGHT, PixelBuffer, WIDTH};

#[derive(Debug, Clone)]
pub enum Background {
    Solid(u8),
    Image(PixelBuffer),
}

impl Background {
    pub fn load(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| Error::Background {
            path: path.to_path_buf(),
            source,
        })?;

        let (width, height) = img.dimensions();
        if (width as usize, height as usize) != (WIDTH, HEIGHT) {
            return Err(Error::BackgroundSize {
                path: path.to_path_buf(),
                width,
                height,
            });
        }

        let rgb = img.to_rgb8();
        let mut buf = PixelBuffer::filled(0);
        for (x, y, px) in rgb.enumerate_pixels() {
            buf.set(x as usize, y as usize, nearest_color(px.0));
        }

        debug!("loaded background {}", path.display());
        Ok(Self::Image(buf))
    }

    /// A new buffer the caller owns and may draw on.
    pub fn fresh_buffer(&self) -> PixelBuffer {
        match self {
            Self::Solid(color) => PixelBuffer::filled(*color),
            Self::Image(buf) => buf.clone(),
        }
    }
}

/// Index of the closest palette entry by squared RGB distance.
pub fn nearest_color(rgb: [u8; 3]) -> u8 {
    let dist = |c: &[u8; 3]| -> u32 {
        c.iter()
            .zip(rgb.iter())
            .map(|(&a, &b)| (a as i32 - b as i32).pow(2) as u32)
            .sum()
    };

    (0u8..64)
        .filter(|&i| selectable(i))
        .min_by_key(|&i| dist(&NES_PALETTE[i as usize]))
        .unwrap_or(0x0F)
}

// 0x0D is blacker-than-black and upsets some TVs; the remaining x0E/x0F
// blacks duplicate 0x0F.
fn selectable(index: u8) -> bool {
    match index {
        0x0F => true,
        0x0D | 0x1D => false,
        i => (i & 0x0F) < 0x0E,
    }
}

/// Most frequent palette index in `buf`, lowest index on ties.
pub fn dominant_color(buf: &PixelBuffer) -> u8 {
    let mut counts = [0usize; 256];
    for &p in buf.as_bytes() {
        counts[p as usize] += 1;
    }
    let mut best = 0;
    for (i, &n) in counts.iter().enumerate() {
        if n > counts[best] {
            best = i;
        }
    }
    best as u8
}

static NES_PALETTE: [[u8; 3]; 64] = [
    [0x7C, 0x7C, 0x7C], [0x00, 0x00, 0xFC], [0x00, 0x00, 0xBC], [0x44, 0x28, 0xBC],
    [0x94, 0x00, 0x84], [0xA8, 0x00, 0x20], [0xA8, 0x10, 0x00], [0x88, 0x14, 0x00],
    [0x50, 0x30, 0x00], [0x00, 0x78, 0x00], [0x00, 0x68, 0x00], [0x00, 0x58, 0x00],
    [0x00, 0x40, 0x58], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xBC, 0xBC, 0xBC], [0x00, 0x78, 0xF8], [0x00, 0x58, 0xF8], [0x68, 0x44, 0xFC],
    [0xD8, 0x00, 0xCC], [0xE4, 0x00, 0x58], [0xF8, 0x38, 0x00], [0xE4, 0x5C, 0x10],
    [0xAC, 0x7C, 0x00], [0x00, 0xB8, 0x00], [0x00, 0xA8, 0x00], [0x00, 0xA8, 0x44],
    [0x00, 0x88, 0x88], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xF8, 0xF8, 0xF8], [0x3C, 0xBC, 0xFC], [0x68, 0x88, 0xFC], [0x98, 0x78, 0xF8],
    [0xF8, 0x78, 0xF8], [0xF8, 0x58, 0x98], [0xF8, 0x78, 0x58], [0xFC, 0xA0, 0x44],
    [0xF8, 0xB8, 0x00], [0xB8, 0xF8, 0x18], [0x58, 0xD8, 0x54], [0x58, 0xF8, 0x98],
    [0x00, 0xE8, 0xD8], [0x78, 0x78, 0x78], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xFC, 0xFC, 0xFC], [0xA4, 0xE4, 0xFC], [0xB8, 0xB8, 0xF8], [0xD8, 0xB8, 0xF8],
    [0xF8, 0xB8, 0xF8], [0xF8, 0xA4, 0xC0], [0xF0, 0xD0, 0xB0], [0xFC, 0xE0, 0xA8],
    [0xF8, 0xD8, 0x78], [0xD8, 0xF8, 0x78], [0xB8, 0xF8, 0xB8], [0xB8, 0xF8, 0xD8],
    [0x00, 0xFC, 0xFC], [0xF8, 0xD8, 0xF8], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_maps_to_canonical_black() {
        assert_eq!(nearest_color([0, 0, 0]), 0x0F);
        assert_eq!(nearest_color([4, 2, 3]), 0x0F);
    }

    #[test]
    fn exact_entries_map_to_themselves() {
        assert_eq!(nearest_color([0xFC, 0xFC, 0xFC]), 0x30);
        assert_eq!(nearest_color([0x00, 0x78, 0xF8]), 0x11);
        assert_eq!(nearest_color([0xBC, 0xBC, 0xBC]), 0x10);
    }

    #[test]
    fn solid_background_fills_every_pixel() {
        let buf = Background::Solid(0x21).fresh_buffer();
        assert!(buf.as_bytes().iter().all(|&p| p == 0x21));
    }

    #[test]
    fn fresh_buffers_are_independent() {
        let bg = Background::Solid(0x0F);
        let mut a = bg.fresh_buffer();
        a.set(0, 0, 0x30);
        assert_eq!(bg.fresh_buffer().get(0, 0), Some(0x0F));
    }

    #[test]
    fn dominant_is_most_frequent() {
        let mut buf = PixelBuffer::filled(0x0F);
        buf.set(1, 1, 0x30);
        assert_eq!(dominant_color(&buf), 0x0F);
    }
}
