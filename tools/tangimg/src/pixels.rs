//! Indexed-color frame buffer for one menu page.

use std::io::Write;

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 240;

/// 256x240 grid of NES palette indices, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Box<[u8; WIDTH * HEIGHT]>,
}

impl PixelBuffer {
    pub fn filled(color: u8) -> Self {
        Self {
            pixels: Box::new([color; WIDTH * HEIGHT]),
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixels[y * WIDTH + x])
        } else {
            None
        }
    }

    /// Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, color: u8) {
        if x < WIDTH && y < HEIGHT {
            self.pixels[y * WIDTH + x] = color;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(WIDTH)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels[..]
    }

    /// Serializes the buffer the way the loader reads it: row-major, one byte per pixel.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.as_bytes())
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PixelBuffer({}x{})", WIDTH, HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_page_is_61440_bytes() {
        let buf = PixelBuffer::filled(0x0F);
        let mut out = Vec::new();
        buf.write_to(&mut out).unwrap();
        assert_eq!(out.len(), 61_440);
        assert!(out.iter().all(|&b| b == 0x0F));
    }

    #[test]
    fn set_outside_is_ignored() {
        let mut buf = PixelBuffer::filled(0);
        buf.set(WIDTH, 0, 1);
        buf.set(0, HEIGHT, 1);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));

        buf.set(255, 239, 7);
        assert_eq!(buf.get(255, 239), Some(7));
        assert_eq!(buf.as_bytes()[WIDTH * HEIGHT - 1], 7);
        assert_eq!(buf.get(256, 0), None);
    }
}
