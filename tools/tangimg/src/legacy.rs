//! Single-rom card images, as written before the menu existed.
//!
//! Sector 0 holds the rom length as a little-endian integer, the rom follows
//! from sector 1, zero-padded to a whole sector.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::writer::{write_atomically, write_padding};
use crate::SECTOR_SIZE;

pub fn header(len: u64) -> [u8; SECTOR_SIZE] {
    let mut sector = [0u8; SECTOR_SIZE];
    sector[..8].copy_from_slice(&len.to_le_bytes());
    sector
}

/// Packs `rom` alone into `output`. Returns the rom length.
pub fn pack(rom: &Path, output: &Path) -> Result<u64> {
    let data = std::fs::read(rom).map_err(|source| Error::RomUnreadable {
        path: rom.to_path_buf(),
        source,
    })?;
    let len = data.len() as u64;
    info!("len={}", len);

    write_atomically(output, |out| {
        out.write_all(&header(len))?;
        out.write_all(&data)?;
        write_padding(data.len(), out)?;
        Ok(())
    })?;

    Ok(len)
}
