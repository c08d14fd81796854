//! Sector placement for a whole image.
//!
//! All menu pages come first, one meta sector plus one page image each, then
//! the roms back to back in input order.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::{ENTRIES_PER_PAGE, MAX_24BIT, META_MENU_SECTORS, sectors_for};

/// One packed rom and where it lands on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomEntry {
    pub source_path: PathBuf,
    pub start_sector: u32,
    pub byte_length: u32,
}

impl RomEntry {
    pub fn sector_count(&self) -> u32 {
        sectors_for(self.byte_length as u64) as u32
    }

    /// File name with the extension dropped.
    pub fn display_name(&self) -> String {
        self.source_path
            .file_stem()
            .or_else(|| self.source_path.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub page_count: u32,
    pub entries: Vec<RomEntry>,
}

impl Layout {
    /// Places `roms`, given as (path, byte length), in the order received.
    pub fn plan(roms: &[(PathBuf, u64)]) -> Result<Self> {
        if roms.is_empty() {
            return Err(Error::NoRoms);
        }

        let page_count = roms.len().div_ceil(ENTRIES_PER_PAGE) as u64;
        let mut next_sector = page_count * META_MENU_SECTORS as u64;

        let mut entries = Vec::with_capacity(roms.len());
        for (path, len) in roms {
            if *len == 0 {
                return Err(Error::RomEmpty { path: path.clone() });
            }
            if *len > MAX_24BIT as u64 {
                return Err(Error::RomTooLarge {
                    path: path.clone(),
                    len: *len,
                });
            }
            if next_sector > MAX_24BIT as u64 {
                return Err(Error::ImageTooLarge { sectors: next_sector });
            }

            entries.push(RomEntry {
                source_path: path.clone(),
                start_sector: next_sector as u32,
                byte_length: *len as u32,
            });
            next_sector += sectors_for(*len);
        }

        Ok(Self {
            page_count: page_count as u32,
            entries,
        })
    }

    /// Reads every rom's size up front, before anything is written.
    pub fn plan_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let sized = paths
            .iter()
            .map(|p| {
                let path = p.as_ref();
                std::fs::metadata(path)
                    .and_then(|m| {
                        if m.is_file() {
                            Ok(m.len())
                        } else {
                            Err(std::io::Error::other("not a regular file"))
                        }
                    })
                    .map(|len| (path.to_path_buf(), len))
                    .map_err(|source| Error::RomUnreadable {
                        path: path.to_path_buf(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::plan(&sized)
    }

    pub fn pages(&self) -> impl Iterator<Item = (u32, &[RomEntry])> {
        (0u32..).zip(self.entries.chunks(ENTRIES_PER_PAGE))
    }

    /// First sector of page `page`'s meta record.
    pub fn meta_sector(page: u32) -> u32 {
        page * META_MENU_SECTORS
    }

    /// Sectors used by the whole image.
    pub fn total_sectors(&self) -> u64 {
        match self.entries.last() {
            Some(last) => last.start_sector as u64 + last.sector_count() as u64,
            None => self.page_count as u64 * META_MENU_SECTORS as u64,
        }
    }
}
