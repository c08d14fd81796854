//! Image writer: lays out the roms, then streams menu pages and rom data.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::background::Background;
use crate::config::{BuildConfig, MenuColors};
use crate::error::{Error, Result};
use crate::layout::{Layout, RomEntry};
use crate::meta::MetaSector;
use crate::page::PageComposer;
use crate::sort::sort_roms;
use crate::SECTOR_SIZE;

static ZEROS: [u8; SECTOR_SIZE] = [0; SECTOR_SIZE];

/// Builds the image described by `config`.
///
/// Nothing is written to the output path unless the whole image was produced;
/// the data goes to a temporary file next to it which is renamed at the end.
pub fn build(config: &BuildConfig) -> Result<Layout> {
    let output = config.output.as_deref().ok_or(Error::NoOutput)?;
    if config.roms.is_empty() {
        return Err(Error::NoRoms);
    }

    let mut roms = config.roms.clone();
    if config.sort {
        sort_roms(&mut roms);
    }

    let layout = Layout::plan_files(&roms)?;
    info!(
        "{} roms on {} pages, {} sectors",
        layout.entries.len(),
        layout.page_count,
        layout.total_sectors()
    );

    let background = match &config.background {
        Some(path) => Background::load(path)?,
        None => Background::Solid(config.colors.background),
    };

    write_atomically(output, |out| write_image(&layout, &background, &config.colors, out))?;
    info!("wrote {}", output.display());

    Ok(layout)
}

/// Streams a full image for `layout` into `out`.
pub fn write_image<W: Write>(
    layout: &Layout,
    background: &Background,
    colors: &MenuColors,
    out: &mut W,
) -> Result<()> {
    let composer = PageComposer::new(background, *colors);

    for (page, roms) in layout.pages() {
        let meta = MetaSector::for_page(page, roms, layout.page_count, colors)?;
        out.write_all(&meta.to_bytes())?;
        composer.compose(page, roms, layout.page_count).write_to(out)?;
    }

    for rom in &layout.entries {
        write_rom(rom, out)?;
    }
    Ok(())
}

/// Copies one rom and zero-fills its last sector.
fn write_rom<W: Write>(rom: &RomEntry, out: &mut W) -> Result<()> {
    let data = std::fs::read(&rom.source_path).map_err(|source| Error::RomUnreadable {
        path: rom.source_path.clone(),
        source,
    })?;

    if data.len() as u64 != rom.byte_length as u64 {
        return Err(Error::RomChanged {
            path: rom.source_path.clone(),
            expected: rom.byte_length as u64,
            actual: data.len() as u64,
        });
    }

    out.write_all(&data)?;
    write_padding(data.len(), out)?;

    debug!(
        "{} @ sector {} ({} bytes)",
        rom.source_path.display(),
        rom.start_sector,
        rom.byte_length
    );
    Ok(())
}

/// Zero bytes needed after `len` bytes to reach a sector boundary.
pub fn padding_for(len: usize) -> usize {
    (SECTOR_SIZE - len % SECTOR_SIZE) % SECTOR_SIZE
}

pub(crate) fn write_padding<W: Write>(len: usize, out: &mut W) -> std::io::Result<()> {
    out.write_all(&ZEROS[..padding_for(len)])
}

/// Runs `fill` against a temp file in `output`'s directory and moves it into
/// place only if `fill` succeeded. On error the temp file is removed.
pub(crate) fn write_atomically<F>(output: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        fill(&mut out)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(output).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_reaches_next_sector() {
        assert_eq!(padding_for(0), 0);
        assert_eq!(padding_for(1), 511);
        assert_eq!(padding_for(512), 0);
        assert_eq!(padding_for(40976), 496);
    }

    #[test]
    fn missing_output_is_a_usage_error() {
        let config = BuildConfig {
            roms: vec!["a.nes".into()],
            ..Default::default()
        };
        assert!(matches!(build(&config), Err(Error::NoOutput)));
    }

    #[test]
    fn missing_roms_is_a_usage_error() {
        let config = BuildConfig {
            output: Some("out.img".into()),
            ..Default::default()
        };
        assert!(matches!(build(&config), Err(Error::NoRoms)));
    }

    #[test]
    fn rom_shrunk_after_planning_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let rom = dir.path().join("metroid.nes");
        std::fs::write(&rom, [7u8; 100]).unwrap();

        let layout = Layout::plan_files(&[&rom]).unwrap();
        std::fs::write(&rom, [7u8; 50]).unwrap();

        let colors = MenuColors::default();
        let mut out = Vec::new();
        let result = write_image(&layout, &Background::Solid(colors.background), &colors, &mut out);
        assert!(matches!(
            result,
            Err(Error::RomChanged { expected: 100, actual: 50, .. })
        ));
    }

    #[test]
    fn failed_fill_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("menu.img");

        let result = write_atomically(&output, |out| {
            out.write_all(b"partial")?;
            Err(Error::NoRoms)
        });

        assert!(result.is_err());
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
