use std::path::{Path, PathBuf};

use tangimg::{BuildConfig, Error, META_MENU_SECTORS, MenuColors, writer};

const SECTOR: usize = 512;

fn u24(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])
}

/// Writes `n` roms of differing sizes and contents into `dir`.
fn make_roms(dir: &Path, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            let path = dir.join(format!("game {:02}.nes", i));
            let len = 16 + 1000 * (i + 1) + i % 3;
            std::fs::write(&path, vec![(i as u8).wrapping_add(1); len]).unwrap();
            path
        })
        .collect()
}

fn config(output: PathBuf, roms: Vec<PathBuf>) -> BuildConfig {
    BuildConfig {
        output: Some(output),
        roms,
        ..Default::default()
    }
}

#[test]
fn image_layout_matches_meta_records() {
    let dir = tempfile::tempdir().unwrap();
    let roms = make_roms(dir.path(), 23);
    let output = dir.path().join("sd.img");

    let layout = writer::build(&config(output.clone(), roms.clone())).unwrap();
    assert_eq!(layout.page_count, 2);

    let image = std::fs::read(&output).unwrap();
    assert_eq!(image.len() as u64, layout.total_sectors() * SECTOR as u64);

    let stride = META_MENU_SECTORS as usize * SECTOR;
    let page0 = &image[..SECTOR];
    let page1 = &image[stride..stride + SECTOR];

    assert_eq!(&page0[..4], b"TANG");
    assert_eq!(&page1[..4], b"TANG");
    assert_eq!((u24(&page0[4..7]), u24(&page0[7..10])), (0, META_MENU_SECTORS));
    assert_eq!(
        (u24(&page1[4..7]), u24(&page1[7..10])),
        (0, META_MENU_SECTORS)
    );
    assert_eq!(page0[10], 20);
    assert_eq!(page1[10], 3);

    // every entry points at its rom's bytes, padded with zeros to a sector
    let metas = [(page0, 20), (page1, 3)];
    let mut rom_index = 0;
    for (meta, count) in metas {
        for e in 0..count {
            let entry = &meta[16 + e * 8..24 + e * 8];
            let start = u24(&entry[2..5]) as usize * SECTOR;
            let len = u24(&entry[5..8]) as usize;

            let original = std::fs::read(&roms[rom_index]).unwrap();
            assert_eq!(len, original.len());
            assert_eq!(&image[start..start + len], &original[..]);

            let padded_end = start + len.div_ceil(SECTOR) * SECTOR;
            assert!(image[start + len..padded_end].iter().all(|&b| b == 0));
            rom_index += 1;
        }
    }

    let first_start = u24(&page0[18..21]);
    assert_eq!(first_start, 2 * META_MENU_SECTORS);
}

#[test]
fn page_pixels_follow_each_meta_sector() {
    let dir = tempfile::tempdir().unwrap();
    let roms = make_roms(dir.path(), 1);
    let output = dir.path().join("one.img");
    let colors = MenuColors::default();

    writer::build(&config(output.clone(), roms)).unwrap();
    let image = std::fs::read(&output).unwrap();

    let pixels = &image[SECTOR..META_MENU_SECTORS as usize * SECTOR];
    assert_eq!(pixels.len(), 256 * 240);
    assert!(pixels.contains(&colors.bright_text));
    assert!(pixels.contains(&colors.dark_text));
    assert!(pixels.iter().all(|&p| {
        p == colors.background || p == colors.bright_text || p == colors.dark_text
    }));
}

#[test]
fn builds_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let roms = make_roms(dir.path(), 7);
    let a = dir.path().join("a.img");
    let b = dir.path().join("b.img");

    writer::build(&config(a.clone(), roms.clone())).unwrap();
    writer::build(&config(b.clone(), roms)).unwrap();

    assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
}

#[test]
fn sorted_build_places_numbered_roms_first() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["2.nes", "10.nes", "apple.nes", "1.nes"];
    let roms: Vec<PathBuf> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let path = dir.path().join(name);
            std::fs::write(&path, vec![i as u8 + 1; 600]).unwrap();
            path
        })
        .collect();

    let mut cfg = config(dir.path().join("sorted.img"), roms);
    cfg.sort = true;
    let layout = writer::build(&cfg).unwrap();

    let order: Vec<_> = layout.entries.iter().map(|e| e.display_name()).collect();
    assert_eq!(order, ["1", "2", "10", "apple"]);

    let starts: Vec<_> = layout.entries.iter().map(|e| e.start_sector).collect();
    assert_eq!(starts, [121, 123, 125, 127]);
}

#[test]
fn missing_rom_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut roms = make_roms(dir.path(), 3);
    roms.insert(1, dir.path().join("lost.nes"));
    let output = dir.path().join("sd.img");

    let err = writer::build(&config(output.clone(), roms)).unwrap_err();
    match err {
        Error::RomUnreadable { path, .. } => assert!(path.ends_with("lost.nes")),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn existing_image_survives_failed_build() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sd.img");
    std::fs::write(&output, b"previous image").unwrap();

    let roms = vec![dir.path().join("missing.nes")];
    assert!(writer::build(&config(output.clone(), roms)).is_err());
    assert_eq!(std::fs::read(&output).unwrap(), b"previous image");
}

#[test]
fn directory_as_rom_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("roms");
    std::fs::create_dir(&sub).unwrap();

    let err = writer::build(&config(dir.path().join("sd.img"), vec![sub])).unwrap_err();
    assert!(matches!(err, Error::RomUnreadable { .. }));
}
