use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;

use tangimg::background::{Background, dominant_color};
use tangimg::config::parse_color;
use tangimg::layout::Layout;
use tangimg::pixels::PixelBuffer;
use tangimg::{BuildConfig, MenuColors, legacy, writer};

#[derive(Parser)]
#[command(name = "tangimg")]
#[command(version, about = "NESTang SD card image tool", long_about = None)]
struct Cli {
    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack roms behind a paged menu into one card image
    Build {
        /// Output image path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Order roms by numeric prefix, then by name
        #[arg(short, long)]
        sort: bool,

        /// 256x240 image drawn behind every menu page
        #[arg(short, long)]
        background: Option<PathBuf>,

        #[command(flatten)]
        colors: ColorArgs,

        /// .nes files, in menu order
        roms: Vec<PathBuf>,
    },

    /// Pack a single rom without a menu (old card format)
    Pack {
        rom: PathBuf,
        output: PathBuf,
    },

    /// Print a background asset as 0/1 rows with its bounding box
    DumpBackground {
        path: PathBuf,
    },
}

#[derive(Args)]
struct ColorArgs {
    /// Fill color when no background image is given
    #[arg(long, value_parser = parse_color)]
    bg_color: Option<u8>,

    #[arg(long, value_parser = parse_color)]
    cursor_bg: Option<u8>,

    #[arg(long, value_parser = parse_color)]
    cursor_fg: Option<u8>,

    /// Color of rom names
    #[arg(long, value_parser = parse_color)]
    text_color: Option<u8>,

    /// Color of the page number
    #[arg(long, value_parser = parse_color)]
    page_color: Option<u8>,
}

impl ColorArgs {
    fn resolve(&self) -> MenuColors {
        let d = MenuColors::default();
        MenuColors {
            background: self.bg_color.unwrap_or(d.background),
            cursor_background: self.cursor_bg.unwrap_or(d.cursor_background),
            cursor_foreground: self.cursor_fg.unwrap_or(d.cursor_foreground),
            bright_text: self.text_color.unwrap_or(d.bright_text),
            dark_text: self.page_color.unwrap_or(d.dark_text),
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .init();
}

fn print_layout(layout: &Layout) {
    println!("{:<8}{:>8}{:>10}  name", "sector", "count", "bytes");
    for rom in &layout.entries {
        println!(
            "{:<8}{:>8}{:>10}  {}",
            rom.start_sector,
            rom.sector_count(),
            rom.byte_length,
            rom.display_name()
        );
    }
}

fn do_build(config: BuildConfig) -> anyhow::Result<()> {
    let layout = writer::build(&config)?;
    print_layout(&layout);

    if let Some(output) = &config.output {
        println!(
            "Created: {} ({} roms, {} pages, {} sectors)",
            output.display(),
            layout.entries.len(),
            layout.page_count,
            layout.total_sectors()
        );
    }
    Ok(())
}

fn do_pack(rom: &Path, output: &Path) -> anyhow::Result<()> {
    let len = legacy::pack(rom, output)
        .with_context(|| format!("packing {}", rom.display()))?;
    println!("len={}", len);
    println!("Created: {}", output.display());
    println!("Write it to a card with: sudo dd if={} of=/dev/diskX bs=512", output.display());
    Ok(())
}

/// One string per row, `1` where the pixel differs from the dominant color.
fn background_rows(buf: &PixelBuffer) -> (Vec<String>, Option<(usize, usize, usize, usize)>) {
    let base = dominant_color(buf);
    let mut bbox: Option<(usize, usize, usize, usize)> = None;

    let rows: Vec<String> = buf
        .rows()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, &p)| {
                    if p == base {
                        '0'
                    } else {
                        bbox = Some(match bbox {
                            None => (x, x, y, y),
                            Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
                        });
                        '1'
                    }
                })
                .collect()
        })
        .collect();

    (rows, bbox)
}

fn do_dump_background(path: &Path) -> anyhow::Result<()> {
    let buf = Background::load(path)?.fresh_buffer();

    let (rows, bbox) = background_rows(&buf);
    for row in rows {
        println!("{}", row);
    }
    match bbox {
        Some((x0, x1, y0, y1)) => println!("bbox: x={}..={} y={}..={}", x0, x1, y0, y1),
        None => println!("bbox: none"),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Build {
            output,
            sort,
            background,
            colors,
            roms,
        } => do_build(BuildConfig {
            output,
            roms,
            sort,
            background,
            colors: colors.resolve(),
        }),

        Commands::Pack { rom, output } => do_pack(&rom, &output),

        Commands::DumpBackground { path } => do_dump_background(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        if matches!(
            e.downcast_ref::<tangimg::Error>(),
            Some(tangimg::Error::NoOutput | tangimg::Error::NoRoms)
        ) {
            eprintln!("Usage: tangimg build --output <image> [--sort] <rom.nes>...");
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_covers_foreground_pixels() {
        let mut buf = PixelBuffer::filled(0x0F);
        buf.set(10, 20, 0x30);
        buf.set(40, 5, 0x16);

        let (rows, bbox) = background_rows(&buf);
        assert_eq!(rows.len(), 240);
        assert_eq!(rows[0].len(), 256);
        assert_eq!(&rows[20][9..12], "010");
        assert_eq!(bbox, Some((10, 40, 5, 20)));
    }

    #[test]
    fn loaded_background_rows_mark_the_logo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        image::RgbImage::from_fn(256, 240, |x, y| {
            if (100..=103).contains(&x) && (50..=51).contains(&y) {
                image::Rgb([0xFC, 0xFC, 0xFC])
            } else {
                image::Rgb([0, 0, 0])
            }
        })
        .save(&path)
        .unwrap();

        let buf = Background::load(&path).unwrap().fresh_buffer();
        let (rows, bbox) = background_rows(&buf);
        assert_eq!(&rows[50][99..105], "011110");
        assert_eq!(bbox, Some((100, 103, 50, 51)));
    }

    #[test]
    fn blank_background_has_no_bbox() {
        let (rows, bbox) = background_rows(&PixelBuffer::filled(0));
        assert!(rows.iter().all(|r| !r.contains('1')));
        assert_eq!(bbox, None);
    }

    #[test]
    fn cli_parses_build() {
        let cli = Cli::try_parse_from([
            "tangimg", "-v", "build", "-o", "sd.img", "--sort", "--text-color", "0x2A", "b.nes", "a.nes",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Build { output, sort, colors, roms, .. } => {
                assert_eq!(output, Some(PathBuf::from("sd.img")));
                assert!(sort);
                assert_eq!(colors.resolve().bright_text, 0x2A);
                assert_eq!(roms, [PathBuf::from("b.nes"), PathBuf::from("a.nes")]);
            }
            _ => panic!("expected build"),
        }
    }
}
