use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no rom files given")]
    NoRoms,

    #[error("no output path given")]
    NoOutput,

    #[error("cannot read rom {}: {source}", path.display())]
    RomUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rom {} changed during the build (expected {expected} bytes, got {actual})", path.display())]
    RomChanged {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("rom {} is empty", path.display())]
    RomEmpty { path: PathBuf },

    #[error("rom {} is {len} bytes, the menu can address at most 16777215", path.display())]
    RomTooLarge { path: PathBuf, len: u64 },

    #[error("image would need {sectors} sectors, more than a 24-bit sector field can address")]
    ImageTooLarge { sectors: u64 },

    #[error("a menu page holds at most 20 entries, got {count}")]
    TooManyEntries { count: usize },

    #[error("cannot load background {}: {source}", path.display())]
    Background {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("background {} is {width}x{height}, expected 256x240", path.display())]
    BackgroundSize {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("cannot write image: {0}")]
    Io(#[from] std::io::Error),
}
