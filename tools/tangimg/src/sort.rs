//! Ordering for `--sort`: numbered roms first by number, then everything else by name.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Sort key for one file name. Derived ordering puts every `Numbered` key
/// before every `Plain` one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Numbered { prefix: NumericPrefix, name: String },
    Plain { name: String },
}

/// Leading decimal digits compared by value, without overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericPrefix(String);

impl NumericPrefix {
    fn new(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Self(trimmed.to_string())
    }
}

impl Ord for NumericPrefix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NumericPrefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn sort_key(name: &str) -> SortKey {
    let digits_end = name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(name.len(), |(i, _)| i);

    if digits_end == 0 {
        SortKey::Plain {
            name: name.to_string(),
        }
    } else {
        SortKey::Numbered {
            prefix: NumericPrefix::new(&name[..digits_end]),
            name: name.to_string(),
        }
    }
}

fn path_key(path: &Path) -> SortKey {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sort_key(&name)
}

/// Stable in-place sort of rom paths by file name.
pub fn sort_roms(roms: &mut [PathBuf]) {
    roms.sort_by_cached_key(|p| path_key(p));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut paths: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
        sort_roms(&mut paths);
        paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn numbers_before_names() {
        assert_eq!(
            sorted(&["2.nes", "10.nes", "apple.nes", "1.nes"]),
            ["1.nes", "2.nes", "10.nes", "apple.nes"]
        );
    }

    #[test]
    fn equal_numbers_fall_back_to_name() {
        assert_eq!(
            sorted(&["3 zelda.nes", "03 contra.nes", "3 metroid.nes", "banana.nes", "Apple.nes"]),
            ["03 contra.nes", "3 metroid.nes", "3 zelda.nes", "Apple.nes", "banana.nes"]
        );
    }

    #[test]
    fn sorts_by_file_name_not_directory() {
        assert_eq!(
            sorted(&["/z/1.nes", "/a/b.nes", "/m/a.nes"]),
            ["/z/1.nes", "/m/a.nes", "/a/b.nes"]
        );
    }

    #[test]
    fn huge_prefixes_do_not_overflow() {
        let big = "123456789012345678901234567890.nes";
        assert_eq!(sorted(&[big, "99.nes"]), ["99.nes", big]);
    }

    #[test]
    fn repeated_sorts_agree() {
        let input = ["b.nes", "10.nes", "a.nes", "010.nes", "9.nes"];
        let once = sorted(&input);
        let mut reversed = input;
        reversed.reverse();
        assert_eq!(sorted(&reversed), once);
    }
}
