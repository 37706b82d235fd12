use std::path::{Path, PathBuf};

use super::StoreKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub blob: PathBuf,
    pub index: PathBuf,
}

impl StorePaths {
    pub fn new<B: Into<PathBuf>, I: Into<PathBuf>>(blob: B, index: I) -> Self {
        Self {
            blob: blob.into(),
            index: index.into(),
        }
    }
}

/// Where the six output files of an export live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub unified: StorePaths,
    pub small: StorePaths,
    pub large: StorePaths,
}

impl OutputLayout {
    /// `input.data`/`input.index` plus `small_`/`large_` prefixed pairs inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let pair = |prefix: &str| {
            StorePaths::new(
                dir.join(format!("{prefix}input.data")),
                dir.join(format!("{prefix}input.index")),
            )
        };

        Self {
            unified: pair(""),
            small: pair("small_"),
            large: pair("large_"),
        }
    }

    pub fn paths(&self, store: StoreKind) -> &StorePaths {
        match store {
            StoreKind::Unified => &self.unified,
            StoreKind::Small => &self.small,
            StoreKind::Large => &self.large,
        }
    }

    pub fn with_paths(mut self, store: StoreKind, paths: StorePaths) -> Self {
        match store {
            StoreKind::Unified => self.unified = paths,
            StoreKind::Small => self.small = paths,
            StoreKind::Large => self.large = paths,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_match_the_export_convention() {
        let layout = OutputLayout::in_dir("/data/out");

        assert_eq!(
            StorePaths::new("/data/out/input.data", "/data/out/input.index"),
            layout.unified
        );
        assert_eq!(
            StorePaths::new("/data/out/small_input.data", "/data/out/small_input.index"),
            layout.small
        );
        assert_eq!(
            StorePaths::new("/data/out/large_input.data", "/data/out/large_input.index"),
            layout.large
        );
    }

    #[test]
    fn overrides_touch_a_single_store() {
        let layout = OutputLayout::in_dir("out")
            .with_paths(StoreKind::Small, StorePaths::new("tiny.bin", "tiny.idx"));

        assert_eq!(PathBuf::from("tiny.idx"), layout.paths(StoreKind::Small).index);
        assert_eq!(PathBuf::from("out/input.index"), layout.paths(StoreKind::Unified).index);
    }
}
