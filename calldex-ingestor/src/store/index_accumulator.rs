use super::{store_file::StoreFile, FileRole, OutputLayout, StoreKind};
use crate::Result;

/// Persists one cumulative offset per accepted record, space separated,
/// so a store's index reads ` 2 14 16 17`
pub struct IndexAccumulator {
    unified: StoreFile,
    small: StoreFile,
    large: StoreFile,
}

impl IndexAccumulator {
    pub fn create(layout: &OutputLayout) -> Result<Self> {
        let open = |store: StoreKind| {
            StoreFile::create(store, FileRole::Index, &layout.paths(store).index)
        };

        Ok(Self {
            unified: open(StoreKind::Unified)?,
            small: open(StoreKind::Small)?,
            large: open(StoreKind::Large)?,
        })
    }

    pub fn record(&mut self, store: StoreKind, cumulative_offset: u64) -> Result<()> {
        let entry = format!(" {cumulative_offset}");
        self.file_mut(store).append(entry.as_bytes())
    }

    fn file_mut(&mut self, store: StoreKind) -> &mut StoreFile {
        match store {
            StoreKind::Unified => &mut self.unified,
            StoreKind::Small => &mut self.small,
            StoreKind::Large => &mut self.large,
        }
    }

    pub(crate) fn into_files(self) -> [StoreFile; 3] {
        [self.unified, self.small, self.large]
    }
}
