use super::{store_file::StoreFile, FileRole, OutputLayout, StoreKind};
use crate::{state::RunState, Result};

/// Appends raw record bytes to the blob file of each store
pub struct SegmentedWriter {
    unified: StoreFile,
    small: StoreFile,
    large: StoreFile,
}

impl SegmentedWriter {
    pub fn create(layout: &OutputLayout) -> Result<Self> {
        let open = |store: StoreKind| {
            StoreFile::create(store, FileRole::Blob, &layout.paths(store).blob)
        };

        Ok(Self {
            unified: open(StoreKind::Unified)?,
            small: open(StoreKind::Small)?,
            large: open(StoreKind::Large)?,
        })
    }

    /// Appends `bytes` to the store's blob and returns its cumulative size afterwards
    pub fn append(
        &mut self,
        state: &mut RunState,
        store: StoreKind,
        bytes: &[u8],
    ) -> Result<u64> {
        self.file_mut(store).append(bytes)?;
        Ok(state.advance(store, bytes.len() as u64))
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
