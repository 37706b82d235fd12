use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use super::{FileRole, StoreKind, StoreOp};
use crate::{errors::CalldexIngestorError, Result};

/// One append-only file belonging to a store.
/// Writes go straight to the file, so a failed append is reported on the record that caused it.
pub(crate) struct StoreFile {
    store: StoreKind,
    role: FileRole,
    path: PathBuf,
    file: File,
}

impl StoreFile {
    pub fn create(store: StoreKind, role: FileRole, path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| CalldexIngestorError::StoreIo {
            store,
            file: role,
            op: StoreOp::Open,
            source,
        })?;

        Ok(Self {
            store,
            role,
            path: path.to_owned(),
            file,
        })
    }

    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .write_all(bytes)
            .map_err(|source| self.io_error(StoreOp::Append, source))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sync written bytes to disk and release the handle
    pub fn close(self) -> Result<()> {
        self.file
            .sync_all()
            .map_err(|source| self.io_error(StoreOp::Close, source))
    }

    fn io_error(&self, op: StoreOp, source: std::io::Error) -> CalldexIngestorError {
        CalldexIngestorError::StoreIo {
            store: self.store,
            file: self.role,
            op,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_writes_to_a_full_device_fail_on_append() -> anyhow::Result<()> {
        let dev_full = Path::new("/dev/full");
        if !dev_full.exists() {
            return Ok(());
        }

        let mut file = StoreFile::create(StoreKind::Small, FileRole::Index, dev_full)?;
        match file.append(b" 2") {
            Err(CalldexIngestorError::StoreIo {
                store: StoreKind::Small,
                file: FileRole::Index,
                op: StoreOp::Append,
                ..
            }) => {}
            Err(other) => panic!("unexpected error {other}"),
            Ok(()) => panic!("expected the append to fail"),
        }
        Ok(())
    }
}
