use crate::store::StoreKind;

/// Inputs of this many bytes or more land in the large partition
pub const DEFAULT_SIZE_THRESHOLD: usize = 32 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Small,
    Large,
}

impl Partition {
    pub fn store(self) -> StoreKind {
        match self {
            Partition::Small => StoreKind::Small,
            Partition::Large => StoreKind::Large,
        }
    }

    /// Stores an accepted record is written to, in write order
    pub fn stores(self) -> [StoreKind; 2] {
        [StoreKind::Unified, self.store()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    Skip,
    RouteTo(Partition),
}

pub fn classify(record: Option<&[u8]>, size_threshold: usize) -> Routing {
    match record {
        None => Routing::Skip,
        Some(bytes) if bytes.len() < size_threshold => Routing::RouteTo(Partition::Small),
        Some(_) => Routing::RouteTo(Partition::Large),
    }
}
