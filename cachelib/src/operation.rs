/// Whether an operation reads or writes memory
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AccessKind {
    Load,
    Store,
}

/// One load or store, as produced by a trace reader
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MemoryOperation {
    pub kind: AccessKind,
    pub address: u64,
}

impl MemoryOperation {
    pub fn load(address: u64) -> Self {
        Self { kind: AccessKind::Load, address }
    }

    pub fn store(address: u64) -> Self {
        Self { kind: AccessKind::Store, address }
    }
}
