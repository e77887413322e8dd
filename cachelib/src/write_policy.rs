use crate::config::WritePolicyConfig;
use crate::operation::AccessKind;
use crate::store::CacheLine;

/// Decides when stores reach the write buffer
///
/// * Write-back marks the line dirty and defers the write until a dirty line is evicted
/// * Write-through sends every store to the write buffer straight away and never uses the dirty
/// bit
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WritePolicy {
    WriteBack,
    WriteThrough,
}

impl WritePolicy {
    /// Applies a store to the line it landed in, on a hit or after a fill, returning the number of
    /// write buffer writes it causes
    pub fn on_store(self, line: &mut CacheLine) -> u64 {
        match self {
            Self::WriteBack => {
                line.mark_dirty();
                0
            }
            Self::WriteThrough => 1,
        }
    }

    /// The dirty bit of a freshly filled line and the write buffer writes the fill causes
    ///
    /// returns: (bool, u64)
    pub fn on_fill(self, kind: AccessKind) -> (bool, u64) {
        match (self, kind) {
            (_, AccessKind::Load) => (false, 0),
            (Self::WriteBack, AccessKind::Store) => (true, 0),
            (Self::WriteThrough, AccessKind::Store) => (false, 1),
        }
    }

    /// Write buffer writes caused by evicting a line
    pub fn on_evict(self, was_dirty: bool) -> u64 {
        match self {
            Self::WriteBack if was_dirty => 1,
            _ => 0,
        }
    }
}

impl From<WritePolicyConfig> for WritePolicy {
    fn from(value: WritePolicyConfig) -> Self {
        match value {
            WritePolicyConfig::WriteBack => Self::WriteBack,
            WritePolicyConfig::WriteThrough => Self::WriteThrough,
        }
    }
}
