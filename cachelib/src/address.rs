use crate::error::ConfigError;

/// Splits physical addresses into a tag and a set index
///
/// ```text
/// | tag | index (index_bits) | offset (offset_bits) |
/// ```
///
/// The offset selects a byte within a block and is otherwise ignored by the cache
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    set_mask: u64,
}

impl AddressDecoder {
    /// Creates a decoder for a given block size and number of sets, both must be non-zero powers
    /// of two
    pub fn new(block_size: u64, num_sets: u64) -> Result<Self, ConfigError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(block_size));
        }
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCount(num_sets));
        }
        Ok(Self {
            offset_bits: block_size.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
            set_mask: num_sets - 1,
        })
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// `(address >> offset_bits) & (num_sets - 1)`
    #[inline]
    pub fn get_index(&self, address: u64) -> u64 {
        (address >> self.offset_bits) & self.set_mask
    }

    /// `address >> (offset_bits + index_bits)`. The shift can reach 64 for a cache spanning the
    /// whole address space, in which case every tag is 0
    #[inline]
    pub fn get_tag(&self, address: u64) -> u64 {
        address.checked_shr(self.offset_bits + self.index_bits).unwrap_or(0)
    }

    /// Returns `(tag, index)`
    #[inline]
    pub fn decode(&self, address: u64) -> (u64, u64) {
        (self.get_tag(address), self.get_index(address))
    }
}
