use crate::config::{CacheConfig, ReplacementPolicyConfig, WritePolicyConfig};

mod config;
mod accounting;

/// A validated configuration, panicking on invalid geometry
pub(crate) fn config(
    block_size: u64,
    cache_size: u64,
    associativity: u64,
    replacement_policy: ReplacementPolicyConfig,
    write_policy: WritePolicyConfig,
) -> CacheConfig {
    CacheConfig::new(block_size, cache_size, associativity, replacement_policy, write_policy).unwrap()
}

/// Two lines of 64 bytes in a single set, so every block maps to set 0 with `tag = address >> 6`
pub(crate) fn single_set(replacement_policy: ReplacementPolicyConfig, write_policy: WritePolicyConfig) -> CacheConfig {
    config(64, 128, 2, replacement_policy, write_policy)
}
