//! # CacheLib
//!
//! Cachelib estimates memory hierarchy performance by replaying load/store traces against a
//! simulated set-associative cache
//!
//! It provides a cache generic over its replacement policy (random, LRU, FIFO or LFU), a write-back
//! or write-through write policy, hit/miss/eviction statistics with cycle accounting, and a
//! simulator which feeds it traces of any column layout
//!
//! Simulation is strictly sequential: one cache, one operation at a time. Run one cache per
//! simulated core if several are needed

/// Splits addresses into tags and set indices
pub mod address;

/// Contains the implementation of the cache, and a utility enum for the provided replacement
/// policies
pub mod cache;

/// Contains the configuration record and its text and JSON loaders
pub mod config;

/// Contains the error types
pub mod error;

/// Opens trace files for reading
pub mod io;

/// Contains the memory operations consumed by the cache
pub mod operation;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Contains the simulator used to replay a trace with a given cache configuration
pub mod simulator;

/// Contains the access counters and derived metrics
pub mod statistics;

/// Contains the storage of sets and lines
pub mod store;

/// Contains the configurable trace line layout and the trace reader
pub mod trace;

/// Contains the write-back and write-through policies
pub mod write_policy;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
