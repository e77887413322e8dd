use tracing::{debug, trace};
use crate::address::AddressDecoder;
use crate::config::{CacheConfig, ReplacementPolicyConfig};
use crate::error::ConfigError;
use crate::operation::{AccessKind, MemoryOperation};
use crate::replacement_policies::{FirstInFirstOut, LeastFrequentlyUsed, LeastRecentlyUsed, Random, ReplacementPolicy};
use crate::statistics::Statistics;
use crate::store::{CacheLine, Eviction, SetAssociativeStore};
use crate::write_policy::WritePolicy;

/// What happened to a single operation
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AccessOutcome {
    /// The line was present
    Hit { set: u64, slot: usize },
    /// The line was missing and went into a free slot
    Fill { set: u64, slot: usize },
    /// The line was missing and displaced `evicted`
    Evict { set: u64, slot: usize, evicted: Eviction },
}

impl AccessOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    pub fn evicted(&self) -> Option<Eviction> {
        match self {
            Self::Evict { evicted, .. } => Some(*evicted),
            _ => None,
        }
    }
}

/// A generic trait for caches
///
/// Technically not required as we're using static dispatch through [`GenericCache`] instead of
/// dyn Cache, but this gives flexibility for the future with no overhead
pub trait CacheTrait {
    /// Processes one operation end to end, updating the lines, the replacement policy and the
    /// statistics. Every well-formed operation completes
    fn run(&mut self, operation: MemoryOperation) -> AccessOutcome;

    /// Whether the block holding `address` is resident, without touching any state
    fn probe(&self, address: u64) -> bool;

    fn statistics(&self) -> &Statistics;

    fn config(&self) -> &CacheConfig;

    fn decoder(&self) -> &AddressDecoder;

    /// The lines of one set, read only. `None` when `index` is not below the set count
    fn set_lines(&self, index: u64) -> Option<&[CacheLine]>;

    /// Gets the number of uninitialised cache lines. Useful for analysing cache performance or
    /// debugging
    fn get_uninitialised_line_count(&self) -> usize;
}

/// A cache parameterised by its replacement policy
///
/// Monomorphisation lets the compiler inline the policy hooks into the access path, which should
/// be close to on par with writing specialised implementations for each policy
#[derive(Debug)]
pub struct Cache<R: ReplacementPolicy> {
    config: CacheConfig,
    decoder: AddressDecoder,
    store: SetAssociativeStore,
    replacement_policy: R,
    write_policy: WritePolicy,
    statistics: Statistics,
}

impl<R: ReplacementPolicy> Cache<R> {
    pub fn new(config: &CacheConfig, replacement_policy: R) -> Result<Self, ConfigError> {
        let decoder = AddressDecoder::new(config.block_size(), config.num_sets())?;
        debug!(
            block_size = config.block_size(),
            cache_size = config.cache_size(),
            associativity = config.associativity(),
            num_sets = config.num_sets(),
            offset_bits = decoder.offset_bits(),
            index_bits = decoder.index_bits(),
            replacement_policy = %config.replacement_policy(),
            write_policy = %config.write_policy(),
            "Created cache"
        );
        Ok(Self {
            config: config.clone(),
            decoder,
            store: SetAssociativeStore::new(config.num_sets(), config.associativity()),
            replacement_policy,
            write_policy: config.write_policy().into(),
            statistics: Statistics::default(),
        })
    }

    fn miss(&mut self, kind: AccessKind, tag: u64, set: u64) -> AccessOutcome {
        self.statistics.record_miss(kind);
        let (dirty, buffer_writes) = self.write_policy.on_fill(kind);
        let outcome = match self.store.fill_empty(set, tag, dirty, &mut self.replacement_policy) {
            Some(slot) => AccessOutcome::Fill { set, slot },
            None => {
                let slot = self.replacement_policy.choose_victim(self.store.set_mut(set));
                let evicted = self.store.overwrite(set, slot, tag, dirty, &mut self.replacement_policy);
                trace!(set, slot, evicted_tag = evicted.tag, was_dirty = evicted.was_dirty, "Evicted line");
                self.statistics.record_eviction();
                self.statistics.record_write_buffer_writes(self.write_policy.on_evict(evicted.was_dirty));
                AccessOutcome::Evict { set, slot, evicted }
            }
        };
        self.statistics.record_write_buffer_writes(buffer_writes);
        outcome
    }
}

impl<R: ReplacementPolicy> CacheTrait for Cache<R> {
    fn run(&mut self, operation: MemoryOperation) -> AccessOutcome {
        self.statistics.record_access(operation.kind);
        let (tag, set) = self.decoder.decode(operation.address);
        match self.store.lookup(tag, set) {
            Some(slot) => {
                self.statistics.record_hit();
                self.replacement_policy.on_touch(self.store.set_mut(set), slot);
                if operation.kind == AccessKind::Store {
                    let buffer_writes = self.write_policy.on_store(self.store.line_mut(set, slot));
                    self.statistics.record_write_buffer_writes(buffer_writes);
                }
                AccessOutcome::Hit { set, slot }
            }
            None => self.miss(operation.kind, tag, set),
        }
    }

    fn probe(&self, address: u64) -> bool {
        let (tag, set) = self.decoder.decode(address);
        self.store.lookup(tag, set).is_some()
    }

    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    fn set_lines(&self, index: u64) -> Option<&[CacheLine]> {
        self.store.set(index)
    }

    fn get_uninitialised_line_count(&self) -> usize {
        self.store.get_uninitialised_line_count()
    }
}

/// Enum for the 4 replacement policies provided by the library
///
/// Using trait objects reduces boilerplate, but we would be de-referencing for each operation in
/// the trace. It's much faster to explicitly branch on all implementations, as the compiler can
/// reason about the concrete types, perform function inlining etc
#[derive(Debug)]
pub enum GenericCache {
    Random(Cache<Random>),
    LeastRecentlyUsed(Cache<LeastRecentlyUsed>),
    FirstInFirstOut(Cache<FirstInFirstOut>),
    LeastFrequentlyUsed(Cache<LeastFrequentlyUsed>),
}

impl GenericCache {
    /// Creates the cache selected by the configuration's replacement policy
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, None)
    }

    /// As [`GenericCache::new`], `seed` fixes the victim sequence of the random policy and is
    /// ignored by the others
    pub fn with_seed(config: &CacheConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        Ok(match config.replacement_policy() {
            ReplacementPolicyConfig::Random => {
                let policy = seed.map_or_else(Random::new, Random::with_seed);
                GenericCache::from(Cache::new(config, policy)?)
            }
            ReplacementPolicyConfig::Lru => GenericCache::from(Cache::new(config, LeastRecentlyUsed)?),
            ReplacementPolicyConfig::Fifo => GenericCache::from(Cache::new(config, FirstInFirstOut)?),
            ReplacementPolicyConfig::Lfu => GenericCache::from(Cache::new(config, LeastFrequentlyUsed)?),
        })
    }
}

impl From<Cache<Random>> for GenericCache {
    fn from(value: Cache<Random>) -> Self {
        Self::Random(value)
    }
}

impl From<Cache<LeastRecentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl From<Cache<FirstInFirstOut>> for GenericCache {
    fn from(value: Cache<FirstInFirstOut>) -> Self {
        Self::FirstInFirstOut(value)
    }
}

impl From<Cache<LeastFrequentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastFrequentlyUsed>) -> Self {
        Self::LeastFrequentlyUsed(value)
    }
}

impl CacheTrait for GenericCache {
    fn run(&mut self, operation: MemoryOperation) -> AccessOutcome {
        match self {
            GenericCache::Random(c) => c.run(operation),
            GenericCache::LeastRecentlyUsed(c) => c.run(operation),
            GenericCache::FirstInFirstOut(c) => c.run(operation),
            GenericCache::LeastFrequentlyUsed(c) => c.run(operation),
        }
    }

    fn probe(&self, address: u64) -> bool {
        match self {
            GenericCache::Random(c) => c.probe(address),
            GenericCache::LeastRecentlyUsed(c) => c.probe(address),
            GenericCache::FirstInFirstOut(c) => c.probe(address),
            GenericCache::LeastFrequentlyUsed(c) => c.probe(address),
        }
    }

    fn statistics(&self) -> &Statistics {
        match self {
            GenericCache::Random(c) => c.statistics(),
            GenericCache::LeastRecentlyUsed(c) => c.statistics(),
            GenericCache::FirstInFirstOut(c) => c.statistics(),
            GenericCache::LeastFrequentlyUsed(c) => c.statistics(),
        }
    }

    fn config(&self) -> &CacheConfig {
        match self {
            GenericCache::Random(c) => c.config(),
            GenericCache::LeastRecentlyUsed(c) => c.config(),
            GenericCache::FirstInFirstOut(c) => c.config(),
            GenericCache::LeastFrequentlyUsed(c) => c.config(),
        }
    }

    fn decoder(&self) -> &AddressDecoder {
        match self {
            GenericCache::Random(c) => c.decoder(),
            GenericCache::LeastRecentlyUsed(c) => c.decoder(),
            GenericCache::FirstInFirstOut(c) => c.decoder(),
            GenericCache::LeastFrequentlyUsed(c) => c.decoder(),
        }
    }

    fn set_lines(&self, index: u64) -> Option<&[CacheLine]> {
        match self {
            GenericCache::Random(c) => c.set_lines(index),
            GenericCache::LeastRecentlyUsed(c) => c.set_lines(index),
            GenericCache::FirstInFirstOut(c) => c.set_lines(index),
            GenericCache::LeastFrequentlyUsed(c) => c.set_lines(index),
        }
    }

    fn get_uninitialised_line_count(&self) -> usize {
        match self {
            GenericCache::Random(c) => c.get_uninitialised_line_count(),
            GenericCache::LeastRecentlyUsed(c) => c.get_uninitialised_line_count(),
            GenericCache::FirstInFirstOut(c) => c.get_uninitialised_line_count(),
            GenericCache::LeastFrequentlyUsed(c) => c.get_uninitialised_line_count(),
        }
    }
}
