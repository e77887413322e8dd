use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::store::CacheLine;

/// A generic trait for implementing new replacement policies. Can be used to parameterise a Cache.
///
/// Policies keep their state in the `metric` field of each line, so every method is handed the
/// lines of the one set being accessed
pub trait ReplacementPolicy {
    /// Initialises the metric of a line which was just filled, including one filled after an
    /// eviction
    ///
    /// # Arguments
    ///
    /// * `set`: The lines of the set, `set[slot]` is already valid
    /// * `slot`: The newly filled line
    ///
    /// returns: ()
    fn on_insert(&mut self, set: &mut [CacheLine], slot: usize);

    /// Updates the policy when a line is hit
    ///
    /// Not applicable for some policies, a default which does nothing is provided
    fn on_touch(&mut self, _set: &mut [CacheLine], _slot: usize) {}

    /// Picks the slot to evict. Only called on a set with no free slot
    ///
    /// # Arguments
    ///
    /// * `set`: The lines of a full set
    ///
    /// returns: usize
    fn choose_victim(&mut self, set: &mut [CacheLine]) -> usize;
}

/// Evicts a uniformly random slot, ignoring the access history entirely
#[derive(Debug)]
pub struct Random {
    rng: ChaCha8Rng,
}

impl Random {
    /// Seeded from the operating system's entropy source
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// A reproducible victim sequence, for tests and for comparing runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementPolicy for Random {
    fn on_insert(&mut self, _set: &mut [CacheLine], _slot: usize) {}

    fn choose_victim(&mut self, set: &mut [CacheLine]) -> usize {
        self.rng.gen_range(0..set.len())
    }
}

/// Least Recently Used replacement policy
///
/// The metric is the line's age, 0 being the most recently used. Touching a line only ages the
/// lines younger than it, so within a set the ages of valid lines always stay a permutation of
/// `0..valid_lines` and never grow past the associativity
#[derive(Debug, Default)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    fn on_insert(&mut self, set: &mut [CacheLine], slot: usize) {
        for (index, line) in set.iter_mut().enumerate() {
            if index == slot {
                line.metric = 0;
            } else if line.is_valid() {
                line.metric += 1;
            }
        }
    }

    fn on_touch(&mut self, set: &mut [CacheLine], slot: usize) {
        let previous_age = set[slot].metric;
        set[slot].metric = 0;
        for (index, line) in set.iter_mut().enumerate() {
            if index != slot && line.is_valid() && line.metric < previous_age {
                line.metric += 1;
            }
        }
    }

    fn choose_victim(&mut self, set: &mut [CacheLine]) -> usize {
        // Strict comparison keeps the lowest slot on ties
        let mut victim = 0;
        let mut oldest = None;
        for (index, line) in set.iter().enumerate() {
            if line.is_valid() && oldest.map_or(true, |age| line.metric > age) {
                oldest = Some(line.metric);
                victim = index;
            }
        }
        victim
    }
}

/// First In First Out replacement policy
///
/// The metric is the arrival order within the set, 1 being the oldest resident. Hits leave it
/// untouched
#[derive(Debug, Default)]
pub struct FirstInFirstOut;

impl ReplacementPolicy for FirstInFirstOut {
    fn on_insert(&mut self, set: &mut [CacheLine], slot: usize) {
        let newest = set
            .iter()
            .enumerate()
            .filter(|(index, line)| *index != slot && line.is_valid())
            .map(|(_, line)| line.metric)
            .max();
        set[slot].metric = newest.map_or(1, |order| order + 1);
    }

    fn choose_victim(&mut self, set: &mut [CacheLine]) -> usize {
        // Everyone moves one place up the queue, whoever reaches the front leaves
        for line in set.iter_mut().filter(|line| line.is_valid()) {
            line.metric = line.metric.saturating_sub(1);
        }
        match set.iter().position(|line| line.is_valid() && line.metric == 0) {
            Some(slot) => slot,
            None => lowest_metric(set),
        }
    }
}

/// Least Frequently Used replacement policy
///
/// The metric counts hits since the line was filled
#[derive(Debug, Default)]
pub struct LeastFrequentlyUsed;

impl ReplacementPolicy for LeastFrequentlyUsed {
    fn on_insert(&mut self, set: &mut [CacheLine], slot: usize) {
        set[slot].metric = 0;
    }

    fn on_touch(&mut self, set: &mut [CacheLine], slot: usize) {
        set[slot].metric += 1;
    }

    fn choose_victim(&mut self, set: &mut [CacheLine]) -> usize {
        lowest_metric(set)
    }
}

/// The valid line with the smallest metric, lowest slot first on ties
fn lowest_metric(set: &[CacheLine]) -> usize {
    let mut victim = 0;
    let mut lowest = None;
    for (index, line) in set.iter().enumerate() {
        if line.is_valid() && lowest.map_or(true, |metric| line.metric < metric) {
            lowest = Some(line.metric);
            victim = index;
        }
    }
    victim
}
