use serde::Serialize;
use crate::error::NoDataError;
use crate::operation::AccessKind;

/// Cycles to deliver data to the processor on a hit, and again after a fill
pub const HIT_LATENCY: u64 = 1;

/// Cycles to fill a line from the next memory level
pub const FILL_LATENCY: u64 = 100;

/// Counters for one simulation run. They only ever increase, and only the cache updates them
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Statistics {
    read_accesses: u64,
    write_accesses: u64,
    read_misses: u64,
    write_misses: u64,
    evictions: u64,
    write_buffer_writes: u64,
    cycles: u64,
}

impl Statistics {
    pub fn read_accesses(&self) -> u64 {
        self.read_accesses
    }

    pub fn write_accesses(&self) -> u64 {
        self.write_accesses
    }

    pub fn read_misses(&self) -> u64 {
        self.read_misses
    }

    pub fn write_misses(&self) -> u64 {
        self.write_misses
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn write_buffer_writes(&self) -> u64 {
        self.write_buffer_writes
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn total_accesses(&self) -> u64 {
        self.read_accesses + self.write_accesses
    }

    pub fn total_misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    pub fn hits(&self) -> u64 {
        self.total_accesses() - self.total_misses()
    }

    pub fn read_hits(&self) -> u64 {
        self.read_accesses - self.read_misses
    }

    pub fn write_hits(&self) -> u64 {
        self.write_accesses - self.write_misses
    }

    /// `total_misses / total_accesses`
    pub fn miss_rate(&self) -> Result<f64, NoDataError> {
        let accesses = self.accesses_recorded()?;
        Ok(self.total_misses() as f64 / accesses)
    }

    /// Average memory access time in cycles, `total_cycles / total_accesses`
    ///
    /// This is the canonical figure, it accounts for every cycle actually charged
    pub fn average_memory_access_time(&self) -> Result<f64, NoDataError> {
        let accesses = self.accesses_recorded()?;
        Ok(self.cycles as f64 / accesses)
    }

    /// The textbook approximation `hit_time + miss_rate * miss_penalty`
    ///
    /// A secondary figure only, [`Statistics::average_memory_access_time`] is the canonical one.
    /// While a miss is charged exactly `FILL_LATENCY + HIT_LATENCY` cycles the two agree, any other
    /// charging makes them drift apart
    pub fn simplified_average_memory_access_time(&self) -> Result<f64, NoDataError> {
        Ok(HIT_LATENCY as f64 + self.miss_rate()? * FILL_LATENCY as f64)
    }

    fn accesses_recorded(&self) -> Result<f64, NoDataError> {
        match self.total_accesses() {
            0 => Err(NoDataError),
            accesses => Ok(accesses as f64),
        }
    }

    pub(crate) fn record_access(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Load => self.read_accesses += 1,
            AccessKind::Store => self.write_accesses += 1,
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.cycles += HIT_LATENCY;
    }

    pub(crate) fn record_miss(&mut self, kind: AccessKind) {
        match kind {
            AccessKind::Load => self.read_misses += 1,
            AccessKind::Store => self.write_misses += 1,
        }
        self.cycles += FILL_LATENCY + HIT_LATENCY;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_write_buffer_writes(&mut self, writes: u64) {
        self.write_buffer_writes += writes;
    }
}
