use std::io::BufRead;
use std::time::{Duration, Instant};
use serde::Serialize;
use tracing::debug;
use crate::cache::{AccessOutcome, CacheTrait, GenericCache};
use crate::config::CacheConfig;
use crate::error::{ConfigError, TraceError};
use crate::operation::MemoryOperation;
use crate::statistics::Statistics;
use crate::trace::{TraceReader, TraceSchema};

/// The simulator replays traces against a cache and collects results.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly
#[derive(Debug)]
pub struct Simulator {
    cache: GenericCache,
    schema: TraceSchema,
    skipped_records: u64,
    simulation_time: Duration,
}

/// The result of a simulation, everything a report needs. Can be serialised as JSON
///
/// The derived figures are `None` until at least one access has been recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub config: CacheConfig,
    #[serde(flatten)]
    pub statistics: Statistics,
    pub total_accesses: u64,
    pub total_misses: u64,
    pub hits: u64,
    pub read_hits: u64,
    pub write_hits: u64,
    pub miss_rate: Option<f64>,
    pub average_memory_access_time: Option<f64>,
    pub simplified_average_memory_access_time: Option<f64>,
    pub skipped_records: u64,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A validated cache configuration
    /// * `schema`: The column layout of the traces this simulator will read
    ///
    /// returns: Result<Simulator, ConfigError>
    pub fn new(config: &CacheConfig, schema: TraceSchema) -> Result<Self, ConfigError> {
        Self::with_seed(config, schema, None)
    }

    /// As [`Simulator::new`], with a fixed seed for the random replacement policy
    pub fn with_seed(config: &CacheConfig, schema: TraceSchema, seed: Option<u64>) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: GenericCache::with_seed(config, seed)?,
            schema,
            skipped_records: 0,
            simulation_time: Duration::ZERO,
        })
    }

    /// Processes a single operation, adding its time to the execution time
    pub fn run(&mut self, operation: MemoryOperation) -> AccessOutcome {
        let start = Instant::now();
        let outcome = self.cache.run(operation);
        self.simulation_time += start.elapsed();
        outcome
    }

    /// Replays already parsed operations in order
    pub fn simulate_operations<I>(&mut self, operations: I) -> &Statistics
    where
        I: IntoIterator<Item = MemoryOperation>,
    {
        let start = Instant::now();
        for operation in operations {
            self.cache.run(operation);
        }
        self.simulation_time += start.elapsed();
        self.cache.statistics()
    }

    /// Replays a trace, line by line
    ///
    /// Reads are *guaranteed to be sequential*, so a memory mapped trace can be advised as such.
    /// Stops at the first malformed load or store record; operations before it have already been
    /// applied
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace
    ///
    /// returns: Result<&Statistics, TraceError>
    pub fn simulate<R: BufRead>(&mut self, reader: R) -> Result<&Statistics, TraceError> {
        let start = Instant::now();
        let mut trace = TraceReader::new(reader, self.schema.clone());
        let result = trace.by_ref().try_for_each(|operation| {
            self.cache.run(operation?);
            Ok::<(), TraceError>(())
        });
        self.skipped_records += trace.skipped();
        self.simulation_time += start.elapsed();
        result?;
        debug!(
            accesses = self.cache.statistics().total_accesses(),
            skipped = trace.skipped(),
            "Finished replaying trace"
        );
        Ok(self.cache.statistics())
    }

    pub fn cache(&self) -> &GenericCache {
        &self.cache
    }

    pub fn statistics(&self) -> &Statistics {
        self.cache.statistics()
    }

    /// Trace records seen so far which weren't loads or stores
    pub fn skipped_records(&self) -> u64 {
        self.skipped_records
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    pub fn report(&self) -> SimulationReport {
        let statistics = *self.cache.statistics();
        SimulationReport {
            config: self.cache.config().clone(),
            statistics,
            total_accesses: statistics.total_accesses(),
            total_misses: statistics.total_misses(),
            hits: statistics.hits(),
            read_hits: statistics.read_hits(),
            write_hits: statistics.write_hits(),
            miss_rate: statistics.miss_rate().ok(),
            average_memory_access_time: statistics.average_memory_access_time().ok(),
            simplified_average_memory_access_time: statistics.simplified_average_memory_access_time().ok(),
            skipped_records: self.skipped_records,
        }
    }
}
