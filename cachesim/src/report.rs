use std::fmt;
use cachelib::config::CacheConfig;
use cachelib::simulator::SimulationReport;

/// The configuration block printed before a run
pub struct ConfigBlock<'a>(pub &'a CacheConfig);

/// The human readable statistics block
pub struct StatsBlock<'a>(pub &'a SimulationReport);

impl fmt::Display for ConfigBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        writeln!(f, "=========== Configuration ==================")?;
        writeln!(f, "Cache size           : {}", config.cache_size())?;
        writeln!(f, "Block size           : {}", config.block_size())?;
        writeln!(f, "Associativity        : {}", config.associativity())?;
        writeln!(f, "Number of sets       : {}", config.num_sets())?;
        writeln!(f, "Replacement policy   : {}", config.replacement_policy())?;
        writeln!(f, "Write policy         : {}", config.write_policy())
    }
}

impl fmt::Display for StatsBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let statistics = &report.statistics;
        writeln!(f, "============ Stats =========================")?;
        writeln!(f, "Total Memory Accesses            : {}", report.total_accesses)?;
        writeln!(f, "Number of Read Accesses          : {}", statistics.read_accesses())?;
        writeln!(f, "Number of Write Accesses         : {}", statistics.write_accesses())?;
        writeln!(f)?;
        writeln!(f, "Total Cache Hits                 : {}", report.hits)?;
        writeln!(f, "Number of Read Hits              : {}", report.read_hits)?;
        writeln!(f, "Number of Write Hits             : {}", report.write_hits)?;
        writeln!(f)?;
        writeln!(f, "Total Cache Misses               : {}", report.total_misses)?;
        writeln!(f, "Number of Read Misses            : {}", statistics.read_misses())?;
        writeln!(f, "Number of Write Misses           : {}", statistics.write_misses())?;
        writeln!(f)?;
        writeln!(f, "Cache Block Evictions            : {}", statistics.evictions())?;
        writeln!(f, "Number of writes to WriteBuffer  : {}", statistics.write_buffer_writes())?;
        writeln!(f)?;
        match report.miss_rate {
            Some(rate) => writeln!(f, "Miss Rate                        : {:.2} %", rate * 100.0)?,
            None => writeln!(f, "Miss Rate                        : no data")?,
        }
        match report.average_memory_access_time {
            Some(amat) => writeln!(f, "Avg Memory Access Time(cycles)   : {amat:.2}")?,
            None => writeln!(f, "Avg Memory Access Time(cycles)   : no data")?,
        }
        match report.simplified_average_memory_access_time {
            Some(amat) => writeln!(f, "Simplified AMAT (1 + MR * 100)   : {amat:.2}"),
            None => writeln!(f, "Simplified AMAT (1 + MR * 100)   : no data"),
        }
    }
}
