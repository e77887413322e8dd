use thiserror::Error;

/// Raised once while building a [`CacheConfig`](crate::config::CacheConfig). A cache is never
/// constructed from a configuration which failed any of these checks
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown configuration parameter `{0}`")]
    UnknownKey(String),

    #[error("missing required configuration parameter `{0}` (required: blockSize, cacheSize, assoc, replacementPolicy, writePolicy)")]
    MissingKey(&'static str),

    #[error("invalid value `{value}` for configuration parameter `{key}`")]
    InvalidValue { key: String, value: String },

    #[error("malformed configuration line {line}: `{text}`")]
    MalformedLine { line: usize, text: String },

    #[error("block size {0} is not a non-zero power of two")]
    BlockSize(u64),

    #[error("cache size {0} is not a non-zero power of two")]
    CacheSize(u64),

    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    #[error("cache size {cache_size} is not a multiple of block size * associativity ({set_bytes})")]
    Geometry { cache_size: u64, set_bytes: u64 },

    #[error("derived set count {0} is not a non-zero power of two")]
    SetCount(u64),

    #[error("couldn't parse the JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("couldn't read the configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while turning trace lines into memory operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("couldn't read the trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("trace line {line} has no column {column}")]
    MissingField { line: usize, column: usize },

    #[error("trace line {line} has an unparseable address `{text}`")]
    BadAddress { line: usize, text: String },
}

/// A derived metric was requested before any access had been recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no accesses have been recorded yet")]
pub struct NoDataError;
