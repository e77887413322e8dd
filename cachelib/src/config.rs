use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

lazy_static! {
    // `key = value`, the layout of the plain text configuration files. Words after the value, such
    // as a unit, are ignored
    static ref CONFIG_LINE: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(\S+)(?:\s.*)?$").expect("config line pattern is valid");
}

/// The replacement policy used when a set is full - RANDOM, LRU, FIFO, or LFU
///
/// Names are case-insensitive in both configuration formats, JSON deserialises through [`FromStr`]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum ReplacementPolicyConfig {
    Random,
    Lru,
    Fifo,
    Lfu,
}

/// The write policy - WRITE_BACK or WRITE_THROUGH, case-insensitive like the replacement policy
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum WritePolicyConfig {
    WriteBack,
    WriteThrough,
}

impl TryFrom<String> for ReplacementPolicyConfig {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for WritePolicyConfig {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for ReplacementPolicyConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RANDOM" => Ok(Self::Random),
            "LRU" => Ok(Self::Lru),
            "FIFO" => Ok(Self::Fifo),
            "LFU" => Ok(Self::Lfu),
            _ => Err(ConfigError::InvalidValue { key: "replacementPolicy".into(), value: s.into() }),
        }
    }
}

impl FromStr for WritePolicyConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WRITE_BACK" => Ok(Self::WriteBack),
            "WRITE_THROUGH" => Ok(Self::WriteThrough),
            _ => Err(ConfigError::InvalidValue { key: "writePolicy".into(), value: s.into() }),
        }
    }
}

impl fmt::Display for ReplacementPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "RANDOM",
            Self::Lru => "LRU",
            Self::Fifo => "FIFO",
            Self::Lfu => "LFU",
        })
    }
}

impl fmt::Display for WritePolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WriteBack => "WRITE_BACK",
            Self::WriteThrough => "WRITE_THROUGH",
        })
    }
}

/// A validated configuration for a single cache
///
/// Can only be obtained through [`CacheConfig::new`] (or the loaders, which call it), so holding
/// one means every geometry check has passed. It is never mutated afterwards
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    block_size: u64,
    cache_size: u64,
    #[serde(rename = "assoc")]
    associativity: u64,
    replacement_policy: ReplacementPolicyConfig,
    write_policy: WritePolicyConfig,
}

impl CacheConfig {
    /// Validates a cache geometry and policy selection
    ///
    /// # Arguments
    ///
    /// * `block_size`: Bytes per line, a non-zero power of two
    /// * `cache_size`: Total bytes, a non-zero power of two and a multiple of
    /// `block_size * associativity`
    /// * `associativity`: Lines per set, at least 1
    /// * `replacement_policy`: Victim selection for full sets
    /// * `write_policy`: Store handling
    ///
    /// returns: Result<CacheConfig, ConfigError>
    pub fn new(
        block_size: u64,
        cache_size: u64,
        associativity: u64,
        replacement_policy: ReplacementPolicyConfig,
        write_policy: WritePolicyConfig,
    ) -> Result<Self, ConfigError> {
        if !block_size.is_power_of_two() {
            return Err(ConfigError::BlockSize(block_size));
        }
        if !cache_size.is_power_of_two() {
            return Err(ConfigError::CacheSize(cache_size));
        }
        if associativity == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        let set_bytes = block_size
            .checked_mul(associativity)
            .ok_or(ConfigError::Geometry { cache_size, set_bytes: u64::MAX })?;
        if cache_size % set_bytes != 0 {
            return Err(ConfigError::Geometry { cache_size, set_bytes });
        }
        let num_sets = cache_size / set_bytes;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCount(num_sets));
        }
        Ok(Self {
            block_size,
            cache_size,
            associativity,
            replacement_policy,
            write_policy,
        })
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn cache_size(&self) -> u64 {
        self.cache_size
    }

    pub fn associativity(&self) -> u64 {
        self.associativity
    }

    pub fn replacement_policy(&self) -> ReplacementPolicyConfig {
        self.replacement_policy
    }

    pub fn write_policy(&self) -> WritePolicyConfig {
        self.write_policy
    }

    /// `cache_size / (block_size * associativity)`, always a power of two
    pub fn num_sets(&self) -> u64 {
        self.cache_size / (self.block_size * self.associativity)
    }

    /// Total number of lines across all sets
    pub fn num_lines(&self) -> u64 {
        self.cache_size / self.block_size
    }
}

/// A configuration as read from a file, before validation
///
/// Every key is optional here so a missing one is reported by name rather than as a generic
/// deserialisation failure, and unrecognised keys are collected rather than silently dropped
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCacheConfig {
    pub block_size: Option<u64>,
    pub cache_size: Option<u64>,
    pub assoc: Option<u64>,
    pub replacement_policy: Option<ReplacementPolicyConfig>,
    pub write_policy: Option<WritePolicyConfig>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl RawCacheConfig {
    /// Checks for unknown and missing keys, then validates the geometry
    pub fn validate(self) -> Result<CacheConfig, ConfigError> {
        if let Some(key) = self.unknown.into_keys().next() {
            return Err(ConfigError::UnknownKey(key));
        }
        CacheConfig::new(
            self.block_size.ok_or(ConfigError::MissingKey("blockSize"))?,
            self.cache_size.ok_or(ConfigError::MissingKey("cacheSize"))?,
            self.assoc.ok_or(ConfigError::MissingKey("assoc"))?,
            self.replacement_policy.ok_or(ConfigError::MissingKey("replacementPolicy"))?,
            self.write_policy.ok_or(ConfigError::MissingKey("writePolicy"))?,
        )
    }
}

/// Parses the plain text format, one `key = value` per line
///
/// Blank lines and `#` comments are skipped, anything after the first word of a value is ignored,
/// and a key given twice takes its last value. Integer values may be decimal or carry a `0x`, `0o`
/// or `0b` prefix
pub fn parse_text(input: &str) -> Result<RawCacheConfig, ConfigError> {
    let mut raw = RawCacheConfig::default();
    for (number, line) in input.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let captures = CONFIG_LINE.captures(content).ok_or_else(|| ConfigError::MalformedLine {
            line: number + 1,
            text: line.to_string(),
        })?;
        let (key, value) = (&captures[1], &captures[2]);
        match key {
            "blockSize" => raw.block_size = Some(parse_integer(key, value)?),
            "cacheSize" => raw.cache_size = Some(parse_integer(key, value)?),
            "assoc" => raw.assoc = Some(parse_integer(key, value)?),
            "replacementPolicy" => raw.replacement_policy = Some(value.parse()?),
            "writePolicy" => raw.write_policy = Some(value.parse()?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
    Ok(raw)
}

/// Parses the JSON format, an object using the same keys as the text format
pub fn parse_json(input: &str) -> Result<RawCacheConfig, ConfigError> {
    Ok(serde_json::from_str(input)?)
}

/// Reads and validates a configuration file. Files ending in `.json` are parsed as JSON, anything
/// else as the plain text format
pub fn load_config(path: impl AsRef<Path>) -> Result<CacheConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let is_json = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
    let raw = if is_json { parse_json(&contents)? } else { parse_text(&contents)? };
    raw.validate()
}

fn parse_integer(key: &str, value: &str) -> Result<u64, ConfigError> {
    let (digits, radix) = match value.get(..2) {
        Some("0x") | Some("0X") => (&value[2..], 16),
        Some("0o") | Some("0O") => (&value[2..], 8),
        Some("0b") | Some("0B") => (&value[2..], 2),
        _ => (value, 10),
    };
    u64::from_str_radix(digits, radix).map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
