use std::io::BufRead;
use tracing::warn;
use crate::error::TraceError;
use crate::operation::{AccessKind, MemoryOperation};

/// Where the access kind and the address live in a whitespace separated trace line
///
/// Trace sources disagree on their column layout, so none is baked into the simulator. Columns are
/// zero-based
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TraceSchema {
    pub kind_column: usize,
    pub address_column: usize,
    pub load_token: String,
    pub store_token: String,
}

impl TraceSchema {
    /// `L`/`S` in column 7, hex address in column 9. Other records in the same trace (instruction
    /// fetches and the like) are skipped
    pub fn flagged() -> Self {
        Self {
            kind_column: 7,
            address_column: 9,
            load_token: "L".into(),
            store_token: "S".into(),
        }
    }

    /// `LD`/`ST` in column 0, hex address in column 2, e.g. `LD 4 0x7fff5a8c`
    pub fn mnemonic() -> Self {
        Self {
            kind_column: 0,
            address_column: 2,
            load_token: "LD".into(),
            store_token: "ST".into(),
        }
    }

    /// Parses one trace line
    ///
    /// Blank lines and records which are neither loads nor stores give `Ok(None)`
    ///
    /// # Arguments
    ///
    /// * `line_number`: One-based, for error reporting
    /// * `line`: The raw line
    ///
    /// returns: Result<Option<MemoryOperation>, TraceError>
    pub fn parse_line(&self, line_number: usize, line: &str) -> Result<Option<MemoryOperation>, TraceError> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        let missing = |column| TraceError::MissingField { line: line_number, column };
        let kind_token = line.split_whitespace().nth(self.kind_column).ok_or_else(|| missing(self.kind_column))?;
        let kind = if kind_token == self.load_token {
            AccessKind::Load
        } else if kind_token == self.store_token {
            AccessKind::Store
        } else {
            return Ok(None);
        };
        let address_token = line.split_whitespace().nth(self.address_column).ok_or_else(|| missing(self.address_column))?;
        let address = parse_address(address_token).ok_or_else(|| TraceError::BadAddress {
            line: line_number,
            text: address_token.to_string(),
        })?;
        Ok(Some(MemoryOperation { kind, address }))
    }
}

impl Default for TraceSchema {
    fn default() -> Self {
        Self::flagged()
    }
}

/// Parses a hexadecimal address, with or without a `0x` prefix
///
/// # Examples
///
/// ```
/// use cachelib::trace::parse_address;
/// assert_eq!(parse_address("0x7fff5a8c"), Some(0x7fff5a8c));
/// assert_eq!(parse_address("000000000000000A"), Some(10));
/// assert_eq!(parse_address("0xZZ"), None);
/// ```
pub fn parse_address(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}

/// Yields the memory operations of a trace in order, skipping records which aren't loads or
/// stores
///
/// Lines are read as raw bytes and decoded lossily, so bytes which aren't UTF-8 only matter when
/// they land in the address of a load or store
pub struct TraceReader<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    schema: TraceSchema,
    line_number: usize,
    skipped: u64,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R, schema: TraceSchema) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            schema,
            line_number: 0,
            skipped: 0,
        }
    }

    /// Non-blank records so far which weren't memory operations
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<MemoryOperation, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;
            let line = String::from_utf8_lossy(&self.buffer);
            match self.schema.parse_line(self.line_number, &line) {
                Ok(Some(operation)) => return Some(Ok(operation)),
                Ok(None) => {
                    if !line.trim().is_empty() {
                        self.skipped += 1;
                    }
                }
                Err(e) => {
                    warn!(line = self.line_number, "Rejected trace record: {e}");
                    return Some(Err(e));
                }
            }
        }
    }
}
