use std::fs::File;
use std::io::{BufRead, BufReader};
use crate::error::TraceError;

// Make sure reads are aligned with the page size, 4096 is the standard block size (or a multiple of it) on most systems
const BUFFER_SIZE: usize = 16 * 4096;

/// Opens a trace file for sequential line-by-line reading
pub fn get_reader(file: File) -> Result<Box<dyn BufRead>, TraceError> {
    // Mapping an empty file fails on some platforms, and there's nothing to gain anyway
    if file.metadata()?.len() == 0 {
        return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)));
    }
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
    // Memory map the file for speed on unix systems
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        // SAFETY: the trace is only read, and is expected not to be modified while the simulation runs
        let mapped = unsafe { Mmap::map(&file)? };
        mapped.advise(Advice::Sequential)?;
        Ok(Box::new(Cursor::new(mapped)))
    }
}
