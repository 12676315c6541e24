//! Memory Trace Records and Sources.
//!
//! This module turns valgrind-style memory traces into typed records. It provides:
//! 1. **Records:** [`TraceRecord`] and [`Operation`], parsed from `<op> <hex-address>,<size>`.
//! 2. **Sources:** The [`TraceSource`] trait, any fallible iterator of records.
//! 3. **Reader:** [`TraceReader`], a line-oriented source over any [`BufRead`].
//!
//! Leading whitespace before the operation letter is tolerated, as valgrind
//! indents data accesses by one space. Blank lines are skipped silently; lines
//! of any other shape surface as [`TraceError::Malformed`].

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::common::addr::Address;
use crate::common::error::TraceError;

/// Kind of memory access a trace record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `I`: instruction fetch. Not simulated.
    Instruction,
    /// `L`: data load.
    Load,
    /// `S`: data store.
    Store,
    /// `M`: data modify, a load immediately followed by a store to the same address.
    Modify,
    /// Any other letter. Treated exactly like an instruction fetch.
    Unknown(char),
}

impl Operation {
    /// Maps a trace letter to its operation.
    pub const fn from_char(c: char) -> Self {
        match c {
            'I' => Self::Instruction,
            'L' => Self::Load,
            'S' => Self::Store,
            'M' => Self::Modify,
            other => Self::Unknown(other),
        }
    }

    /// Returns the trace letter for this operation.
    pub const fn as_char(self) -> char {
        match self {
            Self::Instruction => 'I',
            Self::Load => 'L',
            Self::Store => 'S',
            Self::Modify => 'M',
            Self::Unknown(c) => c,
        }
    }

    /// Returns `true` for the data accesses the cache simulates (L, S, M).
    pub const fn is_data_access(self) -> bool {
        matches!(self, Self::Load | Self::Store | Self::Modify)
    }

    /// Number of logical cache accesses the record performs.
    pub const fn access_count(self) -> u64 {
        match self {
            Self::Load | Self::Store => 1,
            Self::Modify => 2,
            Self::Instruction | Self::Unknown(_) => 0,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One line of a memory trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Access kind.
    pub op: Operation,
    /// Accessed address.
    pub address: Address,
    /// Access width in bytes. Informational; the cache model ignores it.
    pub size: u32,
}

impl TraceRecord {
    /// Creates a record.
    pub const fn new(op: Operation, address: u64, size: u32) -> Self {
        Self {
            op,
            address: Address::new(address),
            size,
        }
    }
}

impl FromStr for TraceRecord {
    type Err = &'static str;

    /// Parses `<op> <hex-address>,<size>`.
    ///
    /// Surrounding whitespace is ignored and the address may carry a `0x`
    /// prefix. The error is a short reason suitable for a diagnostic.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut chars = line.chars();
        let op = chars.next().ok_or("empty line")?;
        let (addr, size) = chars
            .as_str()
            .trim_start()
            .split_once(',')
            .ok_or("expected `<address>,<size>`")?;

        let addr = addr.trim_end();
        let digits = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .unwrap_or(addr);
        if digits.is_empty() {
            return Err("missing address");
        }
        let address = u64::from_str_radix(digits, 16).map_err(|_| "invalid hex address")?;
        let size = size.trim().parse().map_err(|_| "invalid access size")?;

        Ok(Self::new(Operation::from_char(op), address, size))
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:x},{}", self.op, self.address, self.size)
    }
}

/// Parses a single trace line.
///
/// # Errors
///
/// [`TraceError::Malformed`] if the line is not `<op> <hex-address>,<size>`.
/// `line_no` is only used to label the error.
pub fn parse_line(line_no: usize, line: &str) -> Result<TraceRecord, TraceError> {
    line.parse().map_err(|reason| TraceError::Malformed {
        line: line_no,
        content: line.trim().to_string(),
        reason,
    })
}

/// A producer of trace records, consumed in order by the simulation driver.
///
/// Any iterator over `Result<TraceRecord, TraceError>` is a trace source, so
/// in-memory traces are simply `vec.into_iter()`.
pub trait TraceSource: Iterator<Item = Result<TraceRecord, TraceError>> {}

impl<I> TraceSource for I where I: Iterator<Item = Result<TraceRecord, TraceError>> {}

/// Line-oriented trace source over a buffered reader.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `reader`. Lines are numbered from 1.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    /// Number of lines consumed so far, blank and malformed ones included.
    pub const fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl TraceReader<BufReader<File>> {
    /// Opens a trace file.
    ///
    /// # Errors
    ///
    /// [`TraceError::Io`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, TraceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(TraceError::Io(e))),
            }
            self.line_no += 1;

            let Ok(line) = std::str::from_utf8(&self.buf) else {
                return Some(Err(TraceError::Malformed {
                    line: self.line_no,
                    content: String::from_utf8_lossy(&self.buf).trim().to_string(),
                    reason: "not valid UTF-8",
                }));
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_line(self.line_no, line));
        }
    }
}
