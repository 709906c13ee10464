//! RFC 6242 NETCONF/SSH message framing.
//!
//! Two byte-driven parsers, each fed arbitrary socket-read slices and
//! reporting [`FramerStatus::Stop`] once a complete message has been
//! accumulated:
//!
//! - [`HelloFramer`] — NETCONF 1.0 end-of-message framing (`]]>]]>`),
//!   used exactly once per session for the capability exchange.
//! - [`ChunkFramer`] — NETCONF 1.1 chunked framing
//!   (`\n#<size>\n<data>` ... `\n##\n`), used for every steady-state RPC.
//!
//! Both parsers buffer partial input across reads: a chunk-size line split
//! mid-digits by the transport is "not yet complete", never "malformed".
//! Framing violations abort the in-flight RPC with [`Error::Parse`] but do
//! not tear down the connection.

use crate::error::Error;

/// NETCONF 1.0 end-of-message terminator.
pub const NETCONF_1_0_TERMINATOR: &[u8] = b"]]>]]>";

/// Largest chunk-size value permitted by RFC 6242 section 4.2.
pub const MAX_CHUNK_SIZE: u64 = 4_294_967_295;

// A chunk-size line is at most `\n#` + 10 digits (the max value has 10).
const MAX_CHUNK_HEADER_LEN: usize = 12;

/// Result of feeding bytes to a framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerStatus {
    /// More bytes are needed to complete the message.
    Continue,
    /// A complete message has been accumulated.
    Stop,
}

/// Byte-fed message framer, driven by the SSH receive loop.
pub trait Framer {
    /// Consume one read's worth of bytes.
    fn feed(&mut self, data: &[u8]) -> Result<FramerStatus, Error>;

    /// The accumulated message payload so far.
    fn message(&self) -> &[u8];
}

// ── Hello framer ─────────────────────────────────────────────────────

/// Scans for the `]]>]]>` terminator, buffering everything before it.
#[derive(Debug, Default)]
pub struct HelloFramer {
    buf: Vec<u8>,
    end: Option<usize>,
}

impl HelloFramer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Framer for HelloFramer {
    fn feed(&mut self, data: &[u8]) -> Result<FramerStatus, Error> {
        if self.end.is_some() {
            return Ok(FramerStatus::Stop);
        }
        self.buf.extend_from_slice(data);
        match find_subslice(&self.buf, NETCONF_1_0_TERMINATOR) {
            Some(pos) => {
                self.end = Some(pos);
                Ok(FramerStatus::Stop)
            }
            None => Ok(FramerStatus::Continue),
        }
    }

    fn message(&self) -> &[u8] {
        match self.end {
            Some(pos) => &self.buf[..pos],
            None => &self.buf,
        }
    }
}

// ── Chunk framer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    ScanningForLfHash,
    ScanningForChunkStart,
    ScanningForChunkData { bytes_left: u64 },
    ScanningForEndOfChunks,
    Done,
}

/// Outcome of attempting to parse a `\n#<size>\n` chunk header.
enum ChunkHeader {
    /// Complete header: chunk size and bytes consumed.
    Complete { size: u64, consumed: usize },
    /// A valid prefix of a header; wait for more bytes.
    Incomplete,
}

/// RFC 6242 chunked-framing state machine.
///
/// Chunk-data bytes from all chunks are concatenated into a single message
/// buffer; the `\n##\n` end-of-chunks sentinel completes it.
#[derive(Debug)]
pub struct ChunkFramer {
    state: ChunkState,
    pending: Vec<u8>,
    message: Vec<u8>,
}

impl Default for ChunkFramer {
    fn default() -> Self {
        Self {
            state: ChunkState::ScanningForLfHash,
            pending: Vec::new(),
            message: Vec::new(),
        }
    }
}

impl ChunkFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of the completed message buffer.
    pub fn into_message(self) -> Vec<u8> {
        self.message
    }

    /// Parse a chunk header from the start of `buf` (which is known to begin
    /// with `\n#` followed by a non-`#` byte).
    ///
    /// The chunk-size field is a string of decimal digits; leading zeros are
    /// prohibited and the maximum value is [`MAX_CHUNK_SIZE`]. Digits split
    /// across reads must be buffered and retried, so "no terminating LF yet
    /// within the maximum header length" is reported as [`ChunkHeader::
    /// Incomplete`] rather than an error.
    fn parse_chunk_header(buf: &[u8]) -> Result<ChunkHeader, Error> {
        debug_assert!(buf.starts_with(b"\n#"));
        let digits = &buf[2..];
        let mut len = 0usize;
        for &b in digits {
            match b {
                b'0'..=b'9' => {
                    if len == 0 && b == b'0' {
                        return Err(Self::malformed_header(buf));
                    }
                    len += 1;
                    if 2 + len > MAX_CHUNK_HEADER_LEN {
                        return Err(Self::malformed_header(buf));
                    }
                }
                b'\n' => {
                    if len == 0 {
                        return Err(Self::malformed_header(buf));
                    }
                    let text = std::str::from_utf8(&digits[..len])
                        .map_err(|_| Self::malformed_header(buf))?;
                    let size: u64 = text
                        .parse()
                        .map_err(|_| Self::malformed_header(buf))?;
                    if size > MAX_CHUNK_SIZE {
                        return Err(Error::parse(
                            format!("chunk size {size} is larger than {MAX_CHUNK_SIZE}"),
                            String::from_utf8_lossy(buf),
                        ));
                    }
                    return Ok(ChunkHeader::Complete {
                        size,
                        consumed: 2 + len + 1,
                    });
                }
                _ => return Err(Self::malformed_header(buf)),
            }
        }
        Ok(ChunkHeader::Incomplete)
    }

    fn malformed_header(buf: &[u8]) -> Error {
        Error::parse(
            "expected match for chunk start, didn't get one",
            String::from_utf8_lossy(buf),
        )
    }
}

impl Framer for ChunkFramer {
    fn feed(&mut self, data: &[u8]) -> Result<FramerStatus, Error> {
        self.pending.extend_from_slice(data);
        loop {
            match self.state {
                ChunkState::ScanningForLfHash => {
                    if self.pending.len() < 3 {
                        return Ok(FramerStatus::Continue);
                    }
                    if &self.pending[..2] != b"\n#" {
                        return Err(Error::parse(
                            "expected LF HASH, but didn't get one",
                            String::from_utf8_lossy(&self.pending),
                        ));
                    }
                    self.state = if self.pending[2] == b'#' {
                        ChunkState::ScanningForEndOfChunks
                    } else {
                        ChunkState::ScanningForChunkStart
                    };
                }
                ChunkState::ScanningForChunkStart => {
                    match Self::parse_chunk_header(&self.pending)? {
                        ChunkHeader::Complete { size, consumed } => {
                            self.pending.drain(..consumed);
                            self.state = ChunkState::ScanningForChunkData { bytes_left: size };
                        }
                        ChunkHeader::Incomplete => return Ok(FramerStatus::Continue),
                    }
                }
                ChunkState::ScanningForChunkData { bytes_left } => {
                    let available = self.pending.len() as u64;
                    if available >= bytes_left {
                        let take = usize::try_from(bytes_left).unwrap_or(usize::MAX);
                        self.message.extend_from_slice(&self.pending[..take]);
                        self.pending.drain(..take);
                        self.state = ChunkState::ScanningForLfHash;
                    } else {
                        self.message.extend_from_slice(&self.pending);
                        self.pending.clear();
                        self.state = ChunkState::ScanningForChunkData {
                            bytes_left: bytes_left - available,
                        };
                        return Ok(FramerStatus::Continue);
                    }
                }
                ChunkState::ScanningForEndOfChunks => {
                    if self.pending.len() < 4 {
                        return Ok(FramerStatus::Continue);
                    }
                    if &self.pending[..4] != b"\n##\n" {
                        return Err(Error::parse(
                            "did not receive the end of chunks sequence LF HASH HASH LF",
                            String::from_utf8_lossy(&self.pending),
                        ));
                    }
                    self.state = ChunkState::Done;
                    return Ok(FramerStatus::Stop);
                }
                ChunkState::Done => return Ok(FramerStatus::Stop),
            }
        }
    }

    fn message(&self) -> &[u8] {
        &self.message
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

// ── Tests ────────────────────────────────────────────────────────────
