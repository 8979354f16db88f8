//! Save-state framing
//!
//! The emulator writes an opaque payload; the adapter wraps it so a host
//! buffer can be validated before any of it reaches the emulator:
//!
//! ```text
//! offset  size  field
//! 0       8     magic "CYTRUSST"
//! 8       4     format version, u32 LE
//! 12      8     payload length, u64 LE
//! 20      n     payload
//! ```
//!
//! Hosts hand over buffers of exactly `retro_serialize_size` bytes, which may
//! exceed the framed length. The tail is zero-filled so that serializing the
//! same state twice yields identical buffers.

use std::io::{self, Write};

use crate::error::StateError;

pub const MAGIC: [u8; 8] = *b"CYTRUSST";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = MAGIC.len() + 4 + 8;

/// Writer that only counts bytes, for sizing a payload without storing it.
#[derive(Debug, Default)]
pub struct CountingWriter {
    count: usize,
}

impl CountingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.count += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Framed size of a payload of `payload_len` bytes.
pub fn framed_len(payload_len: usize) -> usize {
    HEADER_LEN + payload_len
}

/// Frame `payload` into `buf`, zeroing whatever follows it.
///
/// Returns the number of meaningful bytes written.
pub fn write_frame(buf: &mut [u8], payload: &[u8]) -> Result<usize, StateError> {
    let needed = framed_len(payload.len());
    if buf.len() < needed {
        return Err(StateError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    buf[..8].copy_from_slice(&MAGIC);
    buf[8..12].copy_from_slice(&VERSION.to_le_bytes());
    buf[12..20].copy_from_slice(&(payload.len() as u64).to_le_bytes());
    buf[HEADER_LEN..needed].copy_from_slice(payload);
    buf[needed..].fill(0);
    Ok(needed)
}

/// Validate a framed state and return its payload.
pub fn read_frame(data: &[u8]) -> Result<&[u8], StateError> {
    if data.len() >= MAGIC.len() && data[..MAGIC.len()] != MAGIC {
        return Err(StateError::BadMagic);
    }
    if data.len() < HEADER_LEN {
        return Err(StateError::Truncated);
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&data[8..12]);
    let version = u32::from_le_bytes(version);
    if version != VERSION {
        return Err(StateError::VersionMismatch { found: version });
    }

    let mut len = [0u8; 8];
    len.copy_from_slice(&data[12..20]);
    let len = u64::from_le_bytes(len);
    let available = (data.len() - HEADER_LEN) as u64;
    if len > available {
        return Err(StateError::Truncated);
    }
    Ok(&data[HEADER_LEN..HEADER_LEN + len as usize])
}
