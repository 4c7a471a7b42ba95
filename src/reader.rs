//! Bounds-checked cursor over a received datagram.

use std::fmt;

/// Read past the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underrun {
    pub offset: usize,
    pub wanted: usize,
    pub available: usize,
}

impl fmt::Display for Underrun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wanted {} bytes at offset {}, {} available",
            self.wanted, self.offset, self.available
        )
    }
}

impl std::error::Error for Underrun {}

/// Big-endian reader with an explicit position
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Underrun> {
        if len > self.remaining() {
            return Err(Underrun {
                offset: self.pos,
                wanted: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Underrun> {
        self.read_bytes(len).map(|_| ())
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, Underrun> {
        self.buf.get(self.pos).copied().ok_or(Underrun {
            offset: self.pos,
            wanted: 1,
            available: 0,
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, Underrun> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Underrun> {
        self.read_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, Underrun> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Underrun> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }
}
