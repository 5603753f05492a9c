//! Byte source abstraction for the [ByteParser](crate::parser::ByteParser).
//!
//! Tree files handled by this crate are small enough to be held in memory,
//! so [InMemoryByteSource] is the only implementation for now.

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================#=
/// Interface the byte parser needs from its underlying data.
pub trait ByteSource {
    /// Peek at the current byte without consuming it, `None` at EOF.
    fn peek(&self) -> Option<u8>;

    /// Get the current byte and advance the position, `None` at EOF.
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns the current byte offset.
    fn position(&self) -> usize;

    /// Returns a slice of up to `k` bytes from the current position without consuming them.
    fn peek_slice(&self, k: usize) -> &[u8];

    /// Returns whether the end of data has been reached.
    fn is_eof(&self) -> bool;
}

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================#=
/// A byte source owning the complete input.
pub struct InMemoryByteSource {
    input: Vec<u8>,
    pos: usize,
}

impl InMemoryByteSource {
    /// Creates a new in-memory byte source from a vector of bytes.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            input: bytes,
            pos: 0,
        }
    }
}

impl ByteSource for InMemoryByteSource {
    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    fn peek_slice(&self, k: usize) -> &[u8] {
        let start = self.pos.min(self.input.len());
        let end = (self.pos + k).min(self.input.len());
        &self.input[start..end]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}
