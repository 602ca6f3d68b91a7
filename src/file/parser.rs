//! Cursor-based byte stream parser for PDP-11 word streams.
//!
//! [`Parser`] maintains a position within a byte slice and offers bounds-checked
//! little-endian reads. The instruction decoder threads a single parser through an opcode
//! word and every extension word its operands demand, so the parser position after a decode
//! is always the offset of the next instruction.
//!
//! # Examples
//!
//! ```rust
//! use pdpscope::Parser;
//!
//! let data = [0o300, 0o025, 0o005, 0o000]; // mov $5, r0
//! let mut parser = Parser::new(&data);
//!
//! let opcode = parser.read_le::<u16>()?;
//! let immediate = parser.read_le::<u16>()?;
//! assert_eq!(opcode, 0o012700);
//! assert_eq!(immediate, 5);
//! assert!(!parser.has_more_data());
//! # Ok::<(), pdpscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, PdpIO},
    Error::OutOfBounds,
    Result,
};

/// A cursor over a borrowed byte slice.
///
/// The parser never owns its data; it is cheap to create one per decode request and the
/// same buffer may be parsed by any number of parsers concurrently.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] from a byte slice, positioned at offset 0.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to exactly `len()` is allowed and leaves the parser exhausted.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the new position would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        let Some(pos) = self.position.checked_add(step) else {
            return Err(OutOfBounds);
        };
        self.seek(pos)
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the complete underlying buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the number of bytes remaining from the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Ensures that at least `needed` bytes are available from the current position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `needed` bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(OutOfBounds);
        }
        Ok(())
    }

    /// Read a type `T` from the current position in little-endian format and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: PdpIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a type `T` from the current position without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn peek_le<T: PdpIO>(&self) -> Result<T> {
        let mut position = self.position;
        read_le_at::<T>(self.data, &mut position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_track_position() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_le::<u16>().unwrap(), 0x0201);
        assert_eq!(parser.pos(), 2);
        assert_eq!(parser.remaining(), 2);
        assert_eq!(parser.peek_le::<u16>().unwrap(), 0x0403);
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn seek_bounds() {
        let data = [0u8; 4];
        let mut parser = Parser::new(&data);

        assert!(parser.seek(4).is_ok());
        assert!(!parser.has_more_data());
        assert!(parser.seek(5).is_err());
        assert!(parser.advance_by(1).is_err());
    }

    #[test]
    fn ensure_remaining() {
        let data = [0u8; 3];
        let mut parser = Parser::new(&data);

        parser.ensure_remaining(3).unwrap();
        parser.advance_by(2).unwrap();
        assert!(parser.ensure_remaining(2).is_err());
        assert!(parser.read_le::<u16>().is_err());
        assert_eq!(parser.pos(), 2);
    }

    #[test]
    fn empty_parser() {
        let parser = Parser::new(&[]);
        assert!(parser.is_empty());
        assert!(!parser.has_more_data());
        assert_eq!(parser.remaining(), 0);
    }
}
