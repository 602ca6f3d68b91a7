//! The PDP-11 Unix `a.out` executable header.
//!
//! Every Unix V1-V6 executable starts with eight little-endian words:
//!
//! | Offset | Field |
//! |--------|-------|
//! | 0x00 | magic (`0407` OMAGIC, `0410` NMAGIC, `0411` separate I&D) |
//! | 0x02 | text segment size |
//! | 0x04 | data segment size |
//! | 0x06 | bss size |
//! | 0x08 | symbol table size |
//! | 0x0A | entry point |
//! | 0x0C | unused (stack size) |
//! | 0x0E | relocation flag (non-zero when relocation bits were stripped) |
//!
//! The text segment immediately follows the header.

use std::ops::Range;

use strum::{Display, FromRepr};

use crate::{file::parser::Parser, Error, Result};

/// Size in bytes of the fixed a.out header; also the file offset of the text segment.
pub const AOUT_HEADER_SIZE: usize = 16;

/// The executable format announced by the header magic word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u16)]
pub enum AoutMagic {
    /// `0407`: text and data contiguous and writable
    #[strum(serialize = "OMAGIC")]
    Omagic = 0o407,
    /// `0410`: read-only shared text
    #[strum(serialize = "NMAGIC")]
    Nmagic = 0o410,
    /// `0411`: separate I&D
    #[strum(serialize = "IMAGIC")]
    Imagic = 0o411,
}

/// A parsed a.out header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AoutHeader {
    /// Format magic
    pub magic: AoutMagic,
    /// Text segment size in bytes
    pub text_size: u16,
    /// Initialized data segment size in bytes
    pub data_size: u16,
    /// Uninitialized data size in bytes
    pub bss_size: u16,
    /// Symbol table size in bytes
    pub symbol_size: u16,
    /// Entry point address
    pub entry: u16,
    /// Unused word (historically the stack size)
    pub unused: u16,
    /// Relocation flag; non-zero when relocation information was stripped
    pub relocation_flag: u16,
}

impl AoutHeader {
    /// Parses the header from the first 16 bytes of `data`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::Empty`] if `data` is empty
    /// - [`crate::Error::Malformed`] if fewer than 16 bytes are present
    /// - [`crate::Error::NotSupported`] if the magic word is unknown
    pub fn parse(data: &[u8]) -> Result<AoutHeader> {
        if data.is_empty() {
            return Err(Error::Empty);
        }
        if data.len() < AOUT_HEADER_SIZE {
            return Err(malformed_error!(
                "a.out header needs {} bytes, got {}",
                AOUT_HEADER_SIZE,
                data.len()
            ));
        }

        let mut parser = Parser::new(data);
        let magic_word = parser.read_le::<u16>()?;
        let Some(magic) = AoutMagic::from_repr(magic_word) else {
            return Err(Error::NotSupported(magic_word));
        };

        Ok(AoutHeader {
            magic,
            text_size: parser.read_le()?,
            data_size: parser.read_le()?,
            bss_size: parser.read_le()?,
            symbol_size: parser.read_le()?,
            entry: parser.read_le()?,
            unused: parser.read_le()?,
            relocation_flag: parser.read_le()?,
        })
    }

    /// File offsets of the text segment as announced by the header.
    ///
    /// The range is not clamped to the file length; see [`crate::File::text`].
    #[must_use]
    pub fn text_range(&self) -> Range<usize> {
        AOUT_HEADER_SIZE..AOUT_HEADER_SIZE + usize::from(self.text_size)
    }

    /// File offsets of the initialized data segment.
    #[must_use]
    pub fn data_range(&self) -> Range<usize> {
        let start = self.text_range().end;
        start..start + usize::from(self.data_size)
    }

    /// Returns `true` if the relocation information was stripped from the file.
    #[must_use]
    pub fn relocation_stripped(&self) -> bool {
        self.relocation_flag != 0
    }
}
