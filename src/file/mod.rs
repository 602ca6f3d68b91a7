//! a.out executable loading.
//!
//! This module wraps the raw bytes of a PDP-11 Unix executable together with its parsed
//! [`AoutHeader`]. The bytes come from a [`Backend`]: either a memory-mapped file on disk
//! ([`File::from_file`]) or a buffer the caller already owns ([`File::from_mem`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use pdpscope::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("ttt"))?;
//! println!("{} text bytes, entry {:06o}", file.text().len(), file.header().entry);
//!
//! let disassembly = file.disassemble()?;
//! println!("{} instructions", disassembly.instructions().len());
//! # Ok::<(), pdpscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! [`File`] is `Send + Sync`; the backends are immutable after construction.

pub mod aout;
pub mod io;
pub mod parser;

mod physical;

use std::path::Path;

use crate::{
    disassembler::{decode_stream, DisassemblerConfig, Disassembly},
    Error::{Empty, OutOfBounds},
    Result,
};
use aout::AoutHeader;
use physical::Physical;

/// Source of executable bytes.
///
/// Implemented by the memory-mapped [`Physical`] backend and by plain `Vec<u8>` buffers.
/// Backends are immutable after construction and must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.data();
        match offset.checked_add(len) {
            Some(end) if end <= data.len() => Ok(&data[offset..end]),
            _ => Err(OutOfBounds),
        }
    }
}

impl Backend for Vec<u8> {
    fn data(&self) -> &[u8] {
        self
    }
}

/// A loaded a.out executable.
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed header.
    header: AoutHeader,
}

impl File {
    /// Loads an executable from the given path. The file is memory-mapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is empty, or does not carry a
    /// recognized a.out header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads an executable from a memory buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty or does not carry a recognized a.out header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        Self::load(data)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let header = AoutHeader::parse(data.data())?;
        let announced = header.text_range();
        if announced.end > data.len() {
            log::warn!(
                "text segment announces {} bytes but only {} are present",
                header.text_size,
                data.len().saturating_sub(announced.start)
            );
        }

        Ok(File {
            data: Box::new(data),
            header,
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Returns the parsed a.out header.
    #[must_use]
    pub fn header(&self) -> &AoutHeader {
        &self.header
    }

    /// Returns the complete file contents, header included.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns a bounds-checked slice of the file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the file.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }

    /// Returns the text segment bytes, clamped to what the file actually contains.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        let data = self.data.data();
        let range = self.header.text_range();
        let end = range.end.min(data.len());
        let start = range.start.min(end);
        &data[start..end]
    }

    /// Disassembles the text segment with the default configuration for this header.
    ///
    /// # Errors
    ///
    /// See [`crate::disassembler::decode_stream`].
    pub fn disassemble(&self) -> Result<Disassembly> {
        self.disassemble_with(&DisassemblerConfig::for_header(&self.header))
    }

    /// Disassembles the file with an explicit configuration.
    ///
    /// Offsets in `config` are file offsets, i.e. the text segment starts at 16.
    ///
    /// # Errors
    ///
    /// See [`crate::disassembler::decode_stream`].
    pub fn disassemble_with(&self, config: &DisassemblerConfig) -> Result<Disassembly> {
        decode_stream(self.data.data(), config)
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("len", &self.len())
            .field("header", &self.header)
            .finish()
    }
}
