//! Configuration of a linear text scan.

use crate::{
    disassembler::decoder::Coverage,
    file::aout::{AoutHeader, AOUT_HEADER_SIZE},
};

/// Parameters of [`crate::disassembler::decode_stream`].
///
/// Offsets are buffer offsets; `base` is the load address the byte at `start` maps to, so the
/// instruction at offset `o` gets address `base + (o - start)`.
///
/// # Examples
///
/// ```rust
/// use pdpscope::disassembler::{Coverage, DisassemblerConfig};
///
/// let config = DisassemblerConfig::default()
///     .with_base(0o40000)
///     .with_end(0o2220)
///     .with_coverage(Coverage::MINIMAL);
///
/// assert_eq!(config.start, 16);
/// assert_eq!(config.address_of(20), 0o40004);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisassemblerConfig {
    /// Buffer offset of the first instruction
    pub start: usize,
    /// Load address of `start`
    pub base: u64,
    /// Buffer offset the scan stops at; the buffer end if `None`
    pub end: Option<usize>,
    /// Instruction groups to recognize
    pub coverage: Coverage,
}

impl Default for DisassemblerConfig {
    fn default() -> Self {
        DisassemblerConfig {
            start: AOUT_HEADER_SIZE,
            base: 0,
            end: None,
            coverage: Coverage::all(),
        }
    }
}

impl DisassemblerConfig {
    /// Scans exactly the text segment announced by `header`, loaded at address 0.
    #[must_use]
    pub fn for_header(header: &AoutHeader) -> Self {
        let text = header.text_range();
        DisassemblerConfig {
            start: text.start,
            end: Some(text.end),
            ..Default::default()
        }
    }

    /// Sets the offset of the first instruction.
    #[must_use]
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Sets the load address of the first instruction.
    #[must_use]
    pub fn with_base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    /// Sets the offset the scan stops at.
    #[must_use]
    pub fn with_end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the recognized instruction groups.
    #[must_use]
    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Load address of buffer offset `offset`.
    ///
    /// Offsets before `start` map below `base`, wrapping on underflow.
    #[must_use]
    pub fn address_of(&self, offset: usize) -> u64 {
        self.base
            .wrapping_add(offset as u64)
            .wrapping_sub(self.start as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DisassemblerConfig::default();

        assert_eq!(config.start, 16);
        assert_eq!(config.base, 0);
        assert_eq!(config.end, None);
        assert_eq!(config.coverage, Coverage::all());
        assert_eq!(config.address_of(16), 0);
        assert_eq!(config.address_of(0o22), 2);
    }

    #[test]
    fn from_header() {
        let data: Vec<u8> = [0o407_u16, 0o100, 0, 0, 0, 0, 0, 1]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        let header = AoutHeader::parse(&data).unwrap();
        let config = DisassemblerConfig::for_header(&header);

        assert_eq!(config.start, 16);
        assert_eq!(config.end, Some(16 + 0o100));
    }
}
