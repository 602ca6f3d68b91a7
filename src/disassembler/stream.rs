//! Linear disassembly of a text segment.
//!
//! [`decode_stream`] walks the buffer from the configured start offset to the end of the text
//! segment, one instruction after the other. It never follows branches: interleaved data is
//! decoded exactly as the CPU would fetch it if execution fell into it, and every byte of the
//! scanned range is attributed to exactly one instruction.
//!
//! # Example
//!
//! ```rust
//! use pdpscope::disassembler::{decode_stream, DisassemblerConfig};
//!
//! // jsr pc, 2(pc); rts pc; rts pc
//! let code = [0o367, 0o11, 0o2, 0o0, 0o207, 0o0, 0o207, 0o0];
//! let config = DisassemblerConfig::default().with_start(0);
//! let disassembly = decode_stream(&code, &config)?;
//!
//! assert!(disassembly.is_complete());
//! assert_eq!(disassembly.instructions().len(), 3);
//! assert_eq!(disassembly.instructions()[0].target, Some(6));
//! # Ok::<(), pdpscope::Error>(())
//! ```

use std::ops::Range;

use rayon::prelude::*;

use crate::{
    disassembler::{config::DisassemblerConfig, decoder::decode_instruction, Instruction},
    file::parser::Parser,
    Error, Result,
};

/// Why a linear scan ended.
#[derive(Debug)]
pub enum StopReason {
    /// Every byte up to the end of the range was decoded
    Complete,
    /// A single byte was left over at `offset` and dropped
    TrailingByte {
        /// Buffer offset of the dropped byte
        offset: usize,
    },
    /// The instruction at `offset` needs extension words beyond the end of the range
    Truncated {
        /// Buffer offset of the incomplete instruction
        offset: usize,
        /// The decoding failure, [`Error::TruncatedOperand`]
        error: Error,
    },
}

/// The result of a linear scan: the instructions in address order plus scan bookkeeping.
#[derive(Debug)]
pub struct Disassembly {
    instructions: Vec<Instruction>,
    start: usize,
    end: usize,
    base: u64,
    stop: StopReason,
}

impl Disassembly {
    /// The decoded instructions, in ascending address order.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consumes the disassembly and returns the instructions.
    #[must_use]
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Why the scan ended.
    #[must_use]
    pub fn stop_reason(&self) -> &StopReason {
        &self.stop
    }

    /// Returns `true` if the whole range was decoded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::Complete)
    }

    /// Buffer offsets of the scanned range.
    #[must_use]
    pub fn offset_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Load addresses of the scanned range, clamped at the top of the address space.
    #[must_use]
    pub fn text_range(&self) -> Range<u64> {
        self.base..self.base.saturating_add((self.end - self.start) as u64)
    }

    /// Number of bytes covered by decoded instructions.
    #[must_use]
    pub fn bytes_decoded(&self) -> usize {
        self.instructions.iter().map(|i| i.size).sum()
    }

    /// Number of bytes in the range that no instruction covers.
    #[must_use]
    pub fn bytes_abandoned(&self) -> usize {
        (self.end - self.start) - self.bytes_decoded()
    }

    /// The instruction whose opcode word is at `address`.
    #[must_use]
    pub fn at(&self, address: u64) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&address, |instruction| instruction.address)
            .ok()
            .map(|index| &self.instructions[index])
    }
}

/// Disassembles `data` linearly according to `config`.
///
/// The scan covers `config.start .. config.end` (the end clamped to the buffer). A truncated
/// final instruction or a trailing odd byte ends the scan early; the instructions decoded up
/// to that point are returned and the reason is recorded in [`Disassembly::stop_reason`].
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the configured range is inconsistent: the start
/// lies past the end, or past a non-empty buffer.
pub fn decode_stream(data: &[u8], config: &DisassemblerConfig) -> Result<Disassembly> {
    let start = config.start;
    let end = config.end.unwrap_or(data.len()).min(data.len());

    if let Some(requested) = config.end {
        if start > requested {
            return Err(malformed_error!(
                "scan start {:#x} lies past scan end {:#x}",
                start,
                requested
            ));
        }
    }
    if start > data.len() && !data.is_empty() {
        return Err(malformed_error!(
            "scan start {:#x} lies past the end of the {} byte buffer",
            start,
            data.len()
        ));
    }

    let mut disassembly = Disassembly {
        instructions: Vec::new(),
        start,
        end: end.max(start),
        base: config.base,
        stop: StopReason::Complete,
    };
    if start >= end {
        disassembly.end = start;
        return Ok(disassembly);
    }

    let mut parser = Parser::new(&data[..end]);
    parser.seek(start)?;
    disassembly.instructions.reserve((end - start) / 2);

    while parser.has_more_data() {
        let offset = parser.pos();
        if parser.remaining() < 2 {
            disassembly.stop = StopReason::TrailingByte { offset };
            break;
        }

        match decode_instruction(&mut parser, config.address_of(offset), config.coverage) {
            Ok(instruction) => disassembly.instructions.push(instruction),
            Err(error @ Error::TruncatedOperand { .. }) => {
                log::warn!("scan stopped at offset {offset:#x}: {error}");
                disassembly.stop = StopReason::Truncated { offset, error };
                break;
            }
            Err(error) => return Err(error),
        }
    }

    log::debug!(
        "decoded {} instructions from offsets {:#x}..{:#x}",
        disassembly.instructions.len(),
        start,
        end
    );

    Ok(disassembly)
}

/// Disassembles several independent buffers in parallel with the same configuration.
///
/// Results are returned in input order.
#[must_use]
pub fn decode_many(buffers: &[&[u8]], config: &DisassemblerConfig) -> Vec<Result<Disassembly>> {
    buffers
        .par_iter()
        .map(|data| decode_stream(data, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disassembler::{Coverage, Mnemonic};

    fn words(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn raw() -> DisassemblerConfig {
        DisassemblerConfig::default().with_start(0)
    }

    #[test]
    fn contiguous_addresses() {
        let data = words(&[0o012700, 5, 0o004767, 0o10, 0o000401, 0o000207]);
        let disassembly = decode_stream(&data, &raw().with_base(0o1000)).unwrap();
        let instructions = disassembly.instructions();

        assert!(disassembly.is_complete());
        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[0].address, 0o1000);
        for pair in instructions.windows(2) {
            assert_eq!(pair[0].next_address(), pair[1].address);
            assert_eq!(pair[0].offset + pair[0].size, pair[1].offset);
        }
        assert_eq!(disassembly.bytes_decoded(), data.len());
        assert_eq!(disassembly.bytes_abandoned(), 0);
        assert_eq!(disassembly.text_range(), 0o1000..0o1014);
    }

    #[test]
    fn header_offset_maps_to_base() {
        let mut data = vec![0xAA; 16];
        data.extend(words(&[0o000240, 0o000207]));
        let disassembly = decode_stream(&data, &DisassemblerConfig::default()).unwrap();

        assert_eq!(disassembly.instructions()[0].address, 0);
        assert_eq!(disassembly.instructions()[0].offset, 16);
        assert_eq!(disassembly.instructions()[1].address, 2);
        assert_eq!(disassembly.offset_range(), 16..20);
    }

    #[test]
    fn trailing_byte_dropped() {
        let mut data = words(&[0o000207]);
        data.push(0o001);
        let disassembly = decode_stream(&data, &raw()).unwrap();

        assert_eq!(disassembly.instructions().len(), 1);
        assert!(matches!(
            disassembly.stop_reason(),
            StopReason::TrailingByte { offset: 2 }
        ));
        assert_eq!(disassembly.bytes_abandoned(), 1);
    }

    #[test]
    fn truncated_keeps_prefix() {
        // rts pc; mov $?, r0 with the immediate cut off
        let data = words(&[0o000207, 0o012700]);
        let disassembly = decode_stream(&data, &raw()).unwrap();

        assert_eq!(disassembly.instructions().len(), 1);
        assert!(!disassembly.is_complete());
        match disassembly.stop_reason() {
            StopReason::Truncated { offset, error } => {
                assert_eq!(*offset, 2);
                assert!(matches!(error, Error::TruncatedOperand { .. }));
            }
            other => panic!("Expected StopReason::Truncated, got {other:?}"),
        }
        assert_eq!(disassembly.bytes_abandoned(), 2);
    }

    #[test]
    fn end_bounds_extension_reads() {
        // the extension word exists in the buffer but lies past the configured end
        let data = words(&[0o000207, 0o012700, 5]);
        let disassembly = decode_stream(&data, &raw().with_end(4)).unwrap();

        assert_eq!(disassembly.instructions().len(), 1);
        assert!(matches!(
            disassembly.stop_reason(),
            StopReason::Truncated { offset: 2, .. }
        ));
    }

    #[test]
    fn end_clamped_to_buffer() {
        let data = words(&[0o000207]);
        let disassembly = decode_stream(&data, &raw().with_end(100)).unwrap();

        assert!(disassembly.is_complete());
        assert_eq!(disassembly.text_range(), 0..2);
    }

    #[test]
    fn empty_ranges() {
        let disassembly = decode_stream(&[], &DisassemblerConfig::default()).unwrap();
        assert!(disassembly.instructions().is_empty());
        assert!(disassembly.is_complete());

        let data = vec![0u8; 16];
        let disassembly = decode_stream(&data, &DisassemblerConfig::default()).unwrap();
        assert!(disassembly.instructions().is_empty());
        assert_eq!(disassembly.text_range(), 0..0);
    }

    #[test]
    fn inconsistent_config() {
        let data = words(&[0o000207, 0o000207]);

        assert!(matches!(
            decode_stream(&data, &raw().with_start(4).with_end(2)),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            decode_stream(&data, &raw().with_start(8)),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn lookup_by_address() {
        let data = words(&[0o012700, 5, 0o000207]);
        let disassembly = decode_stream(&data, &raw().with_base(0o400)).unwrap();

        assert_eq!(disassembly.at(0o404).unwrap().mnemonic, Mnemonic::Rts);
        assert_eq!(disassembly.at(0o400).unwrap().mnemonic, Mnemonic::Mov);
        assert!(disassembly.at(0o402).is_none());
    }

    #[test]
    fn deterministic() {
        let data = words(&[0o016767, 2, 4, 0o104401, 0o000777, 0o170000]);
        let first = decode_stream(&data, &raw()).unwrap();
        let second = decode_stream(&data, &raw()).unwrap();

        assert_eq!(first.instructions(), second.instructions());
    }

    #[test]
    fn coverage_from_config() {
        let data = words(&[0o110102]);
        let full = decode_stream(&data, &raw()).unwrap();
        let minimal = decode_stream(&data, &raw().with_coverage(Coverage::MINIMAL)).unwrap();

        assert_eq!(full.instructions()[0].mnemonic, Mnemonic::Movb);
        assert_eq!(minimal.instructions()[0].mnemonic, Mnemonic::Word);
    }

    #[test]
    fn parallel_batch() {
        let a = words(&[0o000207]);
        let b = words(&[0o012700]);
        let c = words(&[0o000401, 0o000000]);
        let buffers: [&[u8]; 3] = [&a, &b, &c];
        let results = decode_many(&buffers, &raw());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().instructions().len(), 1);
        assert!(!results[1].as_ref().unwrap().is_complete());
        assert_eq!(results[2].as_ref().unwrap().instructions().len(), 2);
    }
}
