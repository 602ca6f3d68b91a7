//! PDP-11 instruction decoding.
//!
//! Decoding is table driven: [`DISPATCH`] lists `(mask, value)` patterns in priority order and
//! the first entry with `opcode & mask == value` wins. The order matters because the PDP-11
//! encodes instruction groups with fields of different widths; a wide mask tested late must
//! not shadow a narrow pattern tested early.
//!
//! Every entry belongs to a [`Coverage`] group. Groups that are disabled are skipped, so the
//! same table serves both a complete decoder and the reduced one that only knows the
//! instructions the early Unix tools cared about.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use pdpscope::{disassembler::{decode_instruction, Coverage, Mnemonic}, Parser};
//!
//! let code = [0o300, 0o025, 0o005, 0o000]; // mov $5, r0
//! let mut parser = Parser::new(&code);
//! let instruction = decode_instruction(&mut parser, 0o1000, Coverage::all())?;
//!
//! assert_eq!(instruction.mnemonic, Mnemonic::Mov);
//! assert_eq!(instruction.size, 4);
//! assert_eq!(instruction.to_string(), "mov $5, r0");
//! # Ok::<(), pdpscope::Error>(())
//! ```

use bitflags::bitflags;

use crate::{
    disassembler::{
        instruction::{Argument, Instruction, InstructionRoles, Mnemonic},
        operand::{decode_operand, AddressingMode, Operand, Register},
    },
    file::parser::Parser,
    Result,
};

bitflags! {
    /// Instruction groups the decoder recognizes.
    ///
    /// Opcodes whose group is not enabled decode as `.word`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Coverage: u16 {
        /// `mov cmp bit bic bis add sub`
        const DOUBLE_OPERAND = 0x0001;
        /// `movb cmpb bitb bicb bisb`
        const DOUBLE_OPERAND_BYTE = 0x0002;
        /// `clr com inc dec neg adc sbc tst ror rol asr asl`
        const SINGLE_OPERAND = 0x0004;
        /// Byte forms of the single-operand group
        const SINGLE_OPERAND_BYTE = 0x0008;
        /// `swab`
        const SWAB = 0x0010;
        /// `jsr rts`
        const SUBROUTINE = 0x0020;
        /// Short branches
        const BRANCH = 0x0040;
        /// `emt sys`
        const TRAP = 0x0080;
        /// `jmp`
        const JUMP = 0x0100;
        /// `halt wait rti bpt iot reset rtt`
        const MISC = 0x0200;

        /// The reduced decoder: word-sized arithmetic, subroutine linkage, branches and traps
        const MINIMAL = Self::DOUBLE_OPERAND.bits()
            | Self::SINGLE_OPERAND.bits()
            | Self::SUBROUTINE.bits()
            | Self::BRANCH.bits()
            | Self::TRAP.bits();
    }
}

impl Default for Coverage {
    fn default() -> Self {
        Coverage::all()
    }
}

/// Shape of an instruction's operand field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandFormat {
    /// Source in bits 11-6, destination in bits 5-0
    Double,
    /// Destination in bits 5-0
    Single,
    /// Linkage register in bits 8-6, destination in bits 5-0 (`jsr`)
    RegisterDestination,
    /// Register in bits 2-0 (`rts`)
    Register,
    /// Signed word displacement in bits 7-0
    Branch,
    /// Trap number in the low byte
    Trap,
    /// No operands
    None,
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    /// Bits of the opcode word that identify the instruction
    pub mask: u16,
    /// Required value of the masked bits
    pub value: u16,
    /// Group the entry belongs to
    pub group: Coverage,
    /// Operand layout
    pub format: OperandFormat,
    /// Resulting mnemonic
    pub mnemonic: Mnemonic,
    /// Control-flow roles of the instruction
    pub roles: InstructionRoles,
}

impl OpcodeEntry {
    /// Returns `true` if `opcode` is encoded by this entry.
    #[must_use]
    pub fn matches(&self, opcode: u16) -> bool {
        opcode & self.mask == self.value
    }
}

const fn op(
    mask: u16,
    value: u16,
    group: Coverage,
    format: OperandFormat,
    mnemonic: Mnemonic,
    roles: InstructionRoles,
) -> OpcodeEntry {
    OpcodeEntry {
        mask,
        value,
        group,
        format,
        mnemonic,
        roles,
    }
}

const NONE: InstructionRoles = InstructionRoles::empty();
const BRANCH: InstructionRoles = InstructionRoles::BRANCH;
const CALL: InstructionRoles = InstructionRoles::CALL;
const RETURN: InstructionRoles = InstructionRoles::RETURN;

const DOUBLE_MASK: u16 = 0o170000;
const SINGLE_MASK: u16 = 0o177700;
const BRANCH_MASK: u16 = 0o177400;

/// The ordered dispatch table. First match wins.
#[rustfmt::skip]
pub static DISPATCH: &[OpcodeEntry] = &[
    // double operand
    op(DOUBLE_MASK, 0o010000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Mov, NONE),
    op(DOUBLE_MASK, 0o020000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Cmp, NONE),
    op(DOUBLE_MASK, 0o030000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Bit, NONE),
    op(DOUBLE_MASK, 0o040000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Bic, NONE),
    op(DOUBLE_MASK, 0o050000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Bis, NONE),
    op(DOUBLE_MASK, 0o060000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Add, NONE),
    op(DOUBLE_MASK, 0o110000, Coverage::DOUBLE_OPERAND_BYTE, OperandFormat::Double, Mnemonic::Movb, NONE),
    op(DOUBLE_MASK, 0o120000, Coverage::DOUBLE_OPERAND_BYTE, OperandFormat::Double, Mnemonic::Cmpb, NONE),
    op(DOUBLE_MASK, 0o130000, Coverage::DOUBLE_OPERAND_BYTE, OperandFormat::Double, Mnemonic::Bitb, NONE),
    op(DOUBLE_MASK, 0o140000, Coverage::DOUBLE_OPERAND_BYTE, OperandFormat::Double, Mnemonic::Bicb, NONE),
    op(DOUBLE_MASK, 0o150000, Coverage::DOUBLE_OPERAND_BYTE, OperandFormat::Double, Mnemonic::Bisb, NONE),
    op(DOUBLE_MASK, 0o160000, Coverage::DOUBLE_OPERAND, OperandFormat::Double, Mnemonic::Sub, NONE),
    // single operand
    op(SINGLE_MASK, 0o005000, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Clr, NONE),
    op(SINGLE_MASK, 0o005100, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Com, NONE),
    op(SINGLE_MASK, 0o005200, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Inc, NONE),
    op(SINGLE_MASK, 0o005300, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Dec, NONE),
    op(SINGLE_MASK, 0o005400, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Neg, NONE),
    op(SINGLE_MASK, 0o005500, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Adc, NONE),
    op(SINGLE_MASK, 0o005600, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Sbc, NONE),
    op(SINGLE_MASK, 0o005700, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Tst, NONE),
    op(SINGLE_MASK, 0o006000, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Ror, NONE),
    op(SINGLE_MASK, 0o006100, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Rol, NONE),
    op(SINGLE_MASK, 0o006200, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Asr, NONE),
    op(SINGLE_MASK, 0o006300, Coverage::SINGLE_OPERAND, OperandFormat::Single, Mnemonic::Asl, NONE),
    op(SINGLE_MASK, 0o105000, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Clrb, NONE),
    op(SINGLE_MASK, 0o105100, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Comb, NONE),
    op(SINGLE_MASK, 0o105200, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Incb, NONE),
    op(SINGLE_MASK, 0o105300, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Decb, NONE),
    op(SINGLE_MASK, 0o105400, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Negb, NONE),
    op(SINGLE_MASK, 0o105500, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Adcb, NONE),
    op(SINGLE_MASK, 0o105600, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Sbcb, NONE),
    op(SINGLE_MASK, 0o105700, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Tstb, NONE),
    op(SINGLE_MASK, 0o106000, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Rorb, NONE),
    op(SINGLE_MASK, 0o106100, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Rolb, NONE),
    op(SINGLE_MASK, 0o106200, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Asrb, NONE),
    op(SINGLE_MASK, 0o106300, Coverage::SINGLE_OPERAND_BYTE, OperandFormat::Single, Mnemonic::Aslb, NONE),
    op(SINGLE_MASK, 0o000300, Coverage::SWAB, OperandFormat::Single, Mnemonic::Swab, NONE),
    // subroutine linkage
    op(0o177000, 0o004000, Coverage::SUBROUTINE, OperandFormat::RegisterDestination, Mnemonic::Jsr, CALL),
    op(0o177770, 0o000200, Coverage::SUBROUTINE, OperandFormat::Register, Mnemonic::Rts, RETURN),
    // short branches
    op(BRANCH_MASK, 0o000400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Br, BRANCH),
    op(BRANCH_MASK, 0o001000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bne, BRANCH),
    op(BRANCH_MASK, 0o001400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Beq, BRANCH),
    op(BRANCH_MASK, 0o002000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bge, BRANCH),
    op(BRANCH_MASK, 0o002400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Blt, BRANCH),
    op(BRANCH_MASK, 0o003000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bgt, BRANCH),
    op(BRANCH_MASK, 0o003400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Ble, BRANCH),
    op(BRANCH_MASK, 0o100000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bpl, BRANCH),
    op(BRANCH_MASK, 0o100400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bmi, BRANCH),
    op(BRANCH_MASK, 0o101000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bhi, BRANCH),
    op(BRANCH_MASK, 0o101400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Blos, BRANCH),
    op(BRANCH_MASK, 0o102000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bvc, BRANCH),
    op(BRANCH_MASK, 0o102400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bvs, BRANCH),
    op(BRANCH_MASK, 0o103000, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bcc, BRANCH),
    op(BRANCH_MASK, 0o103400, Coverage::BRANCH, OperandFormat::Branch, Mnemonic::Bcs, BRANCH),
    // traps
    op(BRANCH_MASK, 0o104000, Coverage::TRAP, OperandFormat::Trap, Mnemonic::Emt, CALL),
    op(BRANCH_MASK, 0o104400, Coverage::TRAP, OperandFormat::Trap, Mnemonic::Sys, CALL),
    // jump
    op(SINGLE_MASK, 0o000100, Coverage::JUMP, OperandFormat::Single, Mnemonic::Jmp, BRANCH),
    // miscellaneous
    op(0o177777, 0o000000, Coverage::MISC, OperandFormat::None, Mnemonic::Halt, NONE),
    op(0o177777, 0o000001, Coverage::MISC, OperandFormat::None, Mnemonic::Wait, NONE),
    op(0o177777, 0o000002, Coverage::MISC, OperandFormat::None, Mnemonic::Rti, RETURN),
    op(0o177777, 0o000003, Coverage::MISC, OperandFormat::None, Mnemonic::Bpt, NONE),
    op(0o177777, 0o000004, Coverage::MISC, OperandFormat::None, Mnemonic::Iot, NONE),
    op(0o177777, 0o000005, Coverage::MISC, OperandFormat::None, Mnemonic::Reset, NONE),
    op(0o177777, 0o000006, Coverage::MISC, OperandFormat::None, Mnemonic::Rtt, RETURN),
];

/// Finds the dispatch entry for `opcode`, skipping groups not enabled in `coverage`.
#[must_use]
pub fn lookup(opcode: u16, coverage: Coverage) -> Option<&'static OpcodeEntry> {
    DISPATCH
        .iter()
        .find(|entry| coverage.contains(entry.group) && entry.matches(opcode))
}

/// Short branch destination: the word after the branch plus twice the signed low byte.
#[must_use]
pub fn branch_target(address: u64, opcode: u16) -> u64 {
    let displacement = i64::from(i8::from_le_bytes([opcode.to_le_bytes()[0]]));
    address.wrapping_add(2).wrapping_add_signed(displacement * 2)
}

/// Decodes one operand whose 6-bit field sits in the low bits of `field`.
fn operand(
    parser: &mut Parser,
    field: u16,
    offset: usize,
    address: u64,
    extensions: &mut Vec<u16>,
) -> Result<Operand> {
    let extension_address = address.wrapping_add((parser.pos() - offset) as u64);
    let operand = decode_operand(
        parser,
        AddressingMode::from_bits(field >> 3),
        Register::from_bits(field),
        extension_address,
    )?;

    if let Some(extension) = operand.extension {
        extensions.push(extension.value);
    }

    Ok(operand)
}

/// Decodes a single instruction at the current parser position.
///
/// The parser is advanced past the opcode word and every extension word the operands demand,
/// so after a successful call it is positioned at the next instruction. `address` is the
/// load address of the opcode word; pc-relative operands and branch targets are resolved
/// against it.
///
/// Opcode words that match no enabled [`DISPATCH`] entry produce a two byte `.word`
/// instruction; decoding never fails because of an unknown encoding.
///
/// # Errors
///
/// - [`crate::Error::OutOfBounds`] if fewer than two bytes remain for the opcode word
/// - [`crate::Error::TruncatedOperand`] if an operand's extension word runs past the end of the
///   buffer. The parser position is unspecified afterwards.
///
/// # Examples
///
/// ```rust
/// use pdpscope::{disassembler::{decode_instruction, Coverage}, Parser};
///
/// // jsr r5, 2(pc): the target is relative to the extension word, not the opcode
/// let code = [0o167, 0o011, 0o002, 0o000];
/// let mut parser = Parser::new(&code);
/// let instruction = decode_instruction(&mut parser, 0, Coverage::all())?;
///
/// assert!(instruction.is_call());
/// assert_eq!(instruction.target, Some(6));
/// # Ok::<(), pdpscope::Error>(())
/// ```
pub fn decode_instruction(
    parser: &mut Parser,
    address: u64,
    coverage: Coverage,
) -> Result<Instruction> {
    let offset = parser.pos();
    let opcode = parser.read_le::<u16>()?;

    let Some(entry) = lookup(opcode, coverage) else {
        return Ok(Instruction::data(address, offset, opcode));
    };

    let mut extensions = Vec::new();
    let mut arguments = Vec::with_capacity(2);
    let mut target = None;

    match entry.format {
        OperandFormat::Double => {
            let source = operand(parser, opcode >> 6, offset, address, &mut extensions)?;
            let destination = operand(parser, opcode, offset, address, &mut extensions)?;
            arguments.push(Argument::Operand(source));
            arguments.push(Argument::Operand(destination));
        }
        OperandFormat::Single => {
            let destination = operand(parser, opcode, offset, address, &mut extensions)?;
            if entry.roles.contains(InstructionRoles::BRANCH) {
                target = destination.effective_address();
            }
            arguments.push(Argument::Operand(destination));
        }
        OperandFormat::RegisterDestination => {
            let linkage = Register::from_bits(opcode >> 6);
            let destination = operand(parser, opcode, offset, address, &mut extensions)?;
            target = destination.effective_address();
            arguments.push(Argument::Register(linkage));
            arguments.push(Argument::Operand(destination));
        }
        OperandFormat::Register => {
            arguments.push(Argument::Register(Register::from_bits(opcode)));
        }
        OperandFormat::Branch => {
            let destination = branch_target(address, opcode);
            target = Some(destination);
            arguments.push(Argument::Target(destination));
        }
        OperandFormat::Trap => {
            let low = opcode.to_le_bytes()[0];
            let number = if entry.mnemonic == Mnemonic::Sys {
                low & 0o77
            } else {
                low
            };
            arguments.push(Argument::Trap(number));
        }
        OperandFormat::None => {}
    }

    Ok(Instruction {
        address,
        offset,
        opcode,
        size: parser.pos() - offset,
        extensions,
        mnemonic: entry.mnemonic,
        arguments,
        roles: entry.roles,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use strum::IntoEnumIterator;

    fn words(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn decode_at(code: &[u16], address: u64) -> Instruction {
        let data = words(code);
        let mut parser = Parser::new(&data);
        decode_instruction(&mut parser, address, Coverage::all()).unwrap()
    }

    fn decode(code: &[u16]) -> Instruction {
        decode_at(code, 0)
    }

    #[test]
    fn every_entry_decodes_to_itself() {
        for entry in DISPATCH {
            // operand bits zero: register mode, r0, no extension words
            let instruction = decode(&[entry.value]);
            assert_eq!(
                instruction.mnemonic, entry.mnemonic,
                "entry {:06o}",
                entry.value
            );
            assert_eq!(instruction.roles, entry.roles);
            assert_eq!(instruction.size, 2);
        }
    }

    #[test]
    fn every_mnemonic_has_an_entry() {
        for mnemonic in Mnemonic::iter().filter(|m| *m != Mnemonic::Word) {
            assert!(
                DISPATCH.iter().any(|entry| entry.mnemonic == mnemonic),
                "{mnemonic} missing"
            );
        }
    }

    #[test]
    fn mov_immediate() {
        let instruction = decode(&[0o012700, 0o000005]);

        assert_eq!(instruction.mnemonic, Mnemonic::Mov);
        assert_eq!(instruction.size, 4);
        assert_eq!(instruction.extensions, vec![5]);
        assert_eq!(instruction.to_string(), "mov $5, r0");
        assert!(instruction.roles.is_empty());
        assert_eq!(instruction.target, None);
    }

    #[test]
    fn double_operand_extension_order() {
        // mov 2(r1), 4(r2)
        let instruction = decode(&[0o016162, 0o000002, 0o000004]);

        assert_eq!(instruction.size, 6);
        assert_eq!(instruction.extensions, vec![2, 4]);
        assert_eq!(instruction.to_string(), "mov 2(r1), 4(r2)");
    }

    #[test]
    fn double_operand_pc_relative_addresses() {
        // mov $7, 10(pc) at 0o1000: destination extension sits at 0o1004
        let instruction = decode_at(&[0o012767, 0o000007, 0o000010], 0o1000);

        match instruction.arguments[1] {
            Argument::Operand(operand) => {
                let extension = operand.extension.unwrap();
                assert_eq!(extension.address, 0o1004);
                assert_eq!(operand.effective_address(), Some(0o1016));
            }
            _ => panic!("Expected Argument::Operand"),
        }
        assert_eq!(instruction.to_string(), "mov $7, 1016");
    }

    #[test]
    fn byte_and_sub_forms() {
        assert_eq!(decode(&[0o110102]).to_string(), "movb r1, r2");
        assert_eq!(decode(&[0o160001]).to_string(), "sub r0, r1");
        assert_eq!(decode(&[0o105011]).to_string(), "clrb (r1)");
        assert_eq!(decode(&[0o005726]).to_string(), "tst (sp)+");
        assert_eq!(decode(&[0o000304]).to_string(), "swab r4");
    }

    #[test]
    fn branch_displacement() {
        let forward = decode(&[0o000401]);
        assert_eq!(forward.mnemonic, Mnemonic::Br);
        assert!(forward.is_branch());
        assert_eq!(forward.target, Some(4));
        assert_eq!(forward.to_string(), "br 4");

        // bne .-2 at 0o100: displacement 0o376 = -2
        let backward = decode_at(&[0o001376], 0o100);
        assert_eq!(backward.mnemonic, Mnemonic::Bne);
        assert_eq!(backward.target, Some(0o100 + 2 - 4));
    }

    #[test]
    fn branch_displacement_sweep() {
        let base = 0o4000_u64;
        for low in 0..=255_u16 {
            let instruction = decode_at(&[0o000400 | low], base);
            let signed = if low >= 128 {
                i64::from(low) - 256
            } else {
                i64::from(low)
            };
            let expected = u64::try_from(0o4000 + 2 + signed * 2).unwrap();
            assert_eq!(instruction.target, Some(expected), "displacement {low:o}");
        }
    }

    #[test]
    fn jsr_pc_relative_uses_extension_address() {
        let instruction = decode(&[0o004567, 0o000002]);

        assert_eq!(instruction.mnemonic, Mnemonic::Jsr);
        assert!(instruction.is_call());
        assert_eq!(instruction.size, 4);
        assert_eq!(instruction.target, Some(6));
        assert_eq!(instruction.to_string(), "jsr r5, 6");
    }

    #[test]
    fn jsr_register_deferred_unresolved() {
        let instruction = decode(&[0o004711]);

        assert!(instruction.is_call());
        assert_eq!(instruction.target, None);
        assert_eq!(instruction.to_string(), "jsr pc, (r1)");
    }

    #[test]
    fn jmp_targets() {
        let relative = decode_at(&[0o000167, 0o000100], 0o200);
        assert!(relative.is_branch());
        assert_eq!(relative.target, Some(0o200 + 4 + 0o100));

        let absolute = decode(&[0o000137, 0o001000]);
        assert_eq!(absolute.target, Some(0o1000));
        assert_eq!(absolute.to_string(), "jmp *$1000");

        let indirect = decode(&[0o000110]);
        assert!(indirect.is_branch());
        assert_eq!(indirect.target, None);
    }

    #[test]
    fn rts_and_returns() {
        let rts = decode(&[0o000207]);
        assert_eq!(rts.to_string(), "rts pc");
        assert!(rts.is_return());

        assert!(decode(&[0o000002]).is_return());
        assert!(decode(&[0o000006]).is_return());
        assert!(!decode(&[0o000000]).is_return());
    }

    #[test]
    fn traps() {
        let sys = decode(&[0o104404]);
        assert_eq!(sys.mnemonic, Mnemonic::Sys);
        assert!(sys.is_call());
        assert_eq!(sys.target, None);
        assert_eq!(sys.syscall(), Some(4));
        assert_eq!(sys.to_string(), "sys 4");

        let emt = decode(&[0o104017]);
        assert_eq!(emt.mnemonic, Mnemonic::Emt);
        assert_eq!(emt.to_string(), "emt 15");
        assert_eq!(emt.syscall(), None);
    }

    #[test]
    fn unknown_words_are_data() {
        // EIS mul, a condition code op and an unassigned misc word
        for word in [0o070102, 0o000241, 0o000007, 0o177777] {
            let instruction = decode(&[word]);
            assert_eq!(instruction.mnemonic, Mnemonic::Word, "{word:06o}");
            assert_eq!(instruction.size, 2);
            assert_eq!(instruction.arguments, vec![Argument::Literal(word)]);
        }
    }

    #[test]
    fn precedence_of_overlapping_patterns() {
        // 0o0002xx: rts only for 0o000200..0o000207
        assert_eq!(decode(&[0o000203]).mnemonic, Mnemonic::Rts);
        assert_eq!(decode(&[0o000210]).mnemonic, Mnemonic::Word);
        // jsr spans 0o004000..0o004777 and must not be mistaken for a branch
        assert_eq!(decode(&[0o004737, 0o001000]).mnemonic, Mnemonic::Jsr);
        // 0o104xxx splits at bit 8
        assert_eq!(decode(&[0o104377]).mnemonic, Mnemonic::Emt);
        assert_eq!(decode(&[0o104400]).mnemonic, Mnemonic::Sys);
        // byte single operand vs branch table in the 0o10xxxx range
        assert_eq!(decode(&[0o103777]).mnemonic, Mnemonic::Bcs);
        assert_eq!(decode(&[0o105000]).mnemonic, Mnemonic::Clrb);
    }

    #[test]
    fn minimal_coverage_skips_groups() {
        let data = words(&[0o110102, 0o000167, 0o000000, 0o012700, 0o000005]);
        let mut parser = Parser::new(&data);

        let movb = decode_instruction(&mut parser, 0, Coverage::MINIMAL).unwrap();
        assert_eq!(movb.mnemonic, Mnemonic::Word);

        let jmp = decode_instruction(&mut parser, 2, Coverage::MINIMAL).unwrap();
        assert_eq!(jmp.mnemonic, Mnemonic::Word);
        assert_eq!(jmp.size, 2);

        let _ = decode_instruction(&mut parser, 4, Coverage::MINIMAL).unwrap();
        let mov = decode_instruction(&mut parser, 6, Coverage::MINIMAL).unwrap();
        assert_eq!(mov.to_string(), "mov $5, r0");
    }

    #[test]
    fn truncated_operand() {
        // mov $?, r0 with the immediate missing
        let data = words(&[0o012700]);
        let mut parser = Parser::new(&data);
        let result = decode_instruction(&mut parser, 0, Coverage::all());

        assert!(matches!(
            result,
            Err(Error::TruncatedOperand {
                offset: 2,
                needed: 2,
                available: 0
            })
        ));
    }

    #[test]
    fn size_matches_extensions() {
        for code in [
            vec![0o010203],
            vec![0o012700, 5],
            vec![0o016767, 2, 4],
            vec![0o004767, 0o100],
            vec![0o000401],
        ] {
            let instruction = decode(&code);
            assert_eq!(instruction.size, 2 + 2 * instruction.extensions.len());
            assert_eq!(instruction.size, code.len() * 2);
        }
    }
}
