//! Decoded instruction representation.
//!
//! An [`Instruction`] is produced by [`crate::disassembler::decode_instruction`] and is
//! immutable afterwards. It keeps the raw words it was decoded from next to the typed view so
//! listings can show both.

use std::fmt;

use bitflags::bitflags;
use strum::{Display, EnumIter};

use crate::disassembler::operand::{Operand, Register};

/// Every mnemonic the decoder can produce.
///
/// Opcode words outside this set decode to [`Mnemonic::Word`], a data pseudo-instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum Mnemonic {
    // double operand
    Mov,
    Cmp,
    Bit,
    Bic,
    Bis,
    Add,
    Sub,
    Movb,
    Cmpb,
    Bitb,
    Bicb,
    Bisb,
    // single operand
    Clr,
    Com,
    Inc,
    Dec,
    Neg,
    Adc,
    Sbc,
    Tst,
    Ror,
    Rol,
    Asr,
    Asl,
    Clrb,
    Comb,
    Incb,
    Decb,
    Negb,
    Adcb,
    Sbcb,
    Tstb,
    Rorb,
    Rolb,
    Asrb,
    Aslb,
    Swab,
    // branches
    Br,
    Bne,
    Beq,
    Bge,
    Blt,
    Bgt,
    Ble,
    Bpl,
    Bmi,
    Bhi,
    Blos,
    Bvc,
    Bvs,
    Bcc,
    Bcs,
    // subroutine and jumps
    Jsr,
    Rts,
    Jmp,
    // traps
    Emt,
    Sys,
    // miscellaneous
    Halt,
    Wait,
    Rti,
    Bpt,
    Iot,
    Reset,
    Rtt,
    /// Opcode word that matched no known encoding
    #[strum(serialize = ".word")]
    Word,
}

bitflags! {
    /// Control-flow roles of an instruction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InstructionRoles: u8 {
        /// Transfers control within the program (`br`, conditional branches, `jmp`)
        const BRANCH = 0x01;
        /// Transfers control to a subroutine or the kernel (`jsr`, `emt`, `sys`)
        const CALL = 0x02;
        /// Returns from a subroutine or interrupt (`rts`, `rti`, `rtt`)
        const RETURN = 0x04;
    }
}

/// One entry of an instruction's operand field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// A general source or destination operand
    Operand(Operand),
    /// A bare register: the `jsr` linkage register or the `rts` operand
    Register(Register),
    /// Resolved short branch destination
    Target(u64),
    /// Trap number of `emt` / `sys`
    Trap(u8),
    /// Raw word of a `.word` pseudo-instruction
    Literal(u16),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Operand(operand) => write!(f, "{operand}"),
            Argument::Register(register) => write!(f, "{register}"),
            Argument::Target(address) => write!(f, "{address:o}"),
            Argument::Trap(number) => write!(f, "{number}"),
            Argument::Literal(word) => write!(f, "{word:06o}"),
        }
    }
}

/// A decoded PDP-11 instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Load address of the opcode word
    pub address: u64,
    /// Buffer offset of the opcode word
    pub offset: usize,
    /// The raw opcode word
    pub opcode: u16,
    /// Extension words in fetch order
    pub extensions: Vec<u16>,
    /// Mnemonic
    pub mnemonic: Mnemonic,
    /// Operand field, in assembler order
    pub arguments: Vec<Argument>,
    /// Total length in bytes: 2, 4 or 6
    pub size: usize,
    /// Control-flow roles
    pub roles: InstructionRoles,
    /// Resolved code target, if statically known
    pub target: Option<u64>,
}

impl Instruction {
    /// Builds the `.word` pseudo-instruction for an opcode word nothing else matched.
    #[must_use]
    pub fn data(address: u64, offset: usize, opcode: u16) -> Instruction {
        Instruction {
            address,
            offset,
            opcode,
            extensions: Vec::new(),
            mnemonic: Mnemonic::Word,
            arguments: vec![Argument::Literal(opcode)],
            size: 2,
            roles: InstructionRoles::empty(),
            target: None,
        }
    }

    /// Returns `true` if this instruction transfers control within the program.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.roles.contains(InstructionRoles::BRANCH)
    }

    /// Returns `true` if this instruction calls a subroutine or traps into the kernel.
    #[must_use]
    pub fn is_call(&self) -> bool {
        self.roles.contains(InstructionRoles::CALL)
    }

    /// Returns `true` if this instruction returns from a subroutine or interrupt.
    #[must_use]
    pub fn is_return(&self) -> bool {
        self.roles.contains(InstructionRoles::RETURN)
    }

    /// Returns `true` for the `.word` fallback.
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.mnemonic == Mnemonic::Word
    }

    /// Address of the instruction that follows in memory.
    #[must_use]
    pub fn next_address(&self) -> u64 {
        self.address.wrapping_add(self.size as u64)
    }

    /// The system-call number of a `sys` instruction.
    ///
    /// Unix enters the kernel through `trap` (`104400`-`104777`), which the listing spells
    /// `sys`, and the number is the low six bits. An `emt` word (`104000`-`104377`) is never a
    /// system call here, although a plain scan for `104xxx` opcodes would count it as one.
    #[must_use]
    pub fn syscall(&self) -> Option<u8> {
        if self.mnemonic != Mnemonic::Sys {
            return None;
        }
        self.arguments.iter().find_map(|argument| match argument {
            Argument::Trap(number) => Some(*number),
            _ => None,
        })
    }

    /// The operand field rendered in assembler syntax, e.g. `$5, r0`.
    #[must_use]
    pub fn operands(&self) -> String {
        self.arguments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands())
        }
    }
}
