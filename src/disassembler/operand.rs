//! Register, addressing mode and operand decoding.
//!
//! Every PDP-11 operand is a 6-bit field: a 3-bit addressing mode followed by a 3-bit register
//! number. Four combinations fetch an extra word from the instruction stream:
//!
//! | Mode | Register | Syntax | Extension |
//! |------|----------|--------|-----------|
//! | 2 | pc | `$n` (immediate) | value |
//! | 3 | pc | `*$a` (absolute) | address |
//! | 6 | any | `d(rN)` / `a` (pc-relative) | signed displacement |
//! | 7 | any | `*d(rN)` / `*a` | signed displacement |
//!
//! All other combinations are encoded entirely in the opcode word.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use crate::{file::parser::Parser, Error, Result};

/// Size in bytes of an operand extension word.
pub const EXTENSION_SIZE: usize = 2;

/// A PDP-11 general register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, FromRepr)]
#[repr(u8)]
pub enum Register {
    /// General register 0
    #[strum(serialize = "r0")]
    R0 = 0,
    /// General register 1
    #[strum(serialize = "r1")]
    R1 = 1,
    /// General register 2
    #[strum(serialize = "r2")]
    R2 = 2,
    /// General register 3
    #[strum(serialize = "r3")]
    R3 = 3,
    /// General register 4
    #[strum(serialize = "r4")]
    R4 = 4,
    /// General register 5, conventionally the frame pointer
    #[strum(serialize = "r5")]
    R5 = 5,
    /// Stack pointer (register 6)
    #[strum(serialize = "sp")]
    Sp = 6,
    /// Program counter (register 7)
    #[strum(serialize = "pc")]
    Pc = 7,
}

impl Register {
    /// Extracts the register named by the low three bits of `bits`.
    #[must_use]
    pub fn from_bits(bits: u16) -> Register {
        match bits & 0o7 {
            0 => Register::R0,
            1 => Register::R1,
            2 => Register::R2,
            3 => Register::R3,
            4 => Register::R4,
            5 => Register::R5,
            6 => Register::Sp,
            _ => Register::Pc,
        }
    }
}

/// The eight PDP-11 addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u8)]
pub enum AddressingMode {
    /// Mode 0: `rN`
    Register = 0,
    /// Mode 1: `(rN)`
    RegisterDeferred = 1,
    /// Mode 2: `(rN)+`, immediate `$n` with pc
    Autoincrement = 2,
    /// Mode 3: `*(rN)+`, absolute `*$a` with pc
    AutoincrementDeferred = 3,
    /// Mode 4: `-(rN)`
    Autodecrement = 4,
    /// Mode 5: `*-(rN)`
    AutodecrementDeferred = 5,
    /// Mode 6: `d(rN)`, pc-relative with pc
    Index = 6,
    /// Mode 7: `*d(rN)`
    IndexDeferred = 7,
}

impl AddressingMode {
    /// Extracts the mode named by the low three bits of `bits`.
    #[must_use]
    pub fn from_bits(bits: u16) -> AddressingMode {
        match bits & 0o7 {
            0 => AddressingMode::Register,
            1 => AddressingMode::RegisterDeferred,
            2 => AddressingMode::Autoincrement,
            3 => AddressingMode::AutoincrementDeferred,
            4 => AddressingMode::Autodecrement,
            5 => AddressingMode::AutodecrementDeferred,
            6 => AddressingMode::Index,
            _ => AddressingMode::IndexDeferred,
        }
    }

    /// Returns `true` for the odd modes, which add one level of indirection.
    #[must_use]
    pub fn is_deferred(self) -> bool {
        (self as u8) & 1 == 1
    }

    /// Returns `true` if this mode fetches an extension word when combined with `register`.
    #[must_use]
    pub fn needs_extension(self, register: Register) -> bool {
        match self {
            AddressingMode::Autoincrement | AddressingMode::AutoincrementDeferred => {
                register == Register::Pc
            }
            AddressingMode::Index | AddressingMode::IndexDeferred => true,
            _ => false,
        }
    }
}

/// An extension word fetched from the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extension {
    /// The raw 16-bit word
    pub value: u16,
    /// Load address the word was fetched from
    pub address: u64,
}

impl Extension {
    /// The word reinterpreted as a signed displacement.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn displacement(&self) -> i16 {
        self.value as i16
    }

    /// Target of a pc-relative reference: the address just past this word plus the
    /// displacement.
    #[must_use]
    pub fn relative_target(&self) -> u64 {
        self.address
            .wrapping_add(EXTENSION_SIZE as u64)
            .wrapping_add_signed(i64::from(self.displacement()))
    }
}

/// A decoded source or destination operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operand {
    /// Addressing mode
    pub mode: AddressingMode,
    /// Register the mode applies to
    pub register: Register,
    /// Extension word, present exactly when [`AddressingMode::needs_extension`] holds
    pub extension: Option<Extension>,
}

impl Operand {
    /// Creates an operand that carries no extension word.
    #[must_use]
    pub fn register_only(mode: AddressingMode, register: Register) -> Operand {
        Operand {
            mode,
            register,
            extension: None,
        }
    }

    /// `$n`: mode 2 through the program counter.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        self.mode == AddressingMode::Autoincrement && self.register == Register::Pc
    }

    /// `*$a`: mode 3 through the program counter.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.mode == AddressingMode::AutoincrementDeferred && self.register == Register::Pc
    }

    /// Modes 6 and 7 through the program counter.
    #[must_use]
    pub fn is_pc_relative(&self) -> bool {
        matches!(
            self.mode,
            AddressingMode::Index | AddressingMode::IndexDeferred
        ) && self.register == Register::Pc
    }

    /// Number of instruction-stream bytes this operand occupies beyond the opcode word.
    #[must_use]
    pub fn extension_len(&self) -> usize {
        if self.extension.is_some() {
            EXTENSION_SIZE
        } else {
            0
        }
    }

    /// The effective address of this operand when it is known without executing anything.
    ///
    /// Absolute operands yield their extension word, `a(pc)` yields the pc-relative target.
    /// Everything else depends on register or memory contents and yields `None`.
    #[must_use]
    pub fn effective_address(&self) -> Option<u64> {
        let extension = self.extension?;
        if self.is_absolute() {
            Some(u64::from(extension.value))
        } else if self.mode == AddressingMode::Index && self.register == Register::Pc {
            Some(extension.relative_target())
        } else {
            None
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let register = self.register;
        let extension = self.extension;

        match (self.mode, extension) {
            (AddressingMode::Register, _) => write!(f, "{register}"),
            (AddressingMode::RegisterDeferred, _) => write!(f, "({register})"),
            (AddressingMode::Autoincrement, Some(ext)) => write!(f, "${:o}", ext.value),
            (AddressingMode::Autoincrement, None) => write!(f, "({register})+"),
            (AddressingMode::AutoincrementDeferred, Some(ext)) => write!(f, "*${:o}", ext.value),
            (AddressingMode::AutoincrementDeferred, None) => write!(f, "*({register})+"),
            (AddressingMode::Autodecrement, _) => write!(f, "-({register})"),
            (AddressingMode::AutodecrementDeferred, _) => write!(f, "*-({register})"),
            (AddressingMode::Index | AddressingMode::IndexDeferred, Some(ext)) => {
                if self.mode.is_deferred() {
                    f.write_str("*")?;
                }
                if register == Register::Pc {
                    write!(f, "{:o}", ext.relative_target())
                } else {
                    let disp = ext.displacement();
                    if disp < 0 {
                        write!(f, "-{:o}({register})", disp.unsigned_abs())
                    } else {
                        write!(f, "{disp:o}({register})")
                    }
                }
            }
            // only reachable for hand-built operands
            (AddressingMode::Index, None) => write!(f, "?({register})"),
            (AddressingMode::IndexDeferred, None) => write!(f, "*?({register})"),
        }
    }
}

/// Decodes one operand, fetching its extension word from `parser` if the mode requires one.
///
/// `address` is the load address corresponding to the parser's current position, i.e. the
/// address the extension word would be fetched from.
///
/// # Errors
///
/// Returns [`crate::Error::TruncatedOperand`] if an extension word is required but fewer than
/// two bytes remain. The parser position is unchanged in that case.
///
/// # Examples
///
/// ```rust
/// use pdpscope::{
///     disassembler::{decode_operand, AddressingMode, Register},
///     Parser,
/// };
///
/// let data = [0o005, 0o000]; // extension word 5
/// let mut parser = Parser::new(&data);
///
/// let operand = decode_operand(&mut parser, AddressingMode::Autoincrement, Register::Pc, 2)?;
/// assert!(operand.is_immediate());
/// assert_eq!(operand.to_string(), "$5");
/// assert_eq!(parser.pos(), 2);
/// # Ok::<(), pdpscope::Error>(())
/// ```
pub fn decode_operand(
    parser: &mut Parser,
    mode: AddressingMode,
    register: Register,
    address: u64,
) -> Result<Operand> {
    if !mode.needs_extension(register) {
        return Ok(Operand::register_only(mode, register));
    }

    let available = parser.remaining();
    if available < EXTENSION_SIZE {
        return Err(Error::TruncatedOperand {
            offset: parser.pos(),
            needed: EXTENSION_SIZE,
            available,
        });
    }

    let value = parser.read_le::<u16>()?;
    Ok(Operand {
        mode,
        register,
        extension: Some(Extension { value, address }),
    })
}
