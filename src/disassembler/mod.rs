//! PDP-11 instruction decoding and linear disassembly.
//!
//! This module turns the little-endian word stream of an a.out text segment into typed
//! [`Instruction`]s. Operands fetch their extension words from the stream, pc-relative and
//! absolute references are resolved to load addresses, and every instruction is classified
//! into branch, call and return roles for [`crate::analysis`].
//!
//! # Key Types
//! - [`Instruction`] - A decoded instruction with its raw words and roles
//! - [`Operand`] - A source or destination operand (mode, register, extension word)
//! - [`Mnemonic`] - The closed set of recognized mnemonics, `.word` for everything else
//! - [`Disassembly`] - The result of a linear scan
//! - [`DisassemblerConfig`] - Start, end, load address and [`Coverage`] of a scan
//!
//! # Main Functions
//! - [`decode_operand`] - Decode one operand field
//! - [`decode_instruction`] - Decode a single instruction
//! - [`decode_stream`] - Decode a whole text segment
//! - [`decode_many`] - Decode independent buffers in parallel
//!
//! # Example
//! ```rust
//! use pdpscope::{disassembler::{decode_instruction, Coverage}, Parser};
//!
//! let code = [0o001, 0o001]; // br .+4
//! let mut parser = Parser::new(&code);
//! let instruction = decode_instruction(&mut parser, 0, Coverage::all())?;
//! println!("{instruction}");
//! assert_eq!(instruction.target, Some(4));
//! # Ok::<(), pdpscope::Error>(())
//! ```

mod config;
mod decoder;
mod instruction;
mod operand;
mod stream;
mod syscall;

pub use config::DisassemblerConfig;
pub use decoder::{
    branch_target, decode_instruction, lookup, Coverage, OpcodeEntry, OperandFormat, DISPATCH,
};
pub use instruction::{Argument, Instruction, InstructionRoles, Mnemonic};
pub use operand::{decode_operand, AddressingMode, Extension, Operand, Register, EXTENSION_SIZE};
pub use stream::{decode_many, decode_stream, Disassembly, StopReason};
pub use syscall::{syscall_name, SYSCALL_NAMES};
