//! # pdpscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! pdpscope library. Import this module to get quick access to the essential types for
//! PDP-11 a.out analysis.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all pdpscope operations
pub use crate::Error;

/// The result type used throughout pdpscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Executable loading, header and low-level word parsing
pub use crate::{AoutHeader, File, Parser};

/// a.out format magic
pub use crate::file::aout::AoutMagic;

// ================================================================================================
// Disassembler
// ================================================================================================

/// Scan configuration and decoder coverage
pub use crate::disassembler::{Coverage, DisassemblerConfig};

/// Decoded instructions and their parts
pub use crate::disassembler::{
    AddressingMode, Argument, Instruction, InstructionRoles, Mnemonic, Operand, Register,
};

/// Decoding entry points
pub use crate::disassembler::{decode_instruction, decode_many, decode_stream};

/// Linear scan results
pub use crate::disassembler::{Disassembly, StopReason};

/// Unix system-call names
pub use crate::disassembler::syscall_name;

// ================================================================================================
// Analysis
// ================================================================================================

/// Control-flow summary and its diagnostics
pub use crate::analysis::{ControlFlowSummary, FunctionRange, OutOfRangeTarget, SyscallSite};

/// Function-level call graph
pub use crate::analysis::{CallGraph, CallGraphNode};

/// Printable string discovery
pub use crate::analysis::{find_strings, FoundString};

// ================================================================================================
// Solver
// ================================================================================================

/// Tic-tac-toe positions and the minimax solver
pub use crate::solver::{Board, Cell, Move, Outcome, SearchStats, Solver};
