// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # pdpscope
//!
//! A framework for decoding and analyzing PDP-11 Unix `a.out` executables, built around the
//! tic-tac-toe program shipped with Unix V4 (1973).
//!
//! `pdpscope` turns the little-endian word stream of a text segment into typed instructions,
//! follows variable-length operand extension words, resolves pc-relative and absolute
//! branch and call targets, and recovers function boundaries from the result.
//!
//! ## Features
//!
//! - **📦 Efficient memory access** - Memory-mapped files, decoding straight from the mapped bytes
//! - **⚡ Total disassembly** - Every word decodes; unknown encodings become `.word` data
//! - **🔍 Control flow recovery** - Call targets, branch targets, function ranges and system calls
//! - **📊 Call graphs** - Function-level graphs rendered as Mermaid flowcharts
//! - **🎲 Game-tree solver** - The game the binary plays, solved by memoized minimax
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! pdpscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use pdpscope::prelude::*;
//!
//! let file = File::from_file("ttt".as_ref())?;
//! let disassembly = file.disassemble()?;
//! let summary = ControlFlowSummary::from_disassembly(&disassembly);
//! println!("Found {} functions", summary.function_starts().len());
//! # Ok::<(), pdpscope::Error>(())
//! ```
//!
//! ### Decoding Raw Words
//!
//! ```rust
//! use pdpscope::disassembler::{decode_stream, DisassemblerConfig};
//!
//! // mov $5, r0; rts pc
//! let code = [0o300, 0o25, 0o5, 0o0, 0o207, 0o0];
//! let disassembly = decode_stream(&code, &DisassemblerConfig::default().with_start(0))?;
//!
//! for instruction in disassembly.instructions() {
//!     println!("{:06o}: {}", instruction.address, instruction);
//! }
//! assert_eq!(disassembly.instructions()[0].to_string(), "mov $5, r0");
//! # Ok::<(), pdpscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Data flows one way through the crate:
//!
//! ```text
//! bytes -> file::File -> disassembler::decode_stream -> Disassembly
//!       -> analysis::ControlFlowSummary -> analysis::CallGraph
//! ```
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`file`] - a.out loading and the little-endian [`Parser`]
//! - [`disassembler`] - PDP-11 instruction decoding and linear disassembly
//! - [`analysis`] - Control-flow summary, call graph, string scanning
//! - [`solver`] - Tic-tac-toe minimax solver
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use pdpscope::{Error, File};
//!
//! match File::from_file(std::path::Path::new("ttt")) {
//!     Ok(file) => println!("{} text bytes", file.text().len()),
//!     Err(Error::NotSupported(magic)) => println!("Not an a.out binary: {magic:o}"),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed file: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench --bench decoder
//! cargo +nightly fuzz run aout --release
//! ```

#[macro_use]
pub(crate) mod error;

pub mod file;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use pdpscope::prelude::*;
///
/// let file = File::from_file("ttt".as_ref())?;
/// let instructions = file.disassemble()?.into_instructions();
/// # Ok::<(), pdpscope::Error>(())
/// ```
pub mod prelude;

pub mod disassembler;

pub mod analysis;

pub mod solver;

pub mod utils;

/// `pdpscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `pdpscope` Error type
///
/// The main error type for all operations in this crate. See [`Error`] for the individual
/// conditions.
pub use error::Error;

/// Executable access and the low-level word parser
///
/// [`File`] loads an a.out executable from disk or memory; [`Parser`] reads little-endian
/// words from any byte slice.
pub use file::{aout::AoutHeader, parser::Parser, File};
