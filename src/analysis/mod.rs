//! Program analysis over disassembled text segments.
//!
//! Everything here consumes the output of [`crate::disassembler`] and never decodes on its
//! own. Data flows one way: instructions feed the [`ControlFlowSummary`], the summary feeds
//! the [`CallGraph`].
//!
//! - [`flow`] - Call targets, branch targets, function starts and system calls
//! - [`callgraph`] - Function-level call graph with Mermaid output
//! - [`strings`] - Printable string discovery
//!
//! # Usage
//!
//! ```rust,no_run
//! use pdpscope::{analysis::{CallGraph, ControlFlowSummary}, File};
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("ttt"))?;
//! let disassembly = file.disassemble()?;
//! let summary = ControlFlowSummary::from_disassembly(&disassembly);
//!
//! for function in summary.functions() {
//!     println!("{:06o}..{:06o}", function.start, function.end);
//! }
//!
//! let graph = CallGraph::build(disassembly.instructions(), &summary);
//! println!("{}", graph.to_mermaid(None));
//! # Ok::<(), pdpscope::Error>(())
//! ```

pub mod callgraph;
pub mod flow;
pub mod strings;

pub use callgraph::{CallGraph, CallGraphNode};
pub use flow::{ControlFlowSummary, FunctionRange, OutOfRangeTarget, SyscallSite};
pub use strings::{find_strings, FoundString, DEFAULT_MIN_LEN};
