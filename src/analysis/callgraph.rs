//! Function-level call graph.
//!
//! Nodes are the [`FunctionRange`]s of a [`ControlFlowSummary`]; an edge `a -> b` means some
//! instruction inside function `a` calls the function starting at `b`. System calls are
//! recorded per function, outside the edge set.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write,
};

use crate::{
    analysis::flow::{ControlFlowSummary, FunctionRange},
    disassembler::{syscall_name, Instruction},
    utils::escape_mermaid,
};

/// One function of the call graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallGraphNode {
    /// Address range of the function
    pub range: FunctionRange,
    /// Entry addresses of the functions this one calls
    pub callees: BTreeSet<u64>,
    /// Entry addresses of the functions that call this one
    pub callers: BTreeSet<u64>,
    /// System-call numbers issued from this function
    pub syscalls: BTreeSet<u8>,
    /// Number of instructions in the function
    pub instruction_count: usize,
}

impl CallGraphNode {
    fn new(range: FunctionRange) -> Self {
        CallGraphNode {
            range,
            callees: BTreeSet::new(),
            callers: BTreeSet::new(),
            syscalls: BTreeSet::new(),
            instruction_count: 0,
        }
    }

    /// Returns `true` if the function calls no other function.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.callees.is_empty()
    }
}

/// Inter-procedural call graph of a text segment.
///
/// # Example
///
/// ```rust
/// use pdpscope::{
///     analysis::{CallGraph, ControlFlowSummary},
///     disassembler::{decode_stream, DisassemblerConfig},
/// };
///
/// // jsr pc, 2(pc); rts pc; rts pc
/// let code = [0o367, 0o11, 0o2, 0o0, 0o207, 0o0, 0o207, 0o0];
/// let disassembly = decode_stream(&code, &DisassemblerConfig::default().with_start(0))?;
/// let summary = ControlFlowSummary::from_disassembly(&disassembly);
/// let graph = CallGraph::build(disassembly.instructions(), &summary);
///
/// assert_eq!(graph.callees(0), vec![6]);
/// assert_eq!(graph.callers(6), vec![0]);
/// println!("{}", graph.to_mermaid(Some("example")));
/// # Ok::<(), pdpscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    nodes: BTreeMap<u64, CallGraphNode>,
}

impl CallGraph {
    /// Builds the call graph of `instructions` from the functions `summary` identified.
    ///
    /// Instructions outside every function (before the first function start) contribute
    /// nothing. Calls without a resolved in-range target produce no edge.
    #[must_use]
    pub fn build(instructions: &[Instruction], summary: &ControlFlowSummary) -> Self {
        let mut nodes: BTreeMap<u64, CallGraphNode> = summary
            .functions()
            .into_iter()
            .map(|range| (range.start, CallGraphNode::new(range)))
            .collect();

        let mut edges = Vec::new();
        for instruction in instructions {
            let Some(function) = summary.function_containing(instruction.address) else {
                continue;
            };
            let Some(node) = nodes.get_mut(&function.start) else {
                continue;
            };

            node.instruction_count += 1;
            if let Some(number) = instruction.syscall() {
                node.syscalls.insert(number);
            }
            if let Some(target) = instruction.target {
                if instruction.is_call() && summary.call_targets().contains(&target) {
                    edges.push((function.start, target));
                }
            }
        }

        for (caller, callee) in edges {
            if let Some(node) = nodes.get_mut(&caller) {
                node.callees.insert(callee);
            }
            if let Some(node) = nodes.get_mut(&callee) {
                node.callers.insert(caller);
            }
        }

        CallGraph { nodes }
    }

    /// Number of functions.
    #[must_use]
    pub fn function_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct caller/callee pairs.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.callees.len()).sum()
    }

    /// The function starting at `start`.
    #[must_use]
    pub fn node(&self, start: u64) -> Option<&CallGraphNode> {
        self.nodes.get(&start)
    }

    /// All functions in address order.
    pub fn nodes(&self) -> impl Iterator<Item = &CallGraphNode> {
        self.nodes.values()
    }

    /// Entry addresses of the functions called by the function at `caller`.
    #[must_use]
    pub fn callees(&self, caller: u64) -> Vec<u64> {
        self.nodes
            .get(&caller)
            .map(|node| node.callees.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Entry addresses of the functions that call the function at `callee`.
    #[must_use]
    pub fn callers(&self, callee: u64) -> Vec<u64> {
        self.nodes
            .get(&callee)
            .map(|node| node.callers.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Functions nothing calls.
    #[must_use]
    pub fn roots(&self) -> Vec<u64> {
        self.nodes
            .values()
            .filter(|node| node.callers.is_empty())
            .map(|node| node.range.start)
            .collect()
    }

    /// Functions that call nothing.
    #[must_use]
    pub fn leaves(&self) -> Vec<u64> {
        self.nodes
            .values()
            .filter(|node| node.is_leaf())
            .map(|node| node.range.start)
            .collect()
    }

    /// Renders the graph as a Mermaid flowchart.
    ///
    /// Functions are boxes labelled with their octal entry address; system calls issued by a
    /// function hang off it as rounded nodes connected by dotted edges.
    #[must_use]
    pub fn to_mermaid(&self, title: Option<&str>) -> String {
        let mut out = String::new();

        if let Some(title) = title {
            let _ = writeln!(out, "---\ntitle: \"{}\"\n---", escape_mermaid(title));
        }
        out.push_str("flowchart TD\n");

        let mut syscalls = BTreeSet::new();
        for node in self.nodes.values() {
            let start = node.range.start;
            let _ = writeln!(
                out,
                "    f{start:06o}[\"{start:06o} ({} instructions)\"]",
                node.instruction_count
            );
            syscalls.extend(node.syscalls.iter().copied());
        }
        for number in &syscalls {
            let name = syscall_name(*number).map_or_else(|| format!("sys {number}"), String::from);
            let _ = writeln!(out, "    sys{number}([\"{}\"])", escape_mermaid(&name));
        }

        for node in self.nodes.values() {
            let start = node.range.start;
            for callee in &node.callees {
                let _ = writeln!(out, "    f{start:06o} --> f{callee:06o}");
            }
            for number in &node.syscalls {
                let _ = writeln!(out, "    f{start:06o} -.-> sys{number}");
            }
        }

        out
    }
}
