//! Control-flow summary of a linear disassembly.
//!
//! A single pass over the instruction sequence collects where calls and branches go. Calls
//! into the text segment mark function entry points; together with the program entry they
//! partition the text into [`FunctionRange`]s. The summary is derived data: rebuild it from
//! the instructions whenever they change.

use std::{collections::BTreeSet, ops::Range};

use crate::disassembler::{syscall_name, Disassembly, Instruction};

/// A resolved call or branch target outside the scanned text.
///
/// Such targets are kept on the originating [`Instruction`] but excluded from the summary
/// sets; they typically point at data, library stubs or the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutOfRangeTarget {
    /// Address of the instruction
    pub from: u64,
    /// The resolved target
    pub target: u64,
}

/// A `sys` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyscallSite {
    /// Address of the instruction
    pub address: u64,
    /// System-call number
    pub number: u8,
}

impl SyscallSite {
    /// The Unix V4 name of the call, if known.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        syscall_name(self.number)
    }
}

/// The half-open address range of one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionRange {
    /// Entry address
    pub start: u64,
    /// First address past the function
    pub end: u64,
}

impl FunctionRange {
    /// Returns `true` if `address` lies within the function.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        (self.start..self.end).contains(&address)
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns `true` if the function covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Call targets, branch targets and function starts of a text segment.
///
/// # Examples
///
/// ```rust
/// use pdpscope::{
///     analysis::ControlFlowSummary,
///     disassembler::{decode_stream, DisassemblerConfig},
/// };
///
/// // jsr pc, 2(pc); rts pc; rts pc
/// let code = [0o367, 0o11, 0o2, 0o0, 0o207, 0o0, 0o207, 0o0];
/// let disassembly = decode_stream(&code, &DisassemblerConfig::default().with_start(0))?;
/// let summary = ControlFlowSummary::from_disassembly(&disassembly);
///
/// assert!(summary.call_targets().contains(&6));
/// assert_eq!(summary.function_starts().iter().copied().collect::<Vec<_>>(), vec![0, 6]);
/// # Ok::<(), pdpscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFlowSummary {
    call_targets: BTreeSet<u64>,
    branch_targets: BTreeSet<u64>,
    function_starts: BTreeSet<u64>,
    out_of_range: Vec<OutOfRangeTarget>,
    syscalls: Vec<SyscallSite>,
    call_sites: usize,
    branch_sites: usize,
    text_range: Range<u64>,
    entry: u64,
}

impl ControlFlowSummary {
    /// Builds the summary of `instructions`, which were decoded from `text_range`.
    ///
    /// `entry` is always a function start, whether or not anything calls it.
    #[must_use]
    pub fn build(instructions: &[Instruction], text_range: Range<u64>, entry: u64) -> Self {
        let mut summary = ControlFlowSummary {
            call_targets: BTreeSet::new(),
            branch_targets: BTreeSet::new(),
            function_starts: BTreeSet::new(),
            out_of_range: Vec::new(),
            syscalls: Vec::new(),
            call_sites: 0,
            branch_sites: 0,
            text_range,
            entry,
        };

        for instruction in instructions {
            if instruction.is_call() {
                summary.call_sites += 1;
            }
            if instruction.is_branch() {
                summary.branch_sites += 1;
            }
            if let Some(number) = instruction.syscall() {
                summary.syscalls.push(SyscallSite {
                    address: instruction.address,
                    number,
                });
            }

            let Some(target) = instruction.target else {
                continue;
            };

            if !summary.text_range.contains(&target) {
                log::debug!(
                    "{:06o}: {} targets {:06o} outside the text segment",
                    instruction.address,
                    instruction.mnemonic,
                    target
                );
                summary.out_of_range.push(OutOfRangeTarget {
                    from: instruction.address,
                    target,
                });
                continue;
            }

            if instruction.is_call() {
                summary.call_targets.insert(target);
            } else if instruction.is_branch() {
                summary.branch_targets.insert(target);
            }
        }

        summary.function_starts.insert(entry);
        summary
            .function_starts
            .extend(summary.call_targets.iter().copied());

        summary
    }

    /// Builds the summary of a disassembly, using the start of its text range as entry point.
    #[must_use]
    pub fn from_disassembly(disassembly: &Disassembly) -> Self {
        let text_range = disassembly.text_range();
        let entry = text_range.start;
        Self::build(disassembly.instructions(), text_range, entry)
    }

    /// Targets of calls that land inside the text segment.
    #[must_use]
    pub fn call_targets(&self) -> &BTreeSet<u64> {
        &self.call_targets
    }

    /// Targets of branches and jumps that land inside the text segment.
    #[must_use]
    pub fn branch_targets(&self) -> &BTreeSet<u64> {
        &self.branch_targets
    }

    /// The entry point together with every call target.
    #[must_use]
    pub fn function_starts(&self) -> &BTreeSet<u64> {
        &self.function_starts
    }

    /// Resolved targets that were excluded because they lie outside the text segment.
    #[must_use]
    pub fn out_of_range(&self) -> &[OutOfRangeTarget] {
        &self.out_of_range
    }

    /// Every `sys` instruction, in address order.
    #[must_use]
    pub fn syscalls(&self) -> &[SyscallSite] {
        &self.syscalls
    }

    /// Number of call instructions, resolved or not.
    #[must_use]
    pub fn call_sites(&self) -> usize {
        self.call_sites
    }

    /// Number of branch instructions, resolved or not.
    #[must_use]
    pub fn branch_sites(&self) -> usize {
        self.branch_sites
    }

    /// The address range the instructions were decoded from.
    #[must_use]
    pub fn text_range(&self) -> Range<u64> {
        self.text_range.clone()
    }

    /// The program entry point.
    #[must_use]
    pub fn entry(&self) -> u64 {
        self.entry
    }

    /// Partitions the text segment at the function starts.
    ///
    /// Each function extends up to the next start or the end of the text. Starts outside the
    /// text range are skipped; bytes before the first start belong to no function.
    #[must_use]
    pub fn functions(&self) -> Vec<FunctionRange> {
        let starts: Vec<u64> = self
            .function_starts
            .iter()
            .copied()
            .filter(|start| self.text_range.contains(start))
            .collect();

        starts
            .iter()
            .enumerate()
            .map(|(index, &start)| FunctionRange {
                start,
                end: starts.get(index + 1).copied().unwrap_or(self.text_range.end),
            })
            .collect()
    }

    /// The function `address` belongs to.
    #[must_use]
    pub fn function_containing(&self, address: u64) -> Option<FunctionRange> {
        if !self.text_range.contains(&address) {
            return None;
        }

        let start = *self
            .function_starts
            .range(self.text_range.start..=address)
            .next_back()?;
        let end = self
            .function_starts
            .range(address + 1..self.text_range.end)
            .next()
            .copied()
            .unwrap_or(self.text_range.end);

        Some(FunctionRange { start, end })
    }

    /// Returns `true` if a function begins at `address`.
    #[must_use]
    pub fn is_function_start(&self, address: u64) -> bool {
        self.function_starts.contains(&address)
    }

    /// Returns `true` if some branch lands on `address`.
    #[must_use]
    pub fn is_branch_target(&self, address: u64) -> bool {
        self.branch_targets.contains(&address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disassembler::{decode_stream, DisassemblerConfig};

    fn summarize(words: &[u16]) -> ControlFlowSummary {
        let data: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        let config = DisassemblerConfig::default().with_start(0);
        let disassembly = decode_stream(&data, &config).unwrap();
        ControlFlowSummary::from_disassembly(&disassembly)
    }

    fn set(values: &[u64]) -> BTreeSet<u64> {
        values.iter().copied().collect()
    }

    #[test]
    fn aggregation() {
        let mut words = vec![0o000240; 20];
        words[0] = 0o004767; // jsr pc at 0, extension at 2: 2 + 2 + 6 = 10
        words[1] = 0o000006;
        words[2] = 0o004767; // jsr pc at 4, extension at 6: 6 + 2 + 12 = 20
        words[3] = 0o000014;
        words[4] = 0o000412; // br at 8: 8 + 2 + 2 * 10 = 30
        let summary = summarize(&words);

        assert_eq!(summary.call_targets(), &set(&[10, 20]));
        assert_eq!(summary.branch_targets(), &set(&[30]));
        assert_eq!(summary.function_starts(), &set(&[0, 10, 20]));
        assert_eq!(summary.call_sites(), 2);
        assert_eq!(summary.branch_sites(), 1);
        assert!(summary.out_of_range().is_empty());
    }

    #[test]
    fn out_of_range_targets_excluded() {
        // jsr pc, far away; br backwards past the start
        let summary = summarize(&[0o004767, 0o001000, 0o000770]);

        assert!(summary.call_targets().is_empty());
        assert!(summary.branch_targets().is_empty());
        assert_eq!(summary.function_starts(), &set(&[0]));
        assert_eq!(
            summary.out_of_range(),
            &[
                OutOfRangeTarget {
                    from: 0,
                    target: 0o1004
                },
                OutOfRangeTarget {
                    from: 4,
                    target: 6_u64.wrapping_sub(16)
                },
            ]
        );
    }

    #[test]
    fn backward_branch_inside_range() {
        // rts pc; br .-2 -> 2 + 2 - 4 = 0
        let summary = summarize(&[0o000207, 0o000776]);
        assert_eq!(summary.branch_targets(), &set(&[0]));
    }

    #[test]
    fn unresolved_targets_ignored() {
        // jsr pc, (r1); jmp (r0); emt 1
        let summary = summarize(&[0o004711, 0o000110, 0o104001]);

        assert!(summary.call_targets().is_empty());
        assert!(summary.branch_targets().is_empty());
        assert!(summary.out_of_range().is_empty());
        assert_eq!(summary.call_sites(), 2);
        assert!(summary.syscalls().is_empty());
    }

    #[test]
    fn syscalls_collected() {
        let summary = summarize(&[0o104404, 0o000207, 0o104401]);
        let syscalls = summary.syscalls();

        assert_eq!(syscalls.len(), 2);
        assert_eq!(syscalls[0].address, 0);
        assert_eq!(syscalls[0].name(), Some("write"));
        assert_eq!(syscalls[1].address, 4);
        assert_eq!(syscalls[1].name(), Some("exit"));
    }

    #[test]
    fn function_partition() {
        let summary = ControlFlowSummary {
            function_starts: set(&[0, 10, 20]),
            ..ControlFlowSummary::build(&[], 0..32, 0)
        };
        let functions = summary.functions();

        assert_eq!(
            functions,
            vec![
                FunctionRange { start: 0, end: 10 },
                FunctionRange { start: 10, end: 20 },
                FunctionRange { start: 20, end: 32 },
            ]
        );
        assert_eq!(summary.function_containing(12), Some(functions[1]));
        assert_eq!(summary.function_containing(20), Some(functions[2]));
        assert_eq!(summary.function_containing(31), Some(functions[2]));
        assert_eq!(summary.function_containing(32), None);
        assert_eq!(functions[2].len(), 12);
    }

    #[test]
    fn entry_inside_text() {
        let summary = ControlFlowSummary::build(&[], 0o100..0o200, 0o120);

        assert_eq!(summary.function_starts(), &set(&[0o120]));
        assert_eq!(summary.function_containing(0o110), None);
        assert_eq!(
            summary.functions(),
            vec![FunctionRange {
                start: 0o120,
                end: 0o200
            }]
        );
    }

    #[test]
    fn emt_is_not_a_syscall() {
        // emt 17; sys 1; sys 77
        let summary = summarize(&[0o104017, 0o104401, 0o104477]);

        assert_eq!(
            summary.syscalls(),
            &[
                SyscallSite {
                    address: 2,
                    number: 1
                },
                SyscallSite {
                    address: 4,
                    number: 0o77
                },
            ]
        );
        assert_eq!(summary.syscalls()[1].name(), None);
    }
}
