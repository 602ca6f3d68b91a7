use std::io::{self, Write};

use pdpscope::{
    analysis::ControlFlowSummary,
    disassembler::{syscall_name, Instruction, Mnemonic},
};

/// Display options for the listing.
pub struct DisasmOptions {
    pub words: bool,
    pub labels: bool,
}

/// Formats a text segment as a Unix `as`-style octal listing.
pub struct ListingFormatter<'a> {
    pub opts: DisasmOptions,
    summary: &'a ControlFlowSummary,
}

impl<'a> ListingFormatter<'a> {
    pub fn new(opts: DisasmOptions, summary: &'a ControlFlowSummary) -> Self {
        Self { opts, summary }
    }

    /// Write one instruction, preceded by a function banner or label when one starts here.
    pub fn format_instruction(&self, w: &mut dyn Write, instruction: &Instruction) -> io::Result<()> {
        let address = instruction.address;

        if self.opts.labels {
            if self.summary.is_function_start(address) {
                writeln!(w)?;
                if address == self.summary.entry() {
                    writeln!(w, "; ---- function {address:06o} (entry) ----")?;
                } else {
                    writeln!(w, "; ---- function {address:06o} ----")?;
                }
            }
            if self.summary.is_branch_target(address) {
                writeln!(w, "L{address:06o}:")?;
            }
        }

        write!(w, "{address:06o}: ")?;
        if self.opts.words {
            let words: Vec<String> = std::iter::once(instruction.opcode)
                .chain(instruction.extensions.iter().copied())
                .map(|word| format!("{word:06o}"))
                .collect();
            write!(w, "{:<21}", words.join(" "))?;
        }

        let text = instruction.to_string();
        match self.comment(instruction) {
            Some(comment) => writeln!(w, "{text:<24}; {comment}"),
            None => writeln!(w, "{text}"),
        }
    }

    fn comment(&self, instruction: &Instruction) -> Option<String> {
        if let Some(number) = instruction.syscall() {
            return Some(syscall_name(number).map_or_else(|| format!("sys {number}"), String::from));
        }
        if instruction.mnemonic == Mnemonic::Jmp || instruction.mnemonic == Mnemonic::Jsr {
            return instruction.target.map(|target| {
                if self.summary.text_range().contains(&target) {
                    format!("-> {target:06o}")
                } else {
                    format!("-> {target:06o} (outside text)")
                }
            });
        }
        None
    }
}
