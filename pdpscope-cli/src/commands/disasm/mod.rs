mod formatter;

use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

use serde::Serialize;

pub use crate::commands::disasm::formatter::DisasmOptions;
use crate::{
    app::{GlobalOptions, ScanOptions},
    commands::{
        common::{analyze, describe_stop},
        disasm::formatter::ListingFormatter,
    },
    output::octal,
};

#[derive(Debug, Serialize)]
struct InstructionOutput {
    address: String,
    offset: usize,
    words: Vec<String>,
    mnemonic: String,
    operands: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListingOutput {
    text_range: [String; 2],
    stop: String,
    bytes_decoded: usize,
    instructions: Vec<InstructionOutput>,
}

pub fn run(
    path: &Path,
    scan: &ScanOptions,
    opts: DisasmOptions,
    global: &GlobalOptions,
) -> anyhow::Result<()> {
    let analyzed = analyze(path, scan)?;
    let disassembly = &analyzed.disassembly;

    if global.json {
        let range = disassembly.text_range();
        let output = ListingOutput {
            text_range: [octal(range.start), octal(range.end)],
            stop: describe_stop(disassembly.stop_reason()),
            bytes_decoded: disassembly.bytes_decoded(),
            instructions: disassembly
                .instructions()
                .iter()
                .map(|instruction| InstructionOutput {
                    address: octal(instruction.address),
                    offset: instruction.offset,
                    words: std::iter::once(instruction.opcode)
                        .chain(instruction.extensions.iter().copied())
                        .map(|word| format!("{word:06o}"))
                        .collect(),
                    mnemonic: instruction.mnemonic.to_string(),
                    operands: instruction.operands(),
                    roles: instruction
                        .roles
                        .iter_names()
                        .map(|(name, _)| name.to_lowercase())
                        .collect(),
                    target: instruction.target.map(octal),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let fmt = ListingFormatter::new(opts, &analyzed.summary);
    let stdout = io::stdout();
    let mut w = BufWriter::new(stdout.lock());

    for instruction in disassembly.instructions() {
        fmt.format_instruction(&mut w, instruction)?;
    }
    w.flush()?;

    if !disassembly.is_complete() {
        log::warn!(
            "scan {}, {} bytes not decoded",
            describe_stop(disassembly.stop_reason()),
            disassembly.bytes_abandoned()
        );
    }
    Ok(())
}
