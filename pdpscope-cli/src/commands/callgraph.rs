use std::path::Path;

use anyhow::bail;
use pdpscope::{analysis::CallGraph, disassembler::syscall_name};
use serde::Serialize;

use crate::{
    app::{GlobalOptions, ScanOptions},
    commands::common::analyze,
    output::{octal, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct CgNodeOutput {
    start: String,
    end: String,
    instruction_count: usize,
    callees: Vec<String>,
    callers: Vec<String>,
    syscalls: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CallGraphOutput {
    function_count: usize,
    edge_count: usize,
    roots: Vec<String>,
    leaves: Vec<String>,
    nodes: Vec<CgNodeOutput>,
}

fn syscall_label(number: u8) -> String {
    syscall_name(number).map_or_else(|| format!("sys {number}"), String::from)
}

pub fn run(
    path: &Path,
    scan: &ScanOptions,
    format: &str,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let analyzed = analyze(path, scan)?;
    let cg = CallGraph::build(analyzed.disassembly.instructions(), &analyzed.summary);

    let format = if opts.json { "json" } else { format };
    match format {
        "json" => {
            let output = CallGraphOutput {
                function_count: cg.function_count(),
                edge_count: cg.edge_count(),
                roots: cg.roots().into_iter().map(octal).collect(),
                leaves: cg.leaves().into_iter().map(octal).collect(),
                nodes: cg
                    .nodes()
                    .map(|node| CgNodeOutput {
                        start: octal(node.range.start),
                        end: octal(node.range.end),
                        instruction_count: node.instruction_count,
                        callees: node.callees.iter().copied().map(octal).collect(),
                        callers: node.callers.iter().copied().map(octal).collect(),
                        syscalls: node.syscalls.iter().copied().map(syscall_label).collect(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "mermaid" => {
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned());
            print!("{}", cg.to_mermaid(title.as_deref()));
        }
        "text" => {
            println!(
                "Call graph: {} functions, {} edges",
                cg.function_count(),
                cg.edge_count()
            );
            let roots: Vec<String> = cg.roots().into_iter().map(octal).collect();
            println!("Roots: {}", roots.join(", "));
            println!();

            let mut tw = TabWriter::new(vec![
                ("Function", Align::Left),
                ("Insns", Align::Right),
                ("Calls", Align::Left),
                ("System calls", Align::Left),
            ]);
            for node in cg.nodes() {
                let callees: Vec<String> = node.callees.iter().copied().map(octal).collect();
                let syscalls: Vec<String> =
                    node.syscalls.iter().copied().map(syscall_label).collect();
                tw.row(vec![
                    octal(node.range.start),
                    node.instruction_count.to_string(),
                    callees.join(" "),
                    syscalls.join(" "),
                ]);
            }
            tw.print();
        }
        other => bail!("unknown format '{other}' (expected text, mermaid, json)"),
    }

    Ok(())
}
