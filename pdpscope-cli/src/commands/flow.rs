use std::path::Path;

use serde::Serialize;

use crate::{
    app::{GlobalOptions, ScanOptions},
    commands::common::{analyze, describe_stop},
    output::{octal, print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct FunctionOutput {
    start: String,
    end: String,
    size: u64,
}

#[derive(Debug, Serialize)]
struct SyscallOutput {
    address: String,
    number: u8,
    name: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct OutOfRangeOutput {
    from: String,
    target: String,
}

#[derive(Debug, Serialize)]
struct FlowOutput {
    text_range: [String; 2],
    stop: String,
    instruction_count: usize,
    call_sites: usize,
    branch_sites: usize,
    call_targets: Vec<String>,
    branch_targets: Vec<String>,
    function_starts: Vec<String>,
    functions: Vec<FunctionOutput>,
    syscalls: Vec<SyscallOutput>,
    out_of_range: Vec<OutOfRangeOutput>,
}

pub fn run(path: &Path, scan: &ScanOptions, opts: &GlobalOptions) -> anyhow::Result<()> {
    let analyzed = analyze(path, scan)?;
    let summary = &analyzed.summary;
    let range = summary.text_range();

    let output = FlowOutput {
        text_range: [octal(range.start), octal(range.end)],
        stop: describe_stop(analyzed.disassembly.stop_reason()),
        instruction_count: analyzed.disassembly.instructions().len(),
        call_sites: summary.call_sites(),
        branch_sites: summary.branch_sites(),
        call_targets: summary.call_targets().iter().copied().map(octal).collect(),
        branch_targets: summary.branch_targets().iter().copied().map(octal).collect(),
        function_starts: summary.function_starts().iter().copied().map(octal).collect(),
        functions: summary
            .functions()
            .iter()
            .map(|function| FunctionOutput {
                start: octal(function.start),
                end: octal(function.end),
                size: function.len(),
            })
            .collect(),
        syscalls: summary
            .syscalls()
            .iter()
            .map(|site| SyscallOutput {
                address: octal(site.address),
                number: site.number,
                name: site.name(),
            })
            .collect(),
        out_of_range: summary
            .out_of_range()
            .iter()
            .map(|diagnostic| OutOfRangeOutput {
                from: octal(diagnostic.from),
                target: octal(diagnostic.target),
            })
            .collect(),
    };

    print_output(&output, opts, |flow| {
        println!("Text:            {}..{}", flow.text_range[0], flow.text_range[1]);
        println!("Scan:            {}", flow.stop);
        println!("Instructions:    {}", flow.instruction_count);
        println!("Call sites:      {}", flow.call_sites);
        println!("Branch sites:    {}", flow.branch_sites);
        println!("Call targets:    {}", flow.call_targets.join(" "));
        println!("Branch targets:  {}", flow.branch_targets.len());

        println!("\nFunctions:");
        let mut tw = TabWriter::new(vec![
            ("Start", Align::Left),
            ("End", Align::Left),
            ("Bytes", Align::Right),
        ])
        .indented();
        for function in &flow.functions {
            tw.row(vec![
                function.start.clone(),
                function.end.clone(),
                function.size.to_string(),
            ]);
        }
        tw.print();

        if !flow.syscalls.is_empty() {
            println!("\nSystem calls:");
            let mut tw = TabWriter::new(vec![
                ("Address", Align::Left),
                ("Number", Align::Right),
                ("Name", Align::Left),
            ])
            .indented();
            for site in &flow.syscalls {
                tw.row(vec![
                    site.address.clone(),
                    site.number.to_string(),
                    site.name.unwrap_or("?").to_string(),
                ]);
            }
            tw.print();
        }

        if !flow.out_of_range.is_empty() {
            println!("\nTargets outside the text segment:");
            for diagnostic in &flow.out_of_range {
                println!("  {} -> {}", diagnostic.from, diagnostic.target);
            }
        }
    })
}
