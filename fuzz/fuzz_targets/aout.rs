#![no_main]

use libfuzzer_sys::fuzz_target;
use pdpscope::{analysis::{CallGraph, ControlFlowSummary}, File};

fuzz_target!(|data: &[u8]| {
    let Ok(file) = File::from_mem(data.to_vec()) else {
        return;
    };
    if let Ok(disassembly) = file.disassemble() {
        let summary = ControlFlowSummary::from_disassembly(&disassembly);
        let _ = CallGraph::build(disassembly.instructions(), &summary).to_mermaid(None);
    }
});
