use std::path::Path;

use anyhow::Context;
use pdpscope::{
    analysis::ControlFlowSummary,
    disassembler::{Coverage, DisassemblerConfig, Disassembly, StopReason},
    File,
};

use crate::app::ScanOptions;

/// Load an a.out executable, memory-mapped.
pub fn load_file(path: &Path) -> anyhow::Result<File> {
    File::from_file(path).with_context(|| format!("failed to load executable: {}", path.display()))
}

/// Build the scan configuration for `file` from the command-line overrides.
pub fn scan_config(file: &File, scan: &ScanOptions) -> anyhow::Result<DisassemblerConfig> {
    let mut config = DisassemblerConfig::for_header(file.header()).with_base(scan.base);
    if let Some(start) = scan.start {
        config = config.with_start(usize::try_from(start).context("start offset too large")?);
    }
    if let Some(end) = scan.end {
        config = config.with_end(usize::try_from(end).context("end offset too large")?);
    }
    if scan.minimal {
        config = config.with_coverage(Coverage::MINIMAL);
    }
    Ok(config)
}

/// A loaded executable with its text segment disassembled and summarized.
pub struct Analyzed {
    pub file: File,
    pub disassembly: Disassembly,
    pub summary: ControlFlowSummary,
}

/// Load, disassemble and summarize `path`.
pub fn analyze(path: &Path, scan: &ScanOptions) -> anyhow::Result<Analyzed> {
    let file = load_file(path)?;
    let config = scan_config(&file, scan)?;
    let disassembly = file
        .disassemble_with(&config)
        .with_context(|| format!("failed to disassemble: {}", path.display()))?;
    let summary = ControlFlowSummary::from_disassembly(&disassembly);

    Ok(Analyzed {
        file,
        disassembly,
        summary,
    })
}

/// One-line description of how a scan ended.
pub fn describe_stop(stop: &StopReason) -> String {
    match stop {
        StopReason::Complete => "complete".to_string(),
        StopReason::TrailingByte { offset } => format!("trailing byte at offset {offset:#o}"),
        StopReason::Truncated { offset, .. } => format!("truncated at offset {offset:#o}"),
    }
}
