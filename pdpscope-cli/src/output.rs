pub use comfy_table::CellAlignment as Align;
use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Renders an address in the six-digit octal the PDP-11 tooling uses.
pub fn octal(value: u64) -> String {
    format!("{value:06o}")
}

/// Borderless columns, two spaces apart, printed line by line.
pub struct TabWriter {
    table: Table,
    indent: &'static str,
}

impl TabWriter {
    /// Each column is a `(header, alignment)` pair.
    pub fn new(columns: Vec<(&str, Align)>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.iter().map(|(name, _)| *name).collect::<Vec<_>>());

        let last = columns.len().saturating_sub(1);
        for (index, (column, (_, align))) in table.column_iter_mut().zip(&columns).enumerate() {
            column.set_cell_alignment(*align);
            column.set_padding((u16::from(index > 0), u16::from(index < last)));
        }

        Self { table, indent: "" }
    }

    /// Indents every line by two spaces.
    pub fn indented(mut self) -> Self {
        self.indent = "  ";
        self
    }

    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    pub fn print(&self) {
        for line in self.table.lines() {
            println!("{}{}", self.indent, line.trim_end());
        }
    }
}
