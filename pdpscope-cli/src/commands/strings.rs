use std::path::Path;

use pdpscope::analysis::find_strings;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_file,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct StringOutput {
    offset: usize,
    segment: &'static str,
    text: String,
}

pub fn run(path: &Path, min_len: usize, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = load_file(path)?;
    let header = file.header();
    let (text, data) = (header.text_range(), header.data_range());

    let found: Vec<StringOutput> = find_strings(file.data(), min_len)
        .into_iter()
        .map(|found| {
            let segment = if text.contains(&found.offset) {
                "text"
            } else if data.contains(&found.offset) {
                "data"
            } else if found.offset < text.start {
                "header"
            } else {
                "other"
            };
            StringOutput {
                offset: found.offset,
                segment,
                text: found.text,
            }
        })
        .collect();

    print_output(&found, opts, |found| {
        let mut tw = TabWriter::new(vec![
            ("Offset", Align::Right),
            ("Segment", Align::Left),
            ("String", Align::Left),
        ]);
        for entry in found {
            tw.row(vec![
                format!("{:06o}", entry.offset),
                entry.segment.to_string(),
                format!("{:?}", entry.text),
            ]);
        }
        tw.print();
    })
}
