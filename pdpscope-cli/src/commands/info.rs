use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_file,
    output::{octal, print_output},
};

#[derive(Debug, Serialize)]
pub struct HeaderInfo {
    pub magic: String,
    pub magic_value: String,
    pub text_size: u16,
    pub data_size: u16,
    pub bss_size: u16,
    pub symbol_size: u16,
    pub entry: String,
    pub relocation_stripped: bool,
    pub text_offsets: [usize; 2],
    pub data_offsets: [usize; 2],
    pub file_size: usize,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let file = load_file(path)?;
    let header = file.header();
    let text = header.text_range();
    let data = header.data_range();

    let info = HeaderInfo {
        magic: header.magic.to_string(),
        magic_value: format!("{:04o}", header.magic as u16),
        text_size: header.text_size,
        data_size: header.data_size,
        bss_size: header.bss_size,
        symbol_size: header.symbol_size,
        entry: octal(u64::from(header.entry)),
        relocation_stripped: header.relocation_stripped(),
        text_offsets: [text.start, text.end],
        data_offsets: [data.start, data.end],
        file_size: file.len(),
    };

    print_output(&info, opts, |info| {
        println!("Magic:           {} ({})", info.magic, info.magic_value);
        println!("Text:            {} bytes ({:o})", info.text_size, info.text_size);
        println!("Data:            {} bytes ({:o})", info.data_size, info.data_size);
        println!("BSS:             {} bytes ({:o})", info.bss_size, info.bss_size);
        println!("Symbols:         {} bytes", info.symbol_size);
        println!("Entry point:     {}", info.entry);
        let stripped = if info.relocation_stripped { "yes" } else { "no" };
        println!("Reloc stripped:  {stripped}");
        println!(
            "Text offsets:    {:#o}..{:#o}",
            info.text_offsets[0], info.text_offsets[1]
        );
        println!(
            "Data offsets:    {:#o}..{:#o}",
            info.data_offsets[0], info.data_offsets[1]
        );
        println!("File size:       {} bytes", info.file_size);
    })
}
