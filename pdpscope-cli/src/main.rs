mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    // Show pdpscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("pdpscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Info { path } => commands::info::run(path, &cli.global),
        Command::Disasm {
            path,
            scan,
            no_words,
            no_labels,
        } => commands::disasm::run(
            path,
            scan,
            commands::disasm::DisasmOptions {
                words: !*no_words,
                labels: !*no_labels,
            },
            &cli.global,
        ),
        Command::Flow { path, scan } => commands::flow::run(path, scan, &cli.global),
        Command::Callgraph {
            path,
            scan,
            format,
        } => commands::callgraph::run(path, scan, format, &cli.global),
        Command::Strings { path, min_len } => commands::strings::run(path, *min_len, &cli.global),
        Command::Ttt { board } => commands::ttt::run(board.as_deref(), &cli.global),
    }
}
