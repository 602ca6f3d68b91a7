//! Benchmarks for PDP-11 decoding.
//!
//! Measures the decoder at three levels:
//! - Single instructions of each length (2, 4 and 6 bytes)
//! - Linear disassembly of a synthetic text segment
//! - Control-flow summary over the decoded instructions

extern crate pdpscope;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use pdpscope::{
    analysis::ControlFlowSummary,
    disassembler::{decode_instruction, decode_stream, Coverage, DisassemblerConfig},
    Parser,
};
use std::hint::black_box;

fn words(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// A text segment mixing every instruction class, repeated to 8 KiB.
fn text_segment() -> Vec<u8> {
    let block = [
        0o004767, 0o000010, // jsr pc, .+12
        0o012700, 0o000005, // mov $5, r0
        0o016501, 0o177774, // mov -4(r5), r1
        0o001403, // beq .+10
        0o104404, // sys write
        0o105010, // clrb (r0)
        0o000207, // rts pc
        0o177777, // .word
        0o000137, 0o000100, // jmp *$100
        0o000000, // halt
    ];
    let mut data = Vec::new();
    while data.len() < 8192 {
        data.extend(words(&block));
    }
    data
}

/// Benchmark a register-only instruction.
/// clr r0
fn bench_decode_short(c: &mut Criterion) {
    let code = words(&[0o005000]);

    c.bench_function("decode_clr_register", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(&code));
            black_box(decode_instruction(&mut parser, 0, Coverage::all()).unwrap())
        });
    });
}

/// Benchmark an instruction with one extension word.
/// jsr pc, 2(pc)
fn bench_decode_call(c: &mut Criterion) {
    let code = words(&[0o004767, 0o000002]);

    c.bench_function("decode_jsr_pc_relative", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(&code));
            black_box(decode_instruction(&mut parser, 0, Coverage::all()).unwrap())
        });
    });
}

/// Benchmark an instruction with two extension words.
/// mov $1000, *$2000
fn bench_decode_long(c: &mut Criterion) {
    let code = words(&[0o012737, 0o001000, 0o002000]);

    c.bench_function("decode_mov_immediate_absolute", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(&code));
            black_box(decode_instruction(&mut parser, 0, Coverage::all()).unwrap())
        });
    });
}

/// Benchmark a word that matches no table entry and falls through every group.
fn bench_decode_word(c: &mut Criterion) {
    let code = words(&[0o177777]);

    c.bench_function("decode_data_word", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(&code));
            black_box(decode_instruction(&mut parser, 0, Coverage::all()).unwrap())
        });
    });
}

/// Benchmark a linear scan over 8 KiB of text.
fn bench_decode_stream(c: &mut Criterion) {
    let text = text_segment();
    let config = DisassemblerConfig::default().with_start(0);

    let mut group = c.benchmark_group("stream");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("decode_stream_8k", |b| {
        b.iter(|| black_box(decode_stream(black_box(&text), &config).unwrap()));
    });
    group.bench_function("decode_stream_8k_minimal", |b| {
        let config = config.with_coverage(Coverage::MINIMAL);
        b.iter(|| black_box(decode_stream(black_box(&text), &config).unwrap()));
    });
    group.finish();
}

/// Benchmark building the control-flow summary of 8 KiB of decoded text.
fn bench_control_flow(c: &mut Criterion) {
    let text = text_segment();
    let disassembly = decode_stream(&text, &DisassemblerConfig::default().with_start(0)).unwrap();

    c.bench_function("control_flow_summary_8k", |b| {
        b.iter(|| black_box(ControlFlowSummary::from_disassembly(black_box(&disassembly))));
    });
}

criterion_group!(
    benches,
    // Single instructions
    bench_decode_short,
    bench_decode_call,
    bench_decode_long,
    bench_decode_word,
    // Whole segments
    bench_decode_stream,
    bench_control_flow,
);
criterion_main!(benches);
