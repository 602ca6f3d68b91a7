pub mod callgraph;
pub mod common;
pub mod disasm;
pub mod flow;
pub mod info;
pub mod strings;
pub mod ttt;
