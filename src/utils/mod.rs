//! Shared helpers for rendering analysis results.

mod mermaid;

pub use mermaid::escape_mermaid;
