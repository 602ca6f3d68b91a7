//! Mermaid format utilities for graph visualization.
//!
//! This module provides utilities for generating Mermaid flowchart text, which renders
//! directly in Markdown viewers that support ```` ```mermaid ```` blocks.

/// Escapes a string for use inside a quoted Mermaid node label.
///
/// Mermaid labels are HTML-ish: quotes and angle brackets are written as entity codes
/// (`#quot;`, `#lt;`, `#gt;`) and line breaks collapse to spaces.
///
/// # Examples
///
/// ```rust
/// use pdpscope::utils::escape_mermaid;
///
/// assert_eq!(escape_mermaid("say \"hi\""), "say #quot;hi#quot;");
/// ```
#[must_use]
pub fn escape_mermaid(s: &str) -> String {
    s.replace('#', "#35;")
        .replace('"', "#quot;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
        .replace('\r', "")
        .replace('\n', " ")
}
