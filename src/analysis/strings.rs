//! Printable string discovery.

/// Shortest run [`find_strings`] reports by default.
pub const DEFAULT_MIN_LEN: usize = 4;

/// A run of printable ASCII bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundString {
    /// Buffer offset of the first byte
    pub offset: usize,
    /// The text
    pub text: String,
}

/// Finds every run of at least `min_len` printable ASCII bytes (`0x20..0x7f`) in `data`.
///
/// Runs are maximal and reported in offset order.
///
/// # Examples
///
/// ```rust
/// use pdpscope::analysis::find_strings;
///
/// let found = find_strings(b"\x00\x01I win\x00ab\x00", 4);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].offset, 2);
/// assert_eq!(found[0].text, "I win");
/// ```
#[must_use]
pub fn find_strings(data: &[u8], min_len: usize) -> Vec<FoundString> {
    let mut found = Vec::new();
    let mut run_start = None;

    for (offset, &byte) in data.iter().enumerate() {
        let printable = (0x20..0x7f).contains(&byte);
        match (printable, run_start) {
            (true, None) => run_start = Some(offset),
            (false, Some(start)) => {
                push_run(&mut found, data, start, offset, min_len);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        push_run(&mut found, data, start, data.len(), min_len);
    }

    found
}

fn push_run(found: &mut Vec<FoundString>, data: &[u8], start: usize, end: usize, min_len: usize) {
    if end - start >= min_len.max(1) {
        found.push(FoundString {
            offset: start,
            text: String::from_utf8_lossy(&data[start..end]).into_owned(),
        });
    }
}
