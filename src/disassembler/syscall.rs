//! Unix V4 system-call numbers.
//!
//! Early Unix enters the kernel through the `trap` instruction (`sys n`); the low six bits of
//! the instruction word select the call.

/// Names of the Unix V4 system calls, indexed by call number.
pub const SYSCALL_NAMES: [&str; 24] = [
    "indir", "exit", "fork", "read", "write", "open", "close", "wait", "creat", "link", "unlink",
    "exec", "chdir", "time", "mknod", "chmod", "chown", "break", "stat", "seek", "getpid",
    "mount", "umount", "setuid",
];

/// Returns the name of system call `number`, if it is one Unix V4 defines.
///
/// # Examples
///
/// ```rust
/// use pdpscope::disassembler::syscall_name;
///
/// assert_eq!(syscall_name(4), Some("write"));
/// assert_eq!(syscall_name(60), None);
/// ```
#[must_use]
pub fn syscall_name(number: u8) -> Option<&'static str> {
    SYSCALL_NAMES.get(usize::from(number)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_calls() {
        assert_eq!(syscall_name(0), Some("indir"));
        assert_eq!(syscall_name(1), Some("exit"));
        assert_eq!(syscall_name(17), Some("break"));
        assert_eq!(syscall_name(23), Some("setuid"));
        assert_eq!(syscall_name(24), None);
    }
}
