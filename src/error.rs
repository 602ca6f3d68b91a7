use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Decoding PDP-11 machine code is deliberately forgiving: an opcode word that matches no
/// known encoding becomes a `.word` data pseudo-instruction and a branch target that points
/// outside the scanned text is merely recorded as a diagnostic. The variants below are the
/// conditions that genuinely cannot be decoded past.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::TruncatedOperand`] - An addressing mode needs an extension word past the end of the text
/// - [`Error::OutOfBounds`] - Attempted to read beyond buffer boundaries
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted header or inconsistent scan configuration
/// - [`Error::NotSupported`] - The a.out magic number is not one we understand
/// - [`Error::Empty`] - Empty input provided
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Error`] - Other failures (e.g. memory mapping)
///
/// # Examples
///
/// ```rust,no_run
/// use pdpscope::{Error, File};
/// use std::path::Path;
///
/// match File::from_file(Path::new("ttt")) {
///     Ok(file) => println!("text segment is {} bytes", file.header().text_size),
///     Err(Error::NotSupported(magic)) => eprintln!("not an a.out binary: {magic:06o}"),
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {io_err}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An operand's addressing mode demands an extension word beyond the end of the buffer.
    ///
    /// This is the single abort condition of the linear disassembler: once an extension
    /// word is missing the instruction boundary of everything that follows is unknown, so
    /// the scan stops. Everything decoded before `offset` stays valid.
    ///
    /// # Fields
    ///
    /// * `offset` - Buffer offset at which the extension word was expected
    /// * `needed` - Number of bytes the extension requires (always 2)
    /// * `available` - Number of bytes actually left in the buffer
    #[error("Truncated operand at offset {offset:#x}: needed {needed} bytes, {available} available")]
    TruncatedOperand {
        /// Buffer offset of the missing extension word
        offset: usize,
        /// Bytes required by the addressing mode
        needed: usize,
        /// Bytes remaining in the buffer
        available: usize,
    },

    /// The file is damaged or the request is inconsistent and could not be processed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Carries the magic number that was found in place of `0407`, `0410` or `0411`.
    #[error("This file type is not supported - magic {0:#o}")]
    NotSupported(u16),

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// A tic-tac-toe move named a cell that is out of range or already taken, or the game
    /// was already over.
    #[error("Illegal move - cell {0}")]
    IllegalMove(usize),

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_carries_location() {
        let err = malformed_error!("bad start {}", 42);
        match err {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "bad start 42");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("Expected Error::Malformed"),
        }
    }

    #[test]
    fn truncated_operand_display() {
        let err = Error::TruncatedOperand {
            offset: 0x14,
            needed: 2,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Truncated operand at offset 0x14: needed 2 bytes, 1 available"
        );
    }

    #[test]
    fn not_supported_shows_octal_magic() {
        assert_eq!(
            Error::NotSupported(0o777).to_string(),
            "This file type is not supported - magic 0o777"
        );
    }
}
