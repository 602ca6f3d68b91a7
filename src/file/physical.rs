//! Physical file backend for memory-mapped I/O.
//!
//! [`Physical`] maps an executable read-only into the address space instead of copying it,
//! so large images (or many of them analyzed in parallel) only page in what the decoder
//! actually touches.

use super::Backend;
use crate::{
    Error::{Error, FileError},
    Result,
};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A file backend that uses memory-mapped I/O for access to files on disk.
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Create a new physical file backend by memory-mapping the specified file.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or
    /// [`crate::Error::Error`] if memory mapping fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(FileError(error)),
        };

        // The mapping is read-only; concurrent truncation of the file by another process is
        // outside of what we can guard against.
        let mmap = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => mmap,
            Err(error) => return Err(Error(error.to_string())),
        };

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn physical_roundtrip() {
        let path = std::env::temp_dir().join(format!("pdpscope-physical-{}", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(&[0o007, 0o001, 0o004, 0o000]).unwrap();
        }

        let physical = Physical::new(&path).unwrap();
        assert_eq!(physical.len(), 4);
        assert_eq!(physical.data_slice(0, 2).unwrap(), &[0o007, 0o001]);
        assert!(physical.data_slice(3, 2).is_err());

        drop(physical);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn physical_missing_file() {
        let result = Physical::new("/nonexistent/pdpscope/a.out");
        assert!(matches!(result, Err(FileError(_))));
    }
}
