//! Low-level little-endian reading primitives.
//!
//! The PDP-11 stores 16-bit words low byte first, so every multi-byte value the decoder and
//! the a.out header parser touch goes through [`read_le_at`]. All reads are bounds checked
//! and report [`crate::Error::OutOfBounds`] instead of panicking.
//!
//! # Examples
//!
//! ```rust
//! use pdpscope::file::io::read_le_at;
//!
//! let data = [0o301, 0o025, 0o005, 0o000]; // mov $5, r1
//! let mut offset = 0;
//! let opcode: u16 = read_le_at(&data, &mut offset)?;
//! assert_eq!(opcode, 0o012701);
//! assert_eq!(offset, 2);
//! # Ok::<(), pdpscope::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for primitive types that can be decoded from little-endian bytes.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size byte
/// array required for that particular type (e.g. `[u8; 2]` for `u16`).
pub trait PdpIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_pdp_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl PdpIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_pdp_io! {
    u16 => 2,
    i16 => 2,
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing the
/// offset past the value on success.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes. The offset is left
/// untouched in that case.
pub fn read_le_at<T: PdpIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}
