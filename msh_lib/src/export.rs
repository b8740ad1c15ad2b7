use std::io::Write;

use crate::EncodeError;

/// A trait for writing the little endian byte representation of types in MSH files.
pub trait MshWrite {
    /// Writes the byte representation of `self` to `writer`.
    fn msh_write<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

macro_rules! msh_write_impl {
    ($($id:ident),*) => {
        $(
            impl MshWrite for $id {
                fn msh_write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
                    writer.write_all(&self.to_le_bytes())
                }
            }
        )*
    }
}

msh_write_impl!(u16, i32, f32);

impl<T: MshWrite, const N: usize> MshWrite for [T; N] {
    fn msh_write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for element in self {
            element.msh_write(writer)?;
        }
        Ok(())
    }
}

impl<T: MshWrite> MshWrite for [T] {
    fn msh_write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for element in self {
            element.msh_write(writer)?;
        }
        Ok(())
    }
}

impl<T: MshWrite> MshWrite for Vec<T> {
    fn msh_write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.as_slice().msh_write(writer)
    }
}

/// Checks that `value` fits in a `len` byte slot.
pub(crate) fn check_fixed_string(
    field: &'static str,
    value: &str,
    len: usize,
) -> Result<(), EncodeError> {
    if value.len() > len {
        Err(EncodeError::FieldTooLong {
            field,
            len: value.len(),
            max: len,
        })
    } else {
        Ok(())
    }
}

/// Writes the UTF-8 bytes of `value` padded with nulls to exactly `len` bytes.
/// A string filling the entire slot is written without a null terminator.
pub fn write_fixed_string<W: Write>(
    writer: &mut W,
    field: &'static str,
    value: &str,
    len: usize,
) -> Result<(), EncodeError> {
    check_fixed_string(field, value, len)?;
    writer.write_all(value.as_bytes())?;
    write_padding(writer, len - value.len())?;
    Ok(())
}

pub(crate) fn write_padding<W: Write>(writer: &mut W, len: usize) -> std::io::Result<()> {
    const ZEROS: [u8; 256] = [0u8; 256];
    let mut remaining = len;
    while remaining > 0 {
        let n = remaining.min(ZEROS.len());
        writer.write_all(&ZEROS[..n])?;
        remaining -= n;
    }
    Ok(())
}

/// Converts a collection length to the signed 32 bit count stored in the file.
pub(crate) fn count_i32(field: &'static str, count: usize) -> Result<i32, EncodeError> {
    i32::try_from(count).map_err(|_| EncodeError::CountOverflow { field, count })
}

/// Checks that an opaque region has the size required by the layout.
pub(crate) fn check_region_size(
    field: &'static str,
    bytes: &[u8],
    expected: usize,
) -> Result<(), EncodeError> {
    if bytes.len() != expected {
        Err(EncodeError::HeaderSizeMismatch {
            field,
            expected,
            actual: bytes.len(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::hex_bytes;

    use super::*;

    #[test]
    fn write_primitives() {
        let mut writer = Vec::new();
        1i32.msh_write(&mut writer).unwrap();
        0xFFFFu16.msh_write(&mut writer).unwrap();
        1.0f32.msh_write(&mut writer).unwrap();
        assert_eq!(hex_bytes("01000000 FFFF 0000803F"), writer);
    }

    #[test]
    fn write_u16_array() {
        let mut writer = Vec::new();
        [1u16, 2, 3, 4].msh_write(&mut writer).unwrap();
        assert_eq!(hex_bytes("0100 0200 0300 0400"), writer);
    }

    #[test]
    fn write_vec() {
        let mut writer = Vec::new();
        vec![[1u16, 2], [3, 4]].msh_write(&mut writer).unwrap();
        assert_eq!(hex_bytes("0100 0200 0300 0400"), writer);
    }

    #[test]
    fn write_fixed_string_padded() {
        let mut writer = Vec::new();
        write_fixed_string(&mut writer, "name", "abc", 8).unwrap();
        assert_eq!(hex_bytes("61626300 00000000"), writer);
    }

    #[test]
    fn write_fixed_string_full_slot() {
        let mut writer = Vec::new();
        write_fixed_string(&mut writer, "name", "abcd", 4).unwrap();
        assert_eq!(hex_bytes("61626364"), writer);
    }

    #[test]
    fn write_fixed_string_multibyte() {
        // "é" is 2 bytes in UTF-8.
        let mut writer = Vec::new();
        write_fixed_string(&mut writer, "name", "é", 4).unwrap();
        assert_eq!(hex_bytes("C3A90000"), writer);
    }

    #[test]
    fn write_fixed_string_too_long() {
        let mut writer = Vec::new();
        let result = write_fixed_string(&mut writer, "bone_name", "abcde", 4);
        assert!(matches!(
            result,
            Err(EncodeError::FieldTooLong {
                field: "bone_name",
                len: 5,
                max: 4
            })
        ));
        assert!(writer.is_empty());
    }

    #[test]
    fn write_padding_larger_than_buffer() {
        let mut writer = Vec::new();
        write_padding(&mut writer, 720).unwrap();
        assert_eq!(vec![0u8; 720], writer);
    }

    #[test]
    fn count_overflow() {
        assert_eq!(3, count_i32("meshes", 3).unwrap());
        assert!(matches!(
            count_i32("meshes", i32::MAX as usize + 1),
            Err(EncodeError::CountOverflow { field: "meshes", .. })
        ));
    }
}
