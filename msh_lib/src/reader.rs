//! Sequential reading of fixed width values from an in memory buffer.
//!
//! Every read names the field being read so truncated or corrupt files
//! report the field and byte offset where reading stopped.
use binrw::{io::Cursor, BinRead, Endian};

use crate::DecodeError;

/// Types with a constant size in bytes on disk.
pub trait FixedSize {
    const SIZE_IN_BYTES: u64;
}

macro_rules! fixed_size_impl {
    ($($id:ident),*) => {
        $(
            impl FixedSize for $id {
                const SIZE_IN_BYTES: u64 = std::mem::size_of::<$id>() as u64;
            }
        )*
    }
}

fixed_size_impl!(u16, i32, f32);

impl<T: FixedSize, const N: usize> FixedSize for [T; N] {
    const SIZE_IN_BYTES: u64 = T::SIZE_IN_BYTES * N as u64;
}

/// A little endian reader over a byte buffer that checks bounds before each read.
pub struct MshReader<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> MshReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(bytes),
        }
    }

    /// The offset in bytes from the start of the buffer.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> u64 {
        (self.inner.get_ref().len() as u64).saturating_sub(self.inner.position())
    }

    /// Returns an error naming `field` if fewer than `len` bytes remain.
    pub fn ensure_remaining(&self, field: &'static str, len: u64) -> Result<(), DecodeError> {
        if len > self.remaining() {
            Err(DecodeError::UnexpectedEof {
                field,
                offset: self.position(),
            })
        } else {
            Ok(())
        }
    }

    /// Reads a single value of type `T`.
    pub fn read<T>(&mut self, field: &'static str) -> Result<T, DecodeError>
    where
        T: BinRead + FixedSize,
        for<'b> T::Args<'b>: Default,
    {
        let offset = self.position();
        self.ensure_remaining(field, T::SIZE_IN_BYTES)?;
        T::read_options(&mut self.inner, Endian::Little, Default::default()).map_err(|e| {
            if e.is_eof() {
                DecodeError::UnexpectedEof { field, offset }
            } else {
                DecodeError::BinRead(e)
            }
        })
    }

    /// Reads a signed count and rejects negative values.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        let offset = self.position();
        let count = self.read::<i32>(field)?;
        usize::try_from(count).map_err(|_| DecodeError::InvalidCount {
            field,
            offset,
            count,
        })
    }

    /// Reads `count` consecutive values of type `T`.
    /// The buffer must contain all the elements before anything is allocated.
    pub fn read_array<T>(&mut self, field: &'static str, count: usize) -> Result<Vec<T>, DecodeError>
    where
        T: BinRead + FixedSize,
        for<'b> T::Args<'b>: Default,
    {
        let len = (count as u64).saturating_mul(T::SIZE_IN_BYTES);
        self.ensure_remaining(field, len)?;

        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(self.read(field)?);
        }
        Ok(elements)
    }

    /// Reads `len` bytes without interpreting them.
    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure_remaining(field, len as u64)?;

        let bytes: &'a [u8] = *self.inner.get_ref();
        let start = self.inner.position() as usize;
        let end = start + len;
        self.inner.set_position(end as u64);
        Ok(&bytes[start..end])
    }

    /// Reads a string stored in a `len` byte slot.
    /// Trailing null bytes are removed, so any text after an embedded null is preserved.
    pub fn read_fixed_string(&mut self, field: &'static str, len: usize) -> Result<String, DecodeError> {
        let offset = self.position();
        let bytes = self.read_bytes(field, len)?;

        let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        std::str::from_utf8(&bytes[..end])
            .map(str::to_string)
            .map_err(|source| DecodeError::Encoding {
                field,
                offset,
                source,
            })
    }
}
