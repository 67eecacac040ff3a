//! Primitive types.
//!
//! Only the non-flexible encodings are implemented since Metadata versions 0 through 8 predate tagged fields.
//!
//! # References
//! - <https://kafka.apache.org/protocol#protocol_types>

use std::io::{Read, Write};

use super::traits::{ReadError, ReadType, WriteError, WriteType};

/// Upper bound for up-front allocations driven by length prefixes.
///
/// Lengths are read from untrusted input, so larger collections grow on demand instead.
const MAX_PREALLOC: usize = 1024;

/// Represents a boolean
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Boolean(pub bool);

impl<R> ReadType<R> for Boolean
where
    R: Read,
{
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        // any non-zero value is considered true
        Ok(Self(buf[0] != 0))
    }
}

impl<W> WriteType<W> for Boolean
where
    W: Write,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_all(&[u8::from(self.0)])?;
        Ok(())
    }
}

macro_rules! big_endian_int {
    ($(#[$attr:meta])* $name:ident, $inner:ty, $width:literal) => {
        $(#[$attr])*
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
        #[cfg_attr(test, derive(proptest_derive::Arbitrary))]
        pub struct $name(pub $inner);

        impl<R> ReadType<R> for $name
        where
            R: Read,
        {
            fn read(reader: &mut R) -> Result<Self, ReadError> {
                let mut buf = [0u8; $width];
                reader.read_exact(&mut buf)?;
                Ok(Self(<$inner>::from_be_bytes(buf)))
            }
        }

        impl<W> WriteType<W> for $name
        where
            W: Write,
        {
            fn write(&self, writer: &mut W) -> Result<(), WriteError> {
                writer.write_all(&self.0.to_be_bytes())?;
                Ok(())
            }
        }
    };
}

big_endian_int!(
    /// Represents an integer between `-2^15` and `2^15-1` inclusive.
    ///
    /// The values are encoded using two bytes in network byte order (big-endian).
    Int16,
    i16,
    2
);

big_endian_int!(
    /// Represents an integer between `-2^31` and `2^31-1` inclusive.
    ///
    /// The values are encoded using four bytes in network byte order (big-endian).
    Int32,
    i32,
    4
);

/// Reads `len` bytes and interprets them as UTF-8.
fn read_utf8<R: Read>(reader: &mut R, len: usize) -> Result<String, ReadError> {
    let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
    let read = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if read != len {
        return Err(ReadError::IO(std::io::ErrorKind::UnexpectedEof.into()));
    }
    String::from_utf8(buf).map_err(|e| ReadError::Malformed(Box::new(e)))
}

/// Represents a sequence of characters or null.
///
/// For non-null strings, first the length N is given as an INT16. Then N bytes follow which are the UTF-8 encoding of
/// the character sequence. A null value is encoded with length of -1 and there are no following bytes.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct NullableString(pub Option<String>);

impl<R> ReadType<R> for NullableString
where
    R: Read,
{
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let len = Int16::read(reader)?;
        match len.0 {
            l if l < -1 => Err(ReadError::Malformed(
                format!("Invalid negative length for nullable string: {}", l).into(),
            )),
            -1 => Ok(Self(None)),
            l => Ok(Self(Some(read_utf8(reader, l as usize)?))),
        }
    }
}

impl<W> WriteType<W> for NullableString
where
    W: Write,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        match &self.0 {
            Some(s) => {
                let l = i16::try_from(s.len())?;
                Int16(l).write(writer)?;
                writer.write_all(s.as_bytes())?;
                Ok(())
            }
            None => Int16(-1).write(writer),
        }
    }
}

/// Represents a sequence of characters.
///
/// First the length N is given as an INT16. Then N bytes follow which are the UTF-8 encoding of the character
/// sequence. Length must not be negative.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct String_(pub String);

impl<R> ReadType<R> for String_
where
    R: Read,
{
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let len = Int16::read(reader)?;
        let len = usize::try_from(len.0).map_err(|_| {
            ReadError::Malformed(format!("Invalid negative length for string: {}", len.0).into())
        })?;
        Ok(Self(read_utf8(reader, len)?))
    }
}

impl<W> WriteType<W> for String_
where
    W: Write,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        let len = i16::try_from(self.0.len())?;
        Int16(len).write(writer)?;
        writer.write_all(self.0.as_bytes())?;
        Ok(())
    }
}

/// Reads the INT32 length prefix of an array.
///
/// Returns `None` for the null sentinel `-1`.
pub(crate) fn read_array_len<R: Read>(reader: &mut R) -> Result<Option<usize>, ReadError> {
    let len = Int32::read(reader)?;
    match len.0 {
        -1 => Ok(None),
        l if l < -1 => Err(ReadError::Malformed(
            format!("Invalid negative length for array: {}", l).into(),
        )),
        l => Ok(Some(l as usize)),
    }
}

/// Creates a vector for `len` elements without trusting `len` for the allocation.
pub(crate) fn vec_for_len<T>(len: usize) -> Vec<T> {
    Vec::with_capacity(len.min(MAX_PREALLOC))
}

/// Represents a sequence of objects of a given type T.
///
/// Type T can be either a primitive type (e.g. STRING) or a structure. First, the length N is given as an INT32. Then
/// N instances of type T follow. A null array is represented with a length of -1. In protocol documentation an array
/// of T instances is referred to as `[T]`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Array<T>(pub Option<Vec<T>>);

impl<R, T> ReadType<R> for Array<T>
where
    R: Read,
    T: ReadType<R>,
{
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        match read_array_len(reader)? {
            None => Ok(Self(None)),
            Some(len) => {
                let mut res = vec_for_len(len);
                for _ in 0..len {
                    res.push(T::read(reader)?);
                }
                Ok(Self(Some(res)))
            }
        }
    }
}

impl<W, T> WriteType<W> for Array<T>
where
    W: Write,
    T: WriteType<W>,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        ArrayRef(self.0.as_deref()).write(writer)
    }
}

/// Arrays that must not be null. A `-1` length is rejected as malformed.
impl<R, T> ReadType<R> for Vec<T>
where
    R: Read,
    T: ReadType<R>,
{
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        Array::read(reader)?
            .0
            .ok_or_else(|| ReadError::Malformed("Invalid null array".into()))
    }
}

impl<W, T> WriteType<W> for Vec<T>
where
    W: Write,
    T: WriteType<W>,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        ArrayRef(Some(self.as_slice())).write(writer)
    }
}

/// Same as [`Array`] but contains referenced data.
///
/// This only supports writing.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArrayRef<'a, T>(pub Option<&'a [T]>);

impl<W, T> WriteType<W> for ArrayRef<'_, T>
where
    W: Write,
    T: WriteType<W>,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        match self.0 {
            None => Int32(-1).write(writer),
            Some(inner) => {
                let len = i32::try_from(inner.len())?;
                Int32(len).write(writer)?;

                for element in inner {
                    element.write(writer)?;
                }

                Ok(())
            }
        }
    }
}
