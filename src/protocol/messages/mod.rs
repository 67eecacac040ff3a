//! Individual API messages.
//!
//! # References
//! - <https://kafka.apache.org/protocol#protocol_messages>

use std::io::{Read, Write};

use thiserror::Error;

use super::{
    api_version::{ApiVersion, ApiVersionRange},
    primitives::{read_array_len, vec_for_len, Int32},
    traits::{ReadError, WriteError, WriteType},
};

mod fields;
pub use fields::*;
mod metadata;
pub use metadata::*;
#[cfg(test)]
mod test_utils;

#[derive(Error, Debug)]
pub enum ReadVersionedError {
    #[error("Invalid version: {version}")]
    InvalidVersion { version: ApiVersion },

    #[error(transparent)]
    ReadError(#[from] ReadError),
}

pub trait ReadVersionedType<R>: Sized
where
    R: Read,
{
    fn read_versioned(reader: &mut R, version: ApiVersion) -> Result<Self, ReadVersionedError>;
}

#[derive(Error, Debug)]
pub enum WriteVersionedError {
    #[error("Invalid version: {version}")]
    InvalidVersion { version: ApiVersion },

    #[error(transparent)]
    WriteError(#[from] WriteError),
}

pub trait WriteVersionedType<W>: Sized
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError>;
}

impl<W: Write, T: WriteVersionedType<W>> WriteVersionedType<W> for &T {
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        T::write_versioned(self, writer, version)
    }
}

/// Specifies a request body.
pub trait RequestBody {
    /// Kafka API key.
    const API_KEY: i16;

    /// Supported version range.
    ///
    /// The same range applies to the response body.
    const API_VERSION_RANGE: ApiVersionRange;
}

/// Fails with [`ReadVersionedError::InvalidVersion`] if `version` is outside `range`.
fn check_read_version(range: ApiVersionRange, version: ApiVersion) -> Result<(), ReadVersionedError> {
    if range.contains(version) {
        Ok(())
    } else {
        Err(ReadVersionedError::InvalidVersion { version })
    }
}

/// Fails with [`WriteVersionedError::InvalidVersion`] if `version` is outside `range`.
fn check_write_version(
    range: ApiVersionRange,
    version: ApiVersion,
) -> Result<(), WriteVersionedError> {
    if range.contains(version) {
        Ok(())
    } else {
        Err(WriteVersionedError::InvalidVersion { version })
    }
}

fn read_versioned_array<R: Read, T: ReadVersionedType<R>>(
    reader: &mut R,
    version: ApiVersion,
) -> Result<Option<Vec<T>>, ReadVersionedError> {
    match read_array_len(reader)? {
        None => Ok(None),
        Some(len) => {
            let mut res = vec_for_len(len);
            for _ in 0..len {
                res.push(T::read_versioned(reader, version)?);
            }
            Ok(Some(res))
        }
    }
}

/// Same as [`read_versioned_array`] for arrays that must not be null.
fn read_versioned_non_null_array<R: Read, T: ReadVersionedType<R>>(
    reader: &mut R,
    version: ApiVersion,
) -> Result<Vec<T>, ReadVersionedError> {
    read_versioned_array(reader, version)?
        .ok_or_else(|| ReadError::Malformed("Invalid null array".into()).into())
}

fn write_versioned_array<W: Write, T: WriteVersionedType<W>>(
    writer: &mut W,
    version: ApiVersion,
    data: Option<&[T]>,
) -> Result<(), WriteVersionedError> {
    match data {
        None => Ok(Int32(-1).write(writer)?),
        Some(inner) => {
            let len = i32::try_from(inner.len()).map_err(WriteError::from)?;
            Int32(len).write(writer)?;

            for element in inner {
                element.write_versioned(writer, version)?
            }

            Ok(())
        }
    }
}
