//! Fields that only exist on the wire starting at a given message version.
//!
//! Messages declare one [`VersionedField`] per gated field in a table and route every read and write of that field
//! through it, so the thresholds live in exactly one place.

use std::io::{Read, Write};

use crate::protocol::{
    api_version::ApiVersion,
    traits::{ReadError, ReadType, WriteError, WriteType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedField {
    /// Field name as used in the protocol description.
    pub name: &'static str,

    /// First message version that carries the field.
    pub added_in: ApiVersion,
}

impl VersionedField {
    pub const fn since(name: &'static str, version: i16) -> Self {
        Self {
            name,
            added_in: ApiVersion::new(version),
        }
    }

    pub fn is_present(&self, version: ApiVersion) -> bool {
        version >= self.added_in
    }

    /// Reads the field if `version` carries it.
    pub fn read<R, T>(&self, reader: &mut R, version: ApiVersion) -> Result<Option<T>, ReadError>
    where
        R: Read,
        T: ReadType<R>,
    {
        self.is_present(version).then(|| T::read(reader)).transpose()
    }

    /// Writes the field if `version` carries it.
    ///
    /// An unset value is written as `default`. A set value is silently dropped if `version` does not carry the
    /// field.
    pub fn write<W, T>(
        &self,
        writer: &mut W,
        version: ApiVersion,
        value: Option<&T>,
        default: T,
    ) -> Result<(), WriteError>
    where
        W: Write,
        T: WriteType<W>,
    {
        if !self.is_present(version) {
            return Ok(());
        }
        match value {
            Some(v) => v.write(writer),
            None => default.write(writer),
        }
    }
}
