#![no_main]
use std::io::Cursor;

use kafka_metadata::protocol::{
    api_version::ApiVersion,
    messages::{MetadataRequest, MetadataResponse, ReadVersionedType, WriteVersionedType},
    primitives::Int16,
    traits::ReadType,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    driver(data).ok();
});

type Error = Box<dyn std::error::Error>;

fn driver(data: &[u8]) -> Result<(), Error> {
    let mut cursor = Cursor::new(data);
    let version = ApiVersion(Int16::read(&mut cursor)?);
    let as_response = Int16::read(&mut cursor)?.0 % 2 == 1;

    if as_response {
        roundtrip::<MetadataResponse>(&mut cursor, version)
    } else {
        roundtrip::<MetadataRequest>(&mut cursor, version)
    }
}

/// Whatever decodes must encode again and decode to the same value.
fn roundtrip<T>(cursor: &mut Cursor<&[u8]>, version: ApiVersion) -> Result<(), Error>
where
    T: for<'a> ReadVersionedType<Cursor<&'a [u8]>>
        + WriteVersionedType<Vec<u8>>
        + PartialEq
        + std::fmt::Debug,
{
    let decoded = T::read_versioned(cursor, version)?;

    let mut buf = vec![];
    decoded.write_versioned(&mut buf, version)?;

    let restored = T::read_versioned(&mut Cursor::new(buf.as_slice()), version)?;
    assert_eq!(decoded, restored);

    Ok(())
}
