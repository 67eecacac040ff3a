use thiserror::Error;

use crate::protocol::{
    api_version::ApiVersion,
    messages::{ReadVersionedError, WriteVersionedError},
};

use super::collaborators::CacheError;

/// Failures that abort a whole metadata request.
///
/// Per-topic problems never end up here; they are reported as error codes inside the response.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported Metadata version: {version}")]
    UnsupportedVersion { version: ApiVersion },

    #[error("Cannot decode Metadata request: {0}")]
    Decode(#[from] ReadVersionedError),

    #[error("Cannot encode Metadata response: {0}")]
    Encode(#[from] WriteVersionedError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
