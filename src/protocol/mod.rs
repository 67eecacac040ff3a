//! The Apache Kafka protocol, as far as the Metadata API needs it.
//!
//! # References
//! - <https://kafka.apache.org/protocol>
//! - <https://github.com/apache/kafka/blob/trunk/clients/src/main/resources/common/message/MetadataRequest.json>
//! - <https://github.com/apache/kafka/blob/trunk/clients/src/main/resources/common/message/MetadataResponse.json>
pub mod api_version;
pub mod error;
pub mod messages;
pub mod primitives;
#[cfg(test)]
pub mod test_utils;
pub mod traits;
