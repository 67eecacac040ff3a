//! Error codes carried inside protocol messages.
//!
//! # References
//! - <https://kafka.apache.org/protocol#protocol_error_codes>

use std::fmt;

macro_rules! error_codes {
    ($($(#[$attr:meta])* $name:ident = $code:literal => $description:literal,)*) => {
        /// A non-zero error code.
        ///
        /// Code `0` means "no error" and is represented as `None` wherever an error field appears.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(test, derive(proptest_derive::Arbitrary))]
        pub enum Error {
            $($(#[$attr])* $name,)*
            Unknown(i16),
        }

        impl Error {
            pub fn new(code: i16) -> Option<Self> {
                match code {
                    0 => None,
                    $($code => Some(Self::$name),)*
                    other => Some(Self::Unknown(other)),
                }
            }

            pub fn code(&self) -> i16 {
                match self {
                    $(Self::$name => $code,)*
                    Self::Unknown(code) => *code,
                }
            }

            fn description(&self) -> &'static str {
                match self {
                    $(Self::$name => $description,)*
                    Self::Unknown(_) => "Unknown error code",
                }
            }
        }
    };
}

error_codes! {
    UnknownServerError = -1 => "The server experienced an unexpected error when processing the request",
    OffsetOutOfRange = 1 => "The requested offset is not within the range of offsets maintained by the server",
    CorruptMessage = 2 => "This message has failed its CRC checksum or is otherwise corrupt",
    UnknownTopicOrPartition = 3 => "This server does not host this topic-partition",
    InvalidFetchSize = 4 => "The requested fetch size is invalid",
    LeaderNotAvailable = 5 => "There is no leader for this topic-partition",
    NotLeaderOrFollower = 6 => "This server is not the leader or follower for that topic-partition",
    RequestTimedOut = 7 => "The request timed out",
    BrokerNotAvailable = 8 => "The broker is not available",
    ReplicaNotAvailable = 9 => "The replica is not available for the requested topic-partition",
    MessageTooLarge = 10 => "The request included a message larger than the max message size the server will accept",
    StaleControllerEpoch = 11 => "The controller moved to another broker",
    OffsetMetadataTooLarge = 12 => "The metadata field of the offset request was too large",
    NetworkException = 13 => "The server disconnected before a response was received",
    CoordinatorLoadInProgress = 14 => "The coordinator is loading and hence can't process requests",
    CoordinatorNotAvailable = 15 => "The coordinator is not available",
    NotCoordinator = 16 => "This is not the correct coordinator",
    InvalidTopicException = 17 => "The request attempted to perform an operation on an invalid topic",
    RecordListTooLarge = 18 => "The request included message batch larger than the configured segment size",
    NotEnoughReplicas = 19 => "Messages are rejected since there are fewer in-sync replicas than required",
    NotEnoughReplicasAfterAppend = 20 => "Messages are written to the log, but to fewer in-sync replicas than required",
    InvalidRequiredAcks = 21 => "Produce request specified an invalid value for required acks",
    IllegalGeneration = 22 => "Specified group generation id is not valid",
    InconsistentGroupProtocol = 23 => "The group member's supported protocols are incompatible with those of existing members",
    InvalidGroupId = 24 => "The configured groupId is invalid",
    UnknownMemberId = 25 => "The coordinator is not aware of this member",
    InvalidSessionTimeout = 26 => "The session timeout is not within the range allowed by the broker",
    RebalanceInProgress = 27 => "The group is rebalancing, so a rejoin is needed",
    InvalidCommitOffsetSize = 28 => "The committing offset data size is not valid",
    TopicAuthorizationFailed = 29 => "Topic authorization failed",
    GroupAuthorizationFailed = 30 => "Group authorization failed",
    ClusterAuthorizationFailed = 31 => "Cluster authorization failed",
    InvalidTimestamp = 32 => "The timestamp of the message is out of acceptable range",
    UnsupportedSaslMechanism = 33 => "The broker does not support the requested SASL mechanism",
    IllegalSaslState = 34 => "Request is not valid given the current SASL state",
    UnsupportedVersion = 35 => "The version of API is not supported",
    TopicAlreadyExists = 36 => "Topic with this name already exists",
    InvalidPartitions = 37 => "Number of partitions is below 1",
    InvalidReplicationFactor = 38 => "Replication factor is below 1 or larger than the number of available brokers",
    InvalidReplicaAssignment = 39 => "Replica assignment is invalid",
    InvalidConfig = 40 => "Configuration is invalid",
    NotController = 41 => "This is not the correct controller for this cluster",
    InvalidRequest = 42 => "This most likely occurs because of a request being malformed by the client library",
    UnsupportedForMessageFormat = 43 => "The message format version on the broker does not support the request",
    PolicyViolation = 44 => "Request parameters do not satisfy the configured policy",
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.code())
    }
}

impl std::error::Error for Error {}
