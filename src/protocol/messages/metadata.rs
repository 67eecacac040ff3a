use std::io::{Read, Write};

#[cfg(test)]
use proptest::prelude::*;

use super::{
    check_read_version, check_write_version, read_versioned_array, read_versioned_non_null_array,
    write_versioned_array,
    ReadVersionedError, ReadVersionedType, RequestBody, VersionedField, WriteVersionedError,
    WriteVersionedType,
};
use crate::protocol::{
    api_version::{ApiVersion, ApiVersionRange},
    error::Error as ProtocolError,
    primitives::*,
    traits::{ReadType, WriteType},
};

/// Node id used when a partition has no leader or the controller is unknown.
pub const NO_LEADER: Int32 = Int32(-1);

/// First version of every version-gated Metadata field.
pub mod gates {
    use super::VersionedField;

    pub const ALLOW_AUTO_TOPIC_CREATION: VersionedField =
        VersionedField::since("allow_auto_topic_creation", 4);
    pub const INCLUDE_CLUSTER_AUTHORIZED_OPERATIONS: VersionedField =
        VersionedField::since("include_cluster_authorized_operations", 8);
    pub const INCLUDE_TOPIC_AUTHORIZED_OPERATIONS: VersionedField =
        VersionedField::since("include_topic_authorized_operations", 8);

    pub const THROTTLE_TIME_MS: VersionedField = VersionedField::since("throttle_time_ms", 3);
    pub const BROKER_RACK: VersionedField = VersionedField::since("rack", 1);
    pub const CLUSTER_ID: VersionedField = VersionedField::since("cluster_id", 2);
    pub const CONTROLLER_ID: VersionedField = VersionedField::since("controller_id", 1);
    pub const TOPIC_IS_INTERNAL: VersionedField = VersionedField::since("is_internal", 1);
    pub const TOPIC_AUTHORIZED_OPERATIONS: VersionedField =
        VersionedField::since("topic_authorized_operations", 8);
    pub const PARTITION_LEADER_EPOCH: VersionedField = VersionedField::since("leader_epoch", 7);
    pub const PARTITION_OFFLINE_REPLICAS: VersionedField =
        VersionedField::since("offline_replicas", 5);
    pub const CLUSTER_AUTHORIZED_OPERATIONS: VersionedField =
        VersionedField::since("cluster_authorized_operations", 8);

    pub const REQUEST: &[VersionedField] = &[
        ALLOW_AUTO_TOPIC_CREATION,
        INCLUDE_CLUSTER_AUTHORIZED_OPERATIONS,
        INCLUDE_TOPIC_AUTHORIZED_OPERATIONS,
    ];

    pub const RESPONSE: &[VersionedField] = &[
        THROTTLE_TIME_MS,
        BROKER_RACK,
        CLUSTER_ID,
        CONTROLLER_ID,
        TOPIC_IS_INTERNAL,
        TOPIC_AUTHORIZED_OPERATIONS,
        PARTITION_LEADER_EPOCH,
        PARTITION_OFFLINE_REPLICAS,
        CLUSTER_AUTHORIZED_OPERATIONS,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct MetadataRequest {
    /// The topics to fetch metadata for.
    ///
    /// `None` is encoded as a null array, which is distinct from an empty one. See
    /// [`list_all_topics`](Self::list_all_topics) for what either means.
    #[cfg_attr(
        test,
        proptest(
            strategy = "prop::option::of(prop::collection::vec(any::<MetadataRequestTopic>(), 0..4))"
        )
    )]
    pub topics: Option<Vec<MetadataRequestTopic>>,

    /// If this is true, the broker may auto-create topics that we requested
    /// which do not already exist, if it is configured to do so.
    ///
    /// Added in version 4
    pub allow_auto_topic_creation: Option<Boolean>,

    /// Whether to include cluster authorized operations.
    ///
    /// Added in version 8
    pub include_cluster_authorized_operations: Option<Boolean>,

    /// Whether to include topic authorized operations.
    ///
    /// Added in version 8
    pub include_topic_authorized_operations: Option<Boolean>,
}

impl MetadataRequest {
    /// Whether the client asks for every topic rather than a named subset.
    ///
    /// Version 0 has no null array, so an empty list means "all topics" there. Starting with version 1 only a null
    /// list does, and an empty list asks for no topics at all.
    pub fn list_all_topics(&self, version: ApiVersion) -> bool {
        match &self.topics {
            None => true,
            Some(topics) => version < ApiVersion::new(1) && topics.is_empty(),
        }
    }

    /// Versions before 4 cannot express the flag and always allow auto-creation.
    pub fn auto_create_allowed(&self) -> bool {
        self.allow_auto_topic_creation.is_none_or(|b| b.0)
    }

    pub fn wants_cluster_authorized_operations(&self) -> bool {
        self.include_cluster_authorized_operations
            .is_some_and(|b| b.0)
    }

    pub fn wants_topic_authorized_operations(&self) -> bool {
        self.include_topic_authorized_operations.is_some_and(|b| b.0)
    }

    /// Requested topic names in request order.
    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics
            .iter()
            .flatten()
            .map(|topic| topic.name.0.as_str())
    }
}

impl RequestBody for MetadataRequest {
    const API_KEY: i16 = 3;

    /// Versions 0 through 8 share the non-flexible encoding.
    const API_VERSION_RANGE: ApiVersionRange =
        ApiVersionRange::new(ApiVersion::new(0), ApiVersion::new(8));
}

impl<R> ReadVersionedType<R> for MetadataRequest
where
    R: Read,
{
    fn read_versioned(reader: &mut R, version: ApiVersion) -> Result<Self, ReadVersionedError> {
        check_read_version(Self::API_VERSION_RANGE, version)?;

        let topics = read_versioned_array(reader, version)?;
        let allow_auto_topic_creation = gates::ALLOW_AUTO_TOPIC_CREATION.read(reader, version)?;
        let include_cluster_authorized_operations =
            gates::INCLUDE_CLUSTER_AUTHORIZED_OPERATIONS.read(reader, version)?;
        let include_topic_authorized_operations =
            gates::INCLUDE_TOPIC_AUTHORIZED_OPERATIONS.read(reader, version)?;

        Ok(Self {
            topics,
            allow_auto_topic_creation,
            include_cluster_authorized_operations,
            include_topic_authorized_operations,
        })
    }
}

impl<W> WriteVersionedType<W> for MetadataRequest
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        check_write_version(Self::API_VERSION_RANGE, version)?;

        write_versioned_array(writer, version, self.topics.as_deref())?;
        gates::ALLOW_AUTO_TOPIC_CREATION.write(
            writer,
            version,
            self.allow_auto_topic_creation.as_ref(),
            // The default behaviour is to allow topic creation
            Boolean(true),
        )?;
        gates::INCLUDE_CLUSTER_AUTHORIZED_OPERATIONS.write(
            writer,
            version,
            self.include_cluster_authorized_operations.as_ref(),
            Boolean(false),
        )?;
        gates::INCLUDE_TOPIC_AUTHORIZED_OPERATIONS.write(
            writer,
            version,
            self.include_topic_authorized_operations.as_ref(),
            Boolean(false),
        )?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct MetadataRequestTopic {
    /// The topic name
    pub name: String_,
}

impl<R> ReadVersionedType<R> for MetadataRequestTopic
where
    R: Read,
{
    fn read_versioned(reader: &mut R, _version: ApiVersion) -> Result<Self, ReadVersionedError> {
        Ok(Self {
            name: String_::read(reader)?,
        })
    }
}

impl<W> WriteVersionedType<W> for MetadataRequestTopic
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        _version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        Ok(self.name.write(writer)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct MetadataResponse {
    /// The duration in milliseconds for which the request was throttled due to
    /// a quota violation, or zero if the request did not violate any quota.
    ///
    /// Added in version 3
    pub throttle_time_ms: Option<Int32>,

    /// Each broker in the response
    #[cfg_attr(
        test,
        proptest(strategy = "prop::collection::vec(any::<MetadataResponseBroker>(), 0..4)")
    )]
    pub brokers: Vec<MetadataResponseBroker>,

    /// The cluster ID that responding broker belongs to.
    ///
    /// Added in version 2
    pub cluster_id: Option<NullableString>,

    /// The ID of the controller broker.
    ///
    /// Added in version 1
    pub controller_id: Option<Int32>,

    /// Each topic in the response
    #[cfg_attr(
        test,
        proptest(strategy = "prop::collection::vec(any::<MetadataResponseTopic>(), 0..4)")
    )]
    pub topics: Vec<MetadataResponseTopic>,

    /// 32-bit bitfield to represent authorized operations for this cluster.
    ///
    /// Added in version 8
    pub cluster_authorized_operations: Option<Int32>,
}

impl<R> ReadVersionedType<R> for MetadataResponse
where
    R: Read,
{
    fn read_versioned(reader: &mut R, version: ApiVersion) -> Result<Self, ReadVersionedError> {
        check_read_version(MetadataRequest::API_VERSION_RANGE, version)?;

        let throttle_time_ms = gates::THROTTLE_TIME_MS.read(reader, version)?;
        let brokers = read_versioned_non_null_array(reader, version)?;
        let cluster_id = gates::CLUSTER_ID.read(reader, version)?;
        let controller_id = gates::CONTROLLER_ID.read(reader, version)?;
        let topics = read_versioned_non_null_array(reader, version)?;
        let cluster_authorized_operations =
            gates::CLUSTER_AUTHORIZED_OPERATIONS.read(reader, version)?;

        Ok(Self {
            throttle_time_ms,
            brokers,
            cluster_id,
            controller_id,
            topics,
            cluster_authorized_operations,
        })
    }
}

impl<W> WriteVersionedType<W> for MetadataResponse
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        check_write_version(MetadataRequest::API_VERSION_RANGE, version)?;

        gates::THROTTLE_TIME_MS.write(writer, version, self.throttle_time_ms.as_ref(), Int32(0))?;
        write_versioned_array(writer, version, Some(&self.brokers))?;
        gates::CLUSTER_ID.write(
            writer,
            version,
            self.cluster_id.as_ref(),
            NullableString(None),
        )?;
        gates::CONTROLLER_ID.write(writer, version, self.controller_id.as_ref(), NO_LEADER)?;
        write_versioned_array(writer, version, Some(&self.topics))?;
        gates::CLUSTER_AUTHORIZED_OPERATIONS.write(
            writer,
            version,
            self.cluster_authorized_operations.as_ref(),
            Int32(0),
        )?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct MetadataResponseBroker {
    /// The broker ID
    pub node_id: Int32,
    /// The broker hostname
    pub host: String_,
    /// The broker port
    pub port: Int32,
    /// Added in version 1
    pub rack: Option<NullableString>,
}

impl<R> ReadVersionedType<R> for MetadataResponseBroker
where
    R: Read,
{
    fn read_versioned(reader: &mut R, version: ApiVersion) -> Result<Self, ReadVersionedError> {
        let node_id = Int32::read(reader)?;
        let host = String_::read(reader)?;
        let port = Int32::read(reader)?;
        let rack = gates::BROKER_RACK.read(reader, version)?;

        Ok(Self {
            node_id,
            host,
            port,
            rack,
        })
    }
}

impl<W> WriteVersionedType<W> for MetadataResponseBroker
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        self.node_id.write(writer)?;
        self.host.write(writer)?;
        self.port.write(writer)?;
        gates::BROKER_RACK.write(writer, version, self.rack.as_ref(), NullableString(None))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct MetadataResponseTopic {
    /// The topic error if any
    pub error: Option<ProtocolError>,
    /// The topic name
    pub name: String_,
    /// True if the topic is internal
    ///
    /// Added in version 1
    pub is_internal: Option<Boolean>,
    /// Each partition in the topic
    #[cfg_attr(
        test,
        proptest(strategy = "prop::collection::vec(any::<MetadataResponsePartition>(), 0..4)")
    )]
    pub partitions: Vec<MetadataResponsePartition>,
    /// 32-bit bitfield to represent authorized operations for this topic.
    ///
    /// Added in version 8
    pub topic_authorized_operations: Option<Int32>,
}

impl MetadataResponseTopic {
    /// Entry that only reports `error` for `name`.
    pub fn error_stub(name: impl Into<String>, error: ProtocolError) -> Self {
        Self {
            error: Some(error),
            name: String_(name.into()),
            is_internal: Some(Boolean(false)),
            partitions: vec![],
            topic_authorized_operations: Some(Int32(0)),
        }
    }
}

impl<R> ReadVersionedType<R> for MetadataResponseTopic
where
    R: Read,
{
    fn read_versioned(reader: &mut R, version: ApiVersion) -> Result<Self, ReadVersionedError> {
        let error = ProtocolError::new(Int16::read(reader)?.0);
        let name = String_::read(reader)?;
        let is_internal = gates::TOPIC_IS_INTERNAL.read(reader, version)?;
        let partitions = read_versioned_non_null_array(reader, version)?;
        let topic_authorized_operations =
            gates::TOPIC_AUTHORIZED_OPERATIONS.read(reader, version)?;

        Ok(Self {
            error,
            name,
            is_internal,
            partitions,
            topic_authorized_operations,
        })
    }
}

impl<W> WriteVersionedType<W> for MetadataResponseTopic
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        Int16(self.error.map_or(0, |e| e.code())).write(writer)?;
        self.name.write(writer)?;
        gates::TOPIC_IS_INTERNAL.write(writer, version, self.is_internal.as_ref(), Boolean(false))?;
        write_versioned_array(writer, version, Some(&self.partitions))?;
        gates::TOPIC_AUTHORIZED_OPERATIONS.write(
            writer,
            version,
            self.topic_authorized_operations.as_ref(),
            Int32(0),
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct MetadataResponsePartition {
    /// The partition error if any
    pub error: Option<ProtocolError>,
    /// The partition index
    pub partition_index: Int32,
    /// The ID of the leader broker, [`NO_LEADER`] if there is none
    pub leader_id: Int32,
    /// The leader epoch of this partition.
    ///
    /// Added in version 7
    pub leader_epoch: Option<Int32>,
    /// The set of all nodes that host this partition
    #[cfg_attr(test, proptest(strategy = "prop::collection::vec(any::<Int32>(), 0..4)"))]
    pub replica_nodes: Vec<Int32>,
    /// The set of all nodes that are in sync with the leader for this partition
    #[cfg_attr(test, proptest(strategy = "prop::collection::vec(any::<Int32>(), 0..4)"))]
    pub isr_nodes: Vec<Int32>,
    /// The set of offline replicas of this partition.
    ///
    /// Added in version 5
    #[cfg_attr(
        test,
        proptest(strategy = "prop::option::of(prop::collection::vec(any::<Int32>(), 0..4))")
    )]
    pub offline_replicas: Option<Vec<Int32>>,
}

impl<R> ReadVersionedType<R> for MetadataResponsePartition
where
    R: Read,
{
    fn read_versioned(reader: &mut R, version: ApiVersion) -> Result<Self, ReadVersionedError> {
        Ok(Self {
            error: ProtocolError::new(Int16::read(reader)?.0),
            partition_index: Int32::read(reader)?,
            leader_id: Int32::read(reader)?,
            leader_epoch: gates::PARTITION_LEADER_EPOCH.read(reader, version)?,
            replica_nodes: Vec::read(reader)?,
            isr_nodes: Vec::read(reader)?,
            offline_replicas: gates::PARTITION_OFFLINE_REPLICAS.read(reader, version)?,
        })
    }
}

impl<W> WriteVersionedType<W> for MetadataResponsePartition
where
    W: Write,
{
    fn write_versioned(
        &self,
        writer: &mut W,
        version: ApiVersion,
    ) -> Result<(), WriteVersionedError> {
        Int16(self.error.map_or(0, |e| e.code())).write(writer)?;
        self.partition_index.write(writer)?;
        self.leader_id.write(writer)?;
        gates::PARTITION_LEADER_EPOCH.write(
            writer,
            version,
            self.leader_epoch.as_ref(),
            Int32(0),
        )?;
        self.replica_nodes.write(writer)?;
        self.isr_nodes.write(writer)?;
        gates::PARTITION_OFFLINE_REPLICAS.write(
            writer,
            version,
            self.offline_replicas.as_ref(),
            vec![],
        )?;
        Ok(())
    }
}
