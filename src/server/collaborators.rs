//! Services the metadata handler consumes but does not implement.
//!
//! Implementations are owned by the broker and shared with the handler as `Arc<dyn ...>` handles. The handler only
//! reads through them, except for topic creation which it merely requests.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    model::{Broker, NodeId, TopicMetadata, TopicNamespace},
    protocol::error::Error as ProtocolError,
};

use super::acl::{AclOperation, Principal, Resource};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Metadata cache unavailable: {0}")]
    Unavailable(String),
}

/// Point-in-time view of the cluster.
///
/// Every call returns a consistent snapshot; fields of one topic are never torn.
pub trait MetadataCache: Debug + Send + Sync {
    fn all_topics(&self, ns: &str) -> Result<Vec<TopicMetadata>, CacheError>;

    fn topic(&self, ns: &str, topic: &str) -> Result<Option<TopicMetadata>, CacheError>;

    fn all_brokers(&self) -> Result<Vec<Arc<Broker>>, CacheError>;

    /// Current controller, if one is known.
    fn controller_id(&self) -> Result<Option<NodeId>, CacheError>;
}

pub trait Authorizer: Debug + Send + Sync {
    fn is_authorized(
        &self,
        principal: &Principal,
        operation: AclOperation,
        resource: &Resource,
    ) -> bool;
}

/// Topic to be created with broker defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicConfiguration {
    pub tp_ns: TopicNamespace,
    pub partition_count: i32,
    pub replication_factor: i16,
}

/// Outcome of creating one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicErrc {
    Success,
    TopicAlreadyExists,
    InvalidPartitions,
    InvalidReplicationFactor,
    InvalidConfig,
    InvalidTopicName,
    NotLeaderController,
    Timeout,
    Unknown,
}

impl TopicErrc {
    /// Protocol error reported to clients, `None` on success.
    pub fn to_protocol_error(self) -> Option<ProtocolError> {
        match self {
            Self::Success => None,
            Self::TopicAlreadyExists => Some(ProtocolError::TopicAlreadyExists),
            Self::InvalidPartitions => Some(ProtocolError::InvalidPartitions),
            Self::InvalidReplicationFactor => Some(ProtocolError::InvalidReplicationFactor),
            Self::InvalidConfig => Some(ProtocolError::InvalidConfig),
            Self::InvalidTopicName => Some(ProtocolError::InvalidTopicException),
            Self::NotLeaderController => Some(ProtocolError::NotController),
            Self::Timeout => Some(ProtocolError::RequestTimedOut),
            Self::Unknown => Some(ProtocolError::UnknownServerError),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicResult {
    pub tp_ns: TopicNamespace,
    pub errc: TopicErrc,
}

#[derive(Error, Debug)]
pub enum CreateTopicsError {
    #[error("Topic creation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Topic creation failed: {0}")]
    Transport(String),
}

/// Front end of the controller's topic creation.
#[async_trait]
pub trait TopicCreator: Debug + Send + Sync {
    /// Creates `topics`, returning one result per topic in submission order.
    ///
    /// `timeout` is forwarded to the controller; callers still bound the returned future themselves.
    async fn create_topics(
        &self,
        topics: Vec<TopicConfiguration>,
        timeout: Duration,
    ) -> Result<Vec<TopicResult>, CreateTopicsError>;
}
