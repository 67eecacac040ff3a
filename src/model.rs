//! Cluster state as seen through the metadata cache.
//!
//! These types are read-only snapshots handed out by a [`MetadataCache`](crate::server::MetadataCache); the
//! metadata handler never mutates them.

use std::fmt;

/// Namespace that Kafka clients are served from.
pub const KAFKA_NAMESPACE: &str = "kafka";

/// Identifies a broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub i32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A topic name qualified by its namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicNamespace {
    pub ns: String,
    pub topic: String,
}

impl TopicNamespace {
    pub fn new(ns: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            ns: ns.into(),
            topic: topic.into(),
        }
    }

    /// `topic` within [`KAFKA_NAMESPACE`].
    pub fn kafka(topic: impl Into<String>) -> Self {
        Self::new(KAFKA_NAMESPACE, topic)
    }
}

impl fmt::Display for TopicNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ns, self.topic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionMetadata {
    pub id: i32,

    /// `None` while no leader is elected.
    pub leader_node: Option<NodeId>,

    /// Replica set, preferred replica first.
    pub replicas: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMetadata {
    pub tp_ns: TopicNamespace,

    /// Ordered by partition id.
    pub partitions: Vec<PartitionMetadata>,
}

/// An address a broker advertises to clients on one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisedListener {
    /// Listener name, e.g. `internal` or `external`.
    pub name: String,
    pub host: String,
    pub port: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broker {
    pub id: NodeId,
    pub rack: Option<String>,
    pub advertised_listeners: Vec<AdvertisedListener>,
}

impl Broker {
    /// Address advertised on the listener called `name`, if any.
    pub fn listener(&self, name: &str) -> Option<&AdvertisedListener> {
        self.advertised_listeners.iter().find(|l| l.name == name)
    }
}

/// Builds the name of the materialized topic `view` derived from `source`.
pub fn make_materialized_topic(source: &str, view: &str) -> String {
    format!("{source}.${view}$")
}

/// Splits a materialized topic name `<source>.$<view>$` into its parts.
fn split_materialized(topic: &str) -> Option<(&str, &str)> {
    let inner = topic.strip_suffix('$')?;
    let (source, view) = inner.rsplit_once(".$")?;
    (!source.is_empty() && !view.is_empty() && !view.contains('$')).then_some((source, view))
}

pub fn is_materialized_topic(topic: &str) -> bool {
    split_materialized(topic).is_some()
}

/// The topic that `topic` is resolved and authorized against.
///
/// This is `topic` itself unless it is a materialized topic.
pub fn source_topic(topic: &str) -> &str {
    split_materialized(topic).map_or(topic, |(source, _)| source)
}
