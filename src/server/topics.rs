//! Resolves the topics section of a metadata response.
//!
//! Topics that can be answered from the cache are resolved in request order. Topics that have to be auto-created are
//! created concurrently and their entries are appended afterwards, in the order they were requested. Clients rely on
//! nothing beyond that; in particular they must not assume the response mirrors the request order.

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::{
    model::{
        KAFKA_NAMESPACE, NodeId, TopicMetadata, TopicNamespace, is_materialized_topic, source_topic,
    },
    protocol::{
        api_version::ApiVersion,
        error::Error as ProtocolError,
        messages::{
            MetadataRequest, MetadataResponsePartition, MetadataResponseTopic, NO_LEADER,
        },
        primitives::{Boolean, Int32, String_},
    },
    validation::ExactlyOne,
};

use super::{
    acl::{AclOperation, Principal, Resource, authorized_operations, to_bit_field},
    collaborators::{Authorizer, MetadataCache, TopicConfiguration, TopicCreator, TopicErrc},
    config::MetadataConfig,
    error::Result,
};

/// Everything needed to answer the topics section of one request.
#[derive(Debug)]
pub(crate) struct TopicResolver<'a> {
    pub(crate) cache: &'a dyn MetadataCache,
    pub(crate) authorizer: &'a dyn Authorizer,
    pub(crate) topic_creator: &'a dyn TopicCreator,
    pub(crate) config: &'a MetadataConfig,
    pub(crate) principal: &'a Principal,
}

impl TopicResolver<'_> {
    pub(crate) async fn get_topic_metadata(
        &self,
        request: &MetadataRequest,
        version: ApiVersion,
    ) -> Result<Vec<MetadataResponseTopic>> {
        if request.list_all_topics(version) {
            return self.all_topics(request);
        }

        let mut topics = vec![];
        let mut creations = vec![];

        for name in request.topic_names() {
            let source = source_topic(name);

            if !self.topic_authorized(AclOperation::Describe, source) {
                debug!(topic = name, principal = %self.principal, "not authorized to describe topic");
                topics.push(MetadataResponseTopic::error_stub(
                    name,
                    ProtocolError::TopicAuthorizationFailed,
                ));
                continue;
            }

            if let Some(md) = self.cache.topic(KAFKA_NAMESPACE, source)? {
                topics.push(self.make_topic_response(request, md, Some(name)));
                continue;
            }

            if !self.config.auto_create_topics_enabled || !request.auto_create_allowed() {
                debug!(topic = name, "unknown topic and auto-creation disabled");
                topics.push(MetadataResponseTopic::error_stub(
                    name,
                    ProtocolError::UnknownTopicOrPartition,
                ));
                continue;
            }

            if !self.topic_authorized(AclOperation::Create, source) {
                debug!(topic = name, principal = %self.principal, "not authorized to create topic");
                topics.push(MetadataResponseTopic::error_stub(
                    name,
                    ProtocolError::TopicAuthorizationFailed,
                ));
                continue;
            }

            creations.push(self.create_topic(request, name));
        }

        if !creations.is_empty() {
            info!(n = creations.len(), "auto-creating topics");
            topics.extend(join_all(creations).await);
        }

        Ok(topics)
    }

    fn all_topics(&self, request: &MetadataRequest) -> Result<Vec<MetadataResponseTopic>> {
        let all = self.cache.all_topics(KAFKA_NAMESPACE)?;
        let total = all.len();

        let topics: Vec<_> = all
            .into_iter()
            .filter(|md| md.tp_ns.ns == KAFKA_NAMESPACE)
            .filter(|md| self.topic_authorized(AclOperation::Describe, &md.tp_ns.topic))
            .map(|md| self.make_topic_response(request, md, None))
            .collect();

        debug!(
            total,
            visible = topics.len(),
            principal = %self.principal,
            "listed all topics"
        );

        Ok(topics)
    }

    /// Auto-creates `name`, never failing the request.
    ///
    /// Anything that leaves the outcome unknown is reported as `RequestTimedOut`.
    async fn create_topic(&self, request: &MetadataRequest, name: &str) -> MetadataResponseTopic {
        let timeout = self.config.create_topic_timeout;
        let topic = TopicConfiguration {
            tp_ns: TopicNamespace::kafka(name),
            partition_count: self.config.default_topic_partitions,
            replication_factor: self.config.default_topic_replication,
        };
        let timed_out = || MetadataResponseTopic::error_stub(name, ProtocolError::RequestTimedOut);

        let results = match tokio::time::timeout(
            timeout,
            self.topic_creator.create_topics(vec![topic], timeout),
        )
        .await
        {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                warn!(topic = name, %e, "topic auto-creation failed");
                return timed_out();
            }
            Err(_) => {
                warn!(topic = name, ?timeout, "topic auto-creation timed out");
                return timed_out();
            }
        };

        let result = match results.exactly_one() {
            Ok(result) => result,
            Err(n) => {
                error!(
                    topic = name,
                    results = n,
                    "topic creator must report exactly one result per topic"
                );
                return timed_out();
            }
        };

        match result.errc {
            TopicErrc::Success | TopicErrc::TopicAlreadyExists => {}
            errc => {
                let error = errc
                    .to_protocol_error()
                    .unwrap_or(ProtocolError::UnknownServerError);
                debug!(topic = name, ?errc, "topic auto-creation rejected");
                return MetadataResponseTopic::error_stub(name, error);
            }
        }

        match self.cache.topic(&result.tp_ns.ns, &result.tp_ns.topic) {
            Ok(Some(md)) => {
                info!(topic = name, errc = ?result.errc, "auto-created topic");
                self.make_topic_response(request, md, Some(name))
            }
            Ok(None) => {
                warn!(topic = name, "topic reported as created but missing from cache");
                MetadataResponseTopic::error_stub(name, ProtocolError::InvalidTopicException)
            }
            Err(e) => {
                warn!(topic = name, %e, "cannot read back auto-created topic");
                timed_out()
            }
        }
    }

    /// Response entry for a cached topic.
    ///
    /// A materialized `requested` name is reported back as-is, even though the metadata belongs to its source.
    fn make_topic_response(
        &self,
        request: &MetadataRequest,
        md: TopicMetadata,
        requested: Option<&str>,
    ) -> MetadataResponseTopic {
        let ops = if request.wants_topic_authorized_operations() {
            let resource = Resource::Topic(md.tp_ns.topic.clone());
            to_bit_field(&authorized_operations(
                self.authorizer,
                self.principal,
                &resource,
            ))
        } else {
            0
        };

        let mut topic = topic_from_metadata(md);
        if let Some(requested) = requested
            && requested != topic.name.0
            && is_materialized_topic(requested)
        {
            topic.name = String_(requested.to_owned());
        }
        topic.topic_authorized_operations = Some(Int32(ops));
        topic
    }

    fn topic_authorized(&self, op: AclOperation, topic: &str) -> bool {
        self.authorizer
            .is_authorized(self.principal, op, &Resource::Topic(topic.to_owned()))
    }
}

/// Converts cached topic metadata into a successful response entry.
pub fn topic_from_metadata(md: TopicMetadata) -> MetadataResponseTopic {
    let node_ids = |nodes: &[NodeId]| nodes.iter().map(|n| Int32(n.0)).collect::<Vec<_>>();

    let partitions = md
        .partitions
        .iter()
        .map(|p| {
            let replicas = node_ids(&p.replicas);
            MetadataResponsePartition {
                error: None,
                partition_index: Int32(p.id),
                leader_id: p.leader_node.map_or(NO_LEADER, |n| Int32(n.0)),
                leader_epoch: Some(Int32(0)),
                isr_nodes: replicas.clone(),
                replica_nodes: replicas,
                offline_replicas: Some(vec![]),
            }
        })
        .collect();

    MetadataResponseTopic {
        error: None,
        name: String_(md.tp_ns.topic),
        is_internal: Some(Boolean(false)),
        partitions,
        topic_authorized_operations: Some(Int32(0)),
    }
}
