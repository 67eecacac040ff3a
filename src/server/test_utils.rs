//! In-memory collaborators for handler tests.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::model::{
    AdvertisedListener, Broker, NodeId, PartitionMetadata, TopicMetadata, TopicNamespace,
    KAFKA_NAMESPACE,
};

use super::{
    acl::{AclOperation, Principal, Resource},
    collaborators::{
        Authorizer, CacheError, CreateTopicsError, MetadataCache, TopicConfiguration, TopicCreator,
        TopicErrc, TopicResult,
    },
};

pub(crate) fn topic_metadata(ns: &str, name: &str, partitions: i32) -> TopicMetadata {
    TopicMetadata {
        tp_ns: TopicNamespace::new(ns, name),
        partitions: (0..partitions)
            .map(|id| PartitionMetadata {
                id,
                leader_node: Some(NodeId(1)),
                replicas: vec![NodeId(1), NodeId(2)],
            })
            .collect(),
    }
}

pub(crate) fn broker(id: i32, listeners: &[(&str, &str, i32)]) -> Arc<Broker> {
    Arc::new(Broker {
        id: NodeId(id),
        rack: Some(format!("rack-{id}")),
        advertised_listeners: listeners
            .iter()
            .map(|(name, host, port)| AdvertisedListener {
                name: (*name).to_owned(),
                host: (*host).to_owned(),
                port: *port,
            })
            .collect(),
    })
}

#[derive(Debug, Default)]
pub(crate) struct FakeCache {
    pub(crate) topics: Mutex<Vec<TopicMetadata>>,
    pub(crate) brokers: Vec<Arc<Broker>>,
    pub(crate) controller: Option<NodeId>,
    pub(crate) unavailable: bool,
}

impl FakeCache {
    pub(crate) fn with_topics(names: &[&str]) -> Self {
        let cache = Self::default();
        for name in names {
            cache.insert(topic_metadata(KAFKA_NAMESPACE, name, 1));
        }
        cache
    }

    pub(crate) fn insert(&self, md: TopicMetadata) {
        self.topics.lock().push(md);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.unavailable {
            Err(CacheError::Unavailable("fake cache is down".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl MetadataCache for FakeCache {
    /// Returns topics of every namespace.
    fn all_topics(&self, _ns: &str) -> Result<Vec<TopicMetadata>, CacheError> {
        self.check()?;
        Ok(self.topics.lock().clone())
    }

    fn topic(&self, ns: &str, topic: &str) -> Result<Option<TopicMetadata>, CacheError> {
        self.check()?;
        Ok(self
            .topics
            .lock()
            .iter()
            .find(|md| md.tp_ns.ns == ns && md.tp_ns.topic == topic)
            .cloned())
    }

    fn all_brokers(&self) -> Result<Vec<Arc<Broker>>, CacheError> {
        self.check()?;
        Ok(self.brokers.clone())
    }

    fn controller_id(&self) -> Result<Option<NodeId>, CacheError> {
        self.check()?;
        Ok(self.controller)
    }
}

/// Allows everything that was not explicitly denied.
#[derive(Debug, Default)]
pub(crate) struct FakeAuthorizer {
    denied: Mutex<Vec<(AclOperation, Resource)>>,
}

impl FakeAuthorizer {
    pub(crate) fn deny(&self, op: AclOperation, resource: Resource) {
        self.denied.lock().push((op, resource));
    }

    pub(crate) fn deny_topic(&self, op: AclOperation, topic: &str) {
        self.deny(op, Resource::Topic(topic.to_owned()));
    }
}

impl Authorizer for FakeAuthorizer {
    fn is_authorized(&self, _: &Principal, operation: AclOperation, resource: &Resource) -> bool {
        !self
            .denied
            .lock()
            .iter()
            .any(|(op, r)| *op == operation && r == resource)
    }
}

/// How [`FakeCreator`] treats a topic.
#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    /// Creates the topic and reports success.
    Create,
    /// Creates the topic after sleeping.
    Delay(Duration),
    /// Reports `TopicAlreadyExists` and makes the topic visible.
    AlreadyExists,
    /// Reports `TopicAlreadyExists` but the topic never shows up in the cache.
    AlreadyExistsButMissing,
    /// Reports the given error.
    Reject(TopicErrc),
    /// Fails the whole call.
    Fail,
    /// Fails the whole call as if the controller ran out of time.
    TimedOut,
    /// Never completes.
    Hang,
}

#[derive(Debug)]
pub(crate) struct FakeCreator {
    cache: Arc<FakeCache>,
    behaviors: Mutex<HashMap<String, Behavior>>,
    pub(crate) calls: Mutex<Vec<(Vec<TopicConfiguration>, Duration)>>,
}

impl FakeCreator {
    pub(crate) fn new(cache: Arc<FakeCache>) -> Self {
        Self {
            cache,
            behaviors: Mutex::new(HashMap::new()),
            calls: Mutex::new(vec![]),
        }
    }

    pub(crate) fn set(&self, topic: &str, behavior: Behavior) {
        self.behaviors.lock().insert(topic.to_owned(), behavior);
    }

    pub(crate) fn created_topics(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .flat_map(|(topics, _)| topics.iter().map(|t| t.tp_ns.topic.clone()))
            .collect()
    }

    fn materialize(&self, cfg: &TopicConfiguration) {
        self.cache.insert(topic_metadata(
            &cfg.tp_ns.ns,
            &cfg.tp_ns.topic,
            cfg.partition_count,
        ));
    }
}

#[async_trait]
impl TopicCreator for FakeCreator {
    async fn create_topics(
        &self,
        topics: Vec<TopicConfiguration>,
        timeout: Duration,
    ) -> Result<Vec<TopicResult>, CreateTopicsError> {
        self.calls.lock().push((topics.clone(), timeout));

        let mut results = Vec::with_capacity(topics.len());
        for cfg in topics {
            let behavior = self
                .behaviors
                .lock()
                .get(&cfg.tp_ns.topic)
                .cloned()
                .unwrap_or(Behavior::Create);

            let errc = match behavior {
                Behavior::Create => {
                    self.materialize(&cfg);
                    TopicErrc::Success
                }
                Behavior::Delay(d) => {
                    tokio::time::sleep(d).await;
                    self.materialize(&cfg);
                    TopicErrc::Success
                }
                Behavior::AlreadyExists => {
                    self.materialize(&cfg);
                    TopicErrc::TopicAlreadyExists
                }
                Behavior::AlreadyExistsButMissing => TopicErrc::TopicAlreadyExists,
                Behavior::Reject(errc) => errc,
                Behavior::Fail => {
                    return Err(CreateTopicsError::Transport("connection reset".to_owned()));
                }
                Behavior::TimedOut => return Err(CreateTopicsError::Timeout(timeout)),
                Behavior::Hang => std::future::pending().await,
            };

            results.push(TopicResult {
                tp_ns: cfg.tp_ns,
                errc,
            });
        }

        Ok(results)
    }
}
