use std::time::Duration;

/// Broker settings that shape metadata responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataConfig {
    /// Create requested topics that do not exist yet.
    ///
    /// Requests can additionally opt out via `allow_auto_topic_creation`.
    pub auto_create_topics_enabled: bool,

    /// Partition count of auto-created topics.
    pub default_topic_partitions: i32,

    /// Replication factor of auto-created topics.
    pub default_topic_replication: i16,

    /// Upper bound for a single auto-creation, after which the topic is reported as timed out.
    pub create_topic_timeout: Duration,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            auto_create_topics_enabled: false,
            default_topic_partitions: 1,
            default_topic_replication: 1,
            create_topic_timeout: Duration::from_secs(10),
        }
    }
}

impl MetadataConfig {
    pub fn auto_create_topics(mut self, enabled: bool) -> Self {
        self.auto_create_topics_enabled = enabled;
        self
    }

    pub fn default_topic_partitions(mut self, partitions: i32) -> Self {
        self.default_topic_partitions = partitions;
        self
    }

    pub fn default_topic_replication(mut self, replication: i16) -> Self {
        self.default_topic_replication = replication;
        self
    }

    pub fn create_topic_timeout(mut self, timeout: Duration) -> Self {
        self.create_topic_timeout = timeout;
        self
    }
}
