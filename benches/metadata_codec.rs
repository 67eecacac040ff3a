use std::{hint::black_box, sync::Arc, time::Duration};

use async_trait::async_trait;
use criterion::{
    BenchmarkGroup, BenchmarkId, Criterion, SamplingMode, criterion_group, criterion_main,
    measurement::WallTime,
};
use kafka_metadata::{
    model::{
        AdvertisedListener, Broker, NodeId, PartitionMetadata, TopicMetadata, TopicNamespace,
    },
    protocol::{
        api_version::ApiVersion,
        messages::{
            MetadataRequest, MetadataResponse, MetadataResponseBroker, WriteVersionedType,
        },
        primitives::{Int32, NullableString, String_},
    },
    server::{
        AclOperation, Authorizer, CacheError, CreateTopicsError, MetadataCache, MetadataHandler,
        Principal, RequestContext, Resource, TopicConfiguration, TopicCreator, TopicResult,
        topic_from_metadata,
    },
};
use tokio::runtime::Runtime;

const TOPIC_COUNTS: &[usize] = &[10, 100, 1_000];
const PARTITIONS: i32 = 12;

pub fn criterion_benchmark(c: &mut Criterion) {
    {
        let mut group = benchmark_group(c, "encode_response");

        for &n in TOPIC_COUNTS {
            let response = response(n);

            for version in [0, 5, 8] {
                let version = ApiVersion::new(version);
                group.bench_with_input(
                    BenchmarkId::new(format!("v{version}"), n),
                    &response,
                    |b, response| {
                        b.iter(|| {
                            let mut buf = Vec::with_capacity(64 * 1024);
                            response.write_versioned(&mut buf, version).unwrap();
                            black_box(buf)
                        })
                    },
                );
            }
        }
    }

    {
        let mut group = benchmark_group(c, "handle_bytes");

        for &n in TOPIC_COUNTS {
            let handler = MetadataHandler::new(
                Arc::new(StaticCache::new(n)),
                Arc::new(AllowAll),
                Arc::new(NoCreate),
            );
            let ctx = RequestContext {
                principal: Principal::anonymous(),
                listener: "external".to_owned(),
                api_version: ApiVersion::new(8),
            };
            let mut body = vec![];
            MetadataRequest::default()
                .write_versioned(&mut body, ctx.api_version)
                .unwrap();

            group.bench_with_input(BenchmarkId::new("list_all", n), &body, |b, body| {
                b.to_async(runtime())
                    .iter(|| async { black_box(handler.handle_bytes(&ctx, body).await.unwrap()) })
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn benchmark_group<'a>(c: &'a mut Criterion, name: &str) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(10));
    group.sampling_mode(SamplingMode::Flat);
    group
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

fn topic(i: usize) -> TopicMetadata {
    TopicMetadata {
        tp_ns: TopicNamespace::kafka(format!("topic_{i}")),
        partitions: (0..PARTITIONS)
            .map(|id| PartitionMetadata {
                id,
                leader_node: Some(NodeId(id % 3)),
                replicas: vec![NodeId(id % 3), NodeId((id + 1) % 3), NodeId((id + 2) % 3)],
            })
            .collect(),
    }
}

fn broker(id: i32) -> Broker {
    Broker {
        id: NodeId(id),
        rack: Some(format!("rack-{id}")),
        advertised_listeners: vec![AdvertisedListener {
            name: "external".to_owned(),
            host: format!("broker-{id}.example.com"),
            port: 9092,
        }],
    }
}

fn response(topics: usize) -> MetadataResponse {
    MetadataResponse {
        throttle_time_ms: Some(Int32(0)),
        brokers: (0..3)
            .map(|id| MetadataResponseBroker {
                node_id: Int32(id),
                host: String_(format!("broker-{id}.example.com")),
                port: Int32(9092),
                rack: Some(NullableString(Some(format!("rack-{id}")))),
            })
            .collect(),
        cluster_id: Some(NullableString(None)),
        controller_id: Some(Int32(0)),
        topics: (0..topics).map(|i| topic_from_metadata(topic(i))).collect(),
        cluster_authorized_operations: None,
    }
}

#[derive(Debug)]
struct StaticCache {
    topics: Vec<TopicMetadata>,
    brokers: Vec<Arc<Broker>>,
}

impl StaticCache {
    fn new(topics: usize) -> Self {
        Self {
            topics: (0..topics).map(topic).collect(),
            brokers: (0..3).map(|id| Arc::new(broker(id))).collect(),
        }
    }
}

impl MetadataCache for StaticCache {
    fn all_topics(&self, _ns: &str) -> Result<Vec<TopicMetadata>, CacheError> {
        Ok(self.topics.clone())
    }

    fn topic(&self, ns: &str, topic: &str) -> Result<Option<TopicMetadata>, CacheError> {
        Ok(self
            .topics
            .iter()
            .find(|md| md.tp_ns.ns == ns && md.tp_ns.topic == topic)
            .cloned())
    }

    fn all_brokers(&self) -> Result<Vec<Arc<Broker>>, CacheError> {
        Ok(self.brokers.clone())
    }

    fn controller_id(&self) -> Result<Option<NodeId>, CacheError> {
        Ok(Some(NodeId(0)))
    }
}

#[derive(Debug)]
struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _: &Principal, _: AclOperation, _: &Resource) -> bool {
        true
    }
}

#[derive(Debug)]
struct NoCreate;

#[async_trait]
impl TopicCreator for NoCreate {
    async fn create_topics(
        &self,
        _topics: Vec<TopicConfiguration>,
        _timeout: Duration,
    ) -> Result<Vec<TopicResult>, CreateTopicsError> {
        Err(CreateTopicsError::Transport("not supported".to_owned()))
    }
}
