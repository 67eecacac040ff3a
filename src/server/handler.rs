use std::sync::Arc;

use tracing::{debug, warn};

use crate::protocol::{
    api_version::ApiVersion,
    messages::{
        MetadataRequest, MetadataResponse, MetadataResponseBroker, ReadVersionedType, RequestBody,
        WriteVersionedType,
    },
    primitives::{Int32, NullableString, String_},
};

use super::{
    acl::{AclOperation, Principal, Resource, authorized_operations, to_bit_field},
    collaborators::{Authorizer, MetadataCache, TopicCreator},
    config::MetadataConfig,
    error::{Error, Result},
    topics::TopicResolver,
};

/// Reported when no controller is known.
const NO_CONTROLLER: Int32 = Int32(-1);

/// Connection-level facts about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub principal: Principal,

    /// Listener the request arrived on. Brokers are advertised with their address on the same listener.
    pub listener: String,

    /// Version from the request header.
    pub api_version: ApiVersion,
}

/// Answers Metadata requests from the local view of the cluster.
#[derive(Debug)]
pub struct MetadataHandler {
    cache: Arc<dyn MetadataCache>,
    authorizer: Arc<dyn Authorizer>,
    topic_creator: Arc<dyn TopicCreator>,
    config: MetadataConfig,
}

impl MetadataHandler {
    pub fn new(
        cache: Arc<dyn MetadataCache>,
        authorizer: Arc<dyn Authorizer>,
        topic_creator: Arc<dyn TopicCreator>,
    ) -> Self {
        Self {
            cache,
            authorizer,
            topic_creator,
            config: MetadataConfig::default(),
        }
    }

    pub fn with_config(self, config: MetadataConfig) -> Self {
        Self { config, ..self }
    }

    /// Builds the response to an already decoded request.
    ///
    /// Only cache failures and unsupported versions fail the request. Problems with individual topics are reported
    /// inside the response.
    pub async fn handle(
        &self,
        ctx: &RequestContext,
        request: &MetadataRequest,
    ) -> Result<MetadataResponse> {
        check_version(ctx.api_version)?;

        let brokers: Vec<_> = self
            .cache
            .all_brokers()?
            .iter()
            .filter_map(|broker| {
                let listener = broker.listener(&ctx.listener)?;
                Some(MetadataResponseBroker {
                    node_id: Int32(broker.id.0),
                    host: String_(listener.host.clone()),
                    port: Int32(listener.port),
                    rack: Some(NullableString(broker.rack.clone())),
                })
            })
            .collect();

        let controller_id = self
            .cache
            .controller_id()?
            .map_or(NO_CONTROLLER, |id| Int32(id.0));

        let topics = TopicResolver {
            cache: self.cache.as_ref(),
            authorizer: self.authorizer.as_ref(),
            topic_creator: self.topic_creator.as_ref(),
            config: &self.config,
            principal: &ctx.principal,
        }
        .get_topic_metadata(request, ctx.api_version)
        .await?;

        let cluster_authorized_operations = (request.wants_cluster_authorized_operations()
            && self.authorizer.is_authorized(
                &ctx.principal,
                AclOperation::Describe,
                &Resource::Cluster,
            ))
        .then(|| {
            Int32(to_bit_field(&authorized_operations(
                self.authorizer.as_ref(),
                &ctx.principal,
                &Resource::Cluster,
            )))
        });

        debug!(
            api_key = MetadataRequest::API_KEY,
            version = %ctx.api_version,
            listener = %ctx.listener,
            brokers = brokers.len(),
            topics = topics.len(),
            controller_id = controller_id.0,
            "metadata response"
        );

        Ok(MetadataResponse {
            throttle_time_ms: Some(Int32(0)),
            brokers,
            cluster_id: Some(NullableString(None)),
            controller_id: Some(controller_id),
            topics,
            cluster_authorized_operations,
        })
    }

    /// Decodes a request body at `ctx.api_version`, handles it and encodes the response at the same version.
    pub async fn handle_bytes(&self, ctx: &RequestContext, body: &[u8]) -> Result<Vec<u8>> {
        check_version(ctx.api_version)?;

        let mut rest = body;
        let request = MetadataRequest::read_versioned(&mut rest, ctx.api_version)?;
        if !rest.is_empty() {
            warn!(
                api_key = MetadataRequest::API_KEY,
                version = %ctx.api_version,
                trailing = rest.len(),
                "ignoring trailing bytes after Metadata request"
            );
        }

        let response = self.handle(ctx, &request).await?;

        let mut buf = vec![];
        response.write_versioned(&mut buf, ctx.api_version)?;
        Ok(buf)
    }
}

fn check_version(version: ApiVersion) -> Result<()> {
    if MetadataRequest::API_VERSION_RANGE.contains(version) {
        Ok(())
    } else {
        Err(Error::UnsupportedVersion { version })
    }
}
