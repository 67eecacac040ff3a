//! Broker side of the Metadata API.
//!
//! [`MetadataHandler`] turns a [`MetadataRequest`](crate::protocol::messages::MetadataRequest) into a response using
//! the [collaborators](collaborators) it was built with.
pub mod acl;
pub mod collaborators;
pub mod config;
pub mod error;
mod handler;
#[cfg(test)]
mod test_utils;
mod topics;

pub use acl::{AclOperation, Principal, Resource};
pub use collaborators::{
    Authorizer, CacheError, CreateTopicsError, MetadataCache, TopicConfiguration, TopicCreator,
    TopicErrc, TopicResult,
};
pub use config::MetadataConfig;
pub use error::{Error, Result};
pub use handler::{MetadataHandler, RequestContext};
pub use topics::topic_from_metadata;
