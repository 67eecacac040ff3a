//! Authorization vocabulary and the authorized-operations bitfields of Metadata v8+.
//!
//! # References
//! - <https://cwiki.apache.org/confluence/display/KAFKA/KIP-430+-+Return+Authorized+Operations+in+Describe+Responses>

use std::fmt;

use super::collaborators::Authorizer;

/// ACL operations with their wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclOperation {
    Unknown,
    Any,
    All,
    Read,
    Write,
    Create,
    Delete,
    Alter,
    Describe,
    ClusterAction,
    DescribeConfigs,
    AlterConfigs,
    IdempotentWrite,
}

impl AclOperation {
    pub fn code(&self) -> i8 {
        match self {
            Self::Unknown => 0,
            Self::Any => 1,
            Self::All => 2,
            Self::Read => 3,
            Self::Write => 4,
            Self::Create => 5,
            Self::Delete => 6,
            Self::Alter => 7,
            Self::Describe => 8,
            Self::ClusterAction => 9,
            Self::DescribeConfigs => 10,
            Self::AlterConfigs => 11,
            Self::IdempotentWrite => 12,
        }
    }
}

/// Name of the single cluster resource.
pub const DEFAULT_CLUSTER_NAME: &str = "kafka-cluster";

/// Something an ACL can refer to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Topic(String),
    Cluster,
}

impl Resource {
    /// Operations that are meaningful for this kind of resource.
    pub fn operations(&self) -> &'static [AclOperation] {
        use AclOperation::*;

        match self {
            Self::Topic(_) => &[
                Read,
                Write,
                Create,
                Delete,
                Alter,
                Describe,
                DescribeConfigs,
                AlterConfigs,
            ],
            Self::Cluster => &[
                Create,
                Alter,
                Describe,
                ClusterAction,
                DescribeConfigs,
                AlterConfigs,
                IdempotentWrite,
            ],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic(name) => write!(f, "topic:{name}"),
            Self::Cluster => write!(f, "cluster:{DEFAULT_CLUSTER_NAME}"),
        }
    }
}

/// The authenticated identity behind a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub kind: String,
    pub name: String,
}

impl Principal {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: "User".to_owned(),
            name: name.into(),
        }
    }

    /// Principal of unauthenticated connections.
    pub fn anonymous() -> Self {
        Self::user("ANONYMOUS")
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// Operations on `resource` that `principal` is allowed to perform.
pub fn authorized_operations(
    authorizer: &dyn Authorizer,
    principal: &Principal,
    resource: &Resource,
) -> Vec<AclOperation> {
    resource
        .operations()
        .iter()
        .copied()
        .filter(|op| authorizer.is_authorized(principal, *op, resource))
        .collect()
}

/// Sets bit `op.code()` for every operation in `ops`.
pub fn to_bit_field(ops: &[AclOperation]) -> i32 {
    ops.iter().fold(0, |bits, op| bits | (1 << op.code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct AllowOnly(Vec<AclOperation>);

    impl Authorizer for AllowOnly {
        fn is_authorized(&self, _: &Principal, op: AclOperation, _: &Resource) -> bool {
            self.0.contains(&op)
        }
    }

    #[test]
    fn test_bit_field() {
        assert_eq!(to_bit_field(&[]), 0);
        assert_eq!(to_bit_field(&[AclOperation::Read]), 0b1000);
        assert_eq!(
            to_bit_field(&[AclOperation::Describe, AclOperation::Create]),
            (1 << 8) | (1 << 5)
        );
    }

    #[test]
    fn test_authorized_operations_only_checks_applicable_ops() {
        let authorizer = AllowOnly(vec![
            AclOperation::Describe,
            AclOperation::Read,
            AclOperation::IdempotentWrite,
        ]);
        let principal = Principal::user("alice");

        let topic_ops =
            authorized_operations(&authorizer, &principal, &Resource::Topic("t".to_owned()));
        assert_eq!(topic_ops, vec![AclOperation::Read, AclOperation::Describe]);

        let cluster_ops = authorized_operations(&authorizer, &principal, &Resource::Cluster);
        assert_eq!(
            cluster_ops,
            vec![AclOperation::Describe, AclOperation::IdempotentWrite]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Principal::user("alice").to_string(), "User:alice");
        assert_eq!(Resource::Topic("t".to_owned()).to_string(), "topic:t");
        assert_eq!(Resource::Cluster.to_string(), "cluster:kafka-cluster");
    }
}
