//! Cross-cluster replication requests.
//!
//! A [`StartReplicationRequest`] asks the local cluster to create a follower
//! index and keep it in sync with an index on a remote leader cluster.

pub mod codec;
pub mod document;
pub mod request;

pub use codec::{decode_start_replication_payload, encode_start_replication_payload};
pub use request::{
  AssumeRoles, IndicesOptions, StartReplicationRequest, FOLLOWER_CLUSTER_ROLE, LEADER_CLUSTER_ROLE,
};
