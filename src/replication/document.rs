//! JSON document form of the start-replication request.
//!
//! Input and output schemas are deliberately different types. The body a
//! client sends names the leader and optional roles and settings; the
//! follower index always arrives out of band. The echoed document adds the
//! follower index and both flags. Those output-only keys are tolerated on
//! input so an echoed document can be parsed back, but they are never read.

use super::request::{
  AssumeRoles, StartReplicationRequest, FOLLOWER_CLUSTER_ROLE, LEADER_CLUSTER_ROLE,
};
use crate::error::{CcrError, Result};
use crate::settings::Settings;
use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StartReplicationBody {
  leader_alias: String,
  leader_index: String,
  #[serde(default)]
  assume_roles: Option<AssumeRolesBody>,
  #[serde(default)]
  settings: Option<Settings>,
  #[serde(default, rename = "follower_index")]
  _follower_index: Option<IgnoredAny>,
  #[serde(default, rename = "wait_for_restore")]
  _wait_for_restore: Option<IgnoredAny>,
  #[serde(default, rename = "is_autofollow_request")]
  _is_autofollow_request: Option<IgnoredAny>,
}

/// The role object as sent, remembering how many keys it carried so an
/// explicit `null` role is not mistaken for an empty object.
#[derive(Debug, Deserialize)]
#[serde(try_from = "IndexMap<String, Option<String>>")]
struct AssumeRolesBody {
  key_count: usize,
  roles: AssumeRoles,
}

impl TryFrom<IndexMap<String, Option<String>>> for AssumeRolesBody {
  type Error = String;

  fn try_from(mut map: IndexMap<String, Option<String>>) -> std::result::Result<Self, String> {
    let key_count = map.len();
    let roles = AssumeRoles {
      leader_cluster_role: map.shift_remove(LEADER_CLUSTER_ROLE).flatten(),
      follower_cluster_role: map.shift_remove(FOLLOWER_CLUSTER_ROLE).flatten(),
    };

    if let Some(unknown) = map.keys().next() {
      return Err(format!(
        "unknown field `{unknown}` in assume_roles, expected `{LEADER_CLUSTER_ROLE}` or `{FOLLOWER_CLUSTER_ROLE}`"
      ));
    }

    Ok(Self { key_count, roles })
  }
}

#[derive(Debug, Serialize)]
struct StartReplicationDocument<'a> {
  leader_alias: &'a str,
  leader_index: &'a str,
  follower_index: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  assume_roles: Option<AssumeRolesDocument<'a>>,
  wait_for_restore: bool,
  is_autofollow_request: bool,
  settings: &'a Settings,
}

#[derive(Debug, Serialize)]
struct AssumeRolesDocument<'a> {
  leader_cluster_role: &'a str,
  follower_cluster_role: &'a str,
}

impl StartReplicationBody {
  fn into_request(self, follower_index: String) -> StartReplicationRequest {
    // An empty role object means "no custom roles".
    let assume_roles = self
      .assume_roles
      .filter(|body| body.key_count > 0)
      .map(|body| body.roles);

    StartReplicationRequest {
      follower_index,
      leader_alias: self.leader_alias,
      leader_index: self.leader_index,
      assume_roles,
      settings: self.settings.unwrap_or_default(),
      ..StartReplicationRequest::default()
    }
  }
}

impl StartReplicationRequest {
  /// Parse a request body. `follower_index` comes from the caller (usually
  /// the request path) and wins over anything in the body.
  pub fn from_document(document: Value, follower_index: impl Into<String>) -> Result<Self> {
    let body: StartReplicationBody = serde_json::from_value(document).map_err(parse_error)?;
    Ok(body.into_request(follower_index.into()))
  }

  pub fn from_json_slice(bytes: &[u8], follower_index: impl Into<String>) -> Result<Self> {
    let body: StartReplicationBody = serde_json::from_slice(bytes).map_err(parse_error)?;
    Ok(body.into_request(follower_index.into()))
  }

  pub fn from_json_str(raw: &str, follower_index: impl Into<String>) -> Result<Self> {
    Self::from_json_slice(raw.as_bytes(), follower_index)
  }

  fn output_document(&self) -> StartReplicationDocument<'_> {
    let assume_roles = self
      .assume_roles
      .as_ref()
      .and_then(AssumeRoles::pair)
      .map(|(leader, follower)| AssumeRolesDocument {
        leader_cluster_role: leader,
        follower_cluster_role: follower,
      });

    StartReplicationDocument {
      leader_alias: &self.leader_alias,
      leader_index: &self.leader_index,
      follower_index: &self.follower_index,
      assume_roles,
      wait_for_restore: self.wait_for_restore,
      is_autofollow_request: self.is_autofollow_request,
      settings: &self.settings,
    }
  }

  pub fn to_document(&self) -> Result<Value> {
    serde_json::to_value(self.output_document()).map_err(serialization_error)
  }

  /// Compact JSON in the conventional field order.
  pub fn to_json_string(&self) -> Result<String> {
    serde_json::to_string(&self.output_document()).map_err(serialization_error)
  }

  pub fn to_json_vec(&self) -> Result<Vec<u8>> {
    serde_json::to_vec(&self.output_document()).map_err(serialization_error)
  }
}

fn parse_error(error: serde_json::Error) -> CcrError {
  debug!(%error, "rejected start replication document");
  CcrError::Parse(format!("parse start replication request: {error}"))
}

fn serialization_error(error: serde_json::Error) -> CcrError {
  CcrError::Serialization(format!("encode start replication request: {error}"))
}
