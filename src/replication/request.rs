//! The start-replication request model and its validation rules.

use crate::error::ValidationErrors;
use crate::naming::{IndexNamePolicy, NameValidator};
use crate::settings::Settings;
use crate::transport::AcknowledgedRequest;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const LEADER_CLUSTER_ROLE: &str = "leader_cluster_role";
pub const FOLLOWER_CLUSTER_ROLE: &str = "follower_cluster_role";

pub const MISSING_PARAMS_ERROR: &str = "mandatory params are missing for the request";
pub const MISSING_ROLES_ERROR: &str =
  "need roles for leader_cluster_role and follower_cluster_role";

/// Roles to assume on the leader and follower clusters.
///
/// Both slots are optional so a partially populated role map (one role sent
/// over the wire, or an explicit `null` in a document) survives until
/// validation rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssumeRoles {
  pub leader_cluster_role: Option<String>,
  pub follower_cluster_role: Option<String>,
}

impl AssumeRoles {
  pub fn new(
    leader_cluster_role: impl Into<String>,
    follower_cluster_role: impl Into<String>,
  ) -> Self {
    Self {
      leader_cluster_role: Some(leader_cluster_role.into()),
      follower_cluster_role: Some(follower_cluster_role.into()),
    }
  }

  pub fn leader(&self) -> Option<&str> {
    self.leader_cluster_role.as_deref()
  }

  pub fn follower(&self) -> Option<&str> {
    self.follower_cluster_role.as_deref()
  }

  /// Number of populated roles.
  pub fn len(&self) -> usize {
    usize::from(self.leader_cluster_role.is_some())
      + usize::from(self.follower_cluster_role.is_some())
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Both roles present, as `(leader, follower)`.
  pub fn pair(&self) -> Option<(&str, &str)> {
    match (self.leader(), self.follower()) {
      (Some(leader), Some(follower)) => Some((leader, follower)),
      _ => None,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.pair().is_some()
  }
}

/// How the targeted index name is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicesOptions {
  pub ignore_unavailable: bool,
  pub allow_no_indices: bool,
  pub expand_wildcards_open: bool,
  pub expand_wildcards_closed: bool,
  pub forbid_closed_indices: bool,
}

impl IndicesOptions {
  /// Exactly one concrete, open index; no wildcard expansion.
  pub const fn strict_single_index() -> Self {
    Self {
      ignore_unavailable: false,
      allow_no_indices: false,
      expand_wildcards_open: false,
      expand_wildcards_closed: false,
      forbid_closed_indices: true,
    }
  }
}

/// A request to start replicating `leader_alias:leader_index` into the local
/// `follower_index`.
///
/// Unset identity fields are empty strings. Nothing is checked at
/// construction; call [`StartReplicationRequest::validate`] before handing
/// the request on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReplicationRequest {
  pub follower_index: String,
  pub leader_alias: String,
  pub leader_index: String,
  pub assume_roles: Option<AssumeRoles>,
  /// Block until the initial restore of the follower index finishes
  pub wait_for_restore: bool,
  /// Permission checks were already done by the auto-follow subsystem
  pub is_autofollow_request: bool,
  pub settings: Settings,
  pub ack: AcknowledgedRequest,
}

impl StartReplicationRequest {
  pub fn new(
    follower_index: impl Into<String>,
    leader_alias: impl Into<String>,
    leader_index: impl Into<String>,
  ) -> Self {
    Self::with_settings(follower_index, leader_alias, leader_index, Settings::new())
  }

  pub fn with_settings(
    follower_index: impl Into<String>,
    leader_alias: impl Into<String>,
    leader_index: impl Into<String>,
    settings: Settings,
  ) -> Self {
    Self {
      follower_index: follower_index.into(),
      leader_alias: leader_alias.into(),
      leader_index: leader_index.into(),
      settings,
      ..Self::default()
    }
  }

  pub fn assume_roles(
    mut self,
    leader_cluster_role: impl Into<String>,
    follower_cluster_role: impl Into<String>,
  ) -> Self {
    self.assume_roles = Some(AssumeRoles::new(leader_cluster_role, follower_cluster_role));
    self
  }

  pub fn wait_for_restore(mut self, wait: bool) -> Self {
    self.wait_for_restore = wait;
    self
  }

  pub fn autofollow(mut self, autofollow: bool) -> Self {
    self.is_autofollow_request = autofollow;
    self
  }

  pub fn settings(mut self, settings: Settings) -> Self {
    self.settings = settings;
    self
  }

  pub fn ack_timeout(mut self, timeout: Duration) -> Self {
    self.ack.ack_timeout = timeout;
    self
  }

  pub fn master_node_timeout(mut self, timeout: Duration) -> Self {
    self.ack.master_node_timeout = timeout;
    self
  }

  /// The single index this request acts on.
  pub fn indices(&self) -> [&str; 1] {
    [self.follower_index.as_str()]
  }

  pub fn indices_options(&self) -> IndicesOptions {
    IndicesOptions::strict_single_index()
  }

  /// Check the request with the default index naming rules.
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    self.validate_with(&IndexNamePolicy::default())
  }

  /// Check the request, collecting every violation into one error.
  pub fn validate_with<V: NameValidator + ?Sized>(
    &self,
    names: &V,
  ) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if self.follower_index.is_empty()
      || self.leader_alias.is_empty()
      || self.leader_index.is_empty()
    {
      errors.push(MISSING_PARAMS_ERROR.to_string());
    }

    names.validate_name(&self.leader_index, &mut errors);
    names.validate_name(&self.follower_index, &mut errors);

    if let Some(roles) = &self.assume_roles {
      if !roles.is_complete() {
        errors.push(MISSING_ROLES_ERROR.to_string());
      }
    }

    if errors.is_empty() {
      return Ok(());
    }

    debug!(
      follower_index = %self.follower_index,
      leader_alias = %self.leader_alias,
      error_count = errors.len(),
      "start replication request failed validation"
    );
    Err(ValidationErrors::new(errors))
  }

  /// Validate and hand the request back, for `?` chains.
  pub fn validated(self) -> crate::Result<Self> {
    self.validate()?;
    Ok(self)
  }
}

impl fmt::Display for StartReplicationRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "StartReplicationRequest{{follower_index={}, leader={}:{}, wait_for_restore={}, autofollow={}, settings={}}}",
      self.follower_index,
      self.leader_alias,
      self.leader_index,
      self.wait_for_restore,
      self.is_autofollow_request,
      self.settings.len()
    )
  }
}
