//! Binary stream codec for shipping a start-replication request between nodes.

use super::request::{AssumeRoles, StartReplicationRequest};
use crate::error::Result;
use crate::settings::Settings;
use crate::stream::{StreamInput, StreamOutput, Writeable};
use crate::transport::{decode_frame, encode_frame, AcknowledgedRequest};
use tracing::{debug, trace};

impl Writeable for StartReplicationRequest {
  fn write_to(&self, out: &mut StreamOutput) -> Result<()> {
    out.write(&self.ack)?;
    out.write_string(&self.leader_alias)?;
    out.write_string(&self.leader_index)?;
    out.write_string(&self.follower_index)?;

    let roles = self.assume_roles.as_ref();
    out.write_optional_string(roles.and_then(AssumeRoles::leader))?;
    out.write_optional_string(roles.and_then(AssumeRoles::follower))?;

    out.write_bool(self.wait_for_restore)?;
    out.write_bool(self.is_autofollow_request)?;
    out.write(&self.settings)
  }
}

impl StartReplicationRequest {
  /// Read a request in the exact order [`Writeable::write_to`] produced it.
  ///
  /// The role map is always materialized, holding whichever roles were
  /// present; completeness is left to validation.
  pub fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
    let ack = AcknowledgedRequest::read_from(input)?;
    let leader_alias = input.read_string()?;
    let leader_index = input.read_string()?;
    let follower_index = input.read_string()?;
    let assume_roles = AssumeRoles {
      leader_cluster_role: input.read_optional_string()?,
      follower_cluster_role: input.read_optional_string()?,
    };
    let wait_for_restore = input.read_bool()?;
    let is_autofollow_request = input.read_bool()?;
    let settings = Settings::read_from(input)?;

    Ok(Self {
      follower_index,
      leader_alias,
      leader_index,
      assume_roles: Some(assume_roles),
      wait_for_restore,
      is_autofollow_request,
      settings,
      ack,
    })
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>> {
    let mut out = StreamOutput::with_capacity(64);
    out.write(self)?;
    Ok(out.into_bytes())
  }

  /// Decode a request occupying the whole buffer.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let mut input = StreamInput::new(bytes);
    let request = Self::read_from(&mut input)
      .and_then(|request| input.ensure_consumed().map(|()| request))
      .inspect_err(|error| {
        debug!(%error, len = bytes.len(), "rejected start replication stream")
      })?;
    trace!(%request, "decoded start replication request");
    Ok(request)
  }
}

/// Encode a request into a checksummed transport frame.
pub fn encode_start_replication_payload(request: &StartReplicationRequest) -> Result<Vec<u8>> {
  encode_frame(&request.to_bytes()?)
}

pub fn decode_start_replication_payload(payload: &[u8]) -> Result<StartReplicationRequest> {
  let body = decode_frame(payload)?;
  StartReplicationRequest::from_bytes(body)
}
