//! Transport framing for requests shipped between nodes.

use crate::error::{CcrError, Result};
use crate::stream::{StreamInput, StreamOutput, Writeable};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;
use std::time::Duration;

pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MASTER_NODE_TIMEOUT: Duration = Duration::from_secs(30);

const FRAME_MAGIC: &[u8; 4] = b"CCR1";
const FRAME_HEADER_BYTES: usize = 12;

/// Header shared by every request that waits for cluster acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcknowledgedRequest {
  /// How long to wait for the elected master node
  pub master_node_timeout: Duration,
  /// How long to wait for nodes to acknowledge the change
  pub ack_timeout: Duration,
}

impl Default for AcknowledgedRequest {
  fn default() -> Self {
    Self {
      master_node_timeout: DEFAULT_MASTER_NODE_TIMEOUT,
      ack_timeout: DEFAULT_ACK_TIMEOUT,
    }
  }
}

impl AcknowledgedRequest {
  pub fn read_from(input: &mut StreamInput<'_>) -> Result<Self> {
    let master_node_timeout = input.read_duration()?;
    let ack_timeout = input.read_duration()?;
    Ok(Self {
      master_node_timeout,
      ack_timeout,
    })
  }
}

impl Writeable for AcknowledgedRequest {
  fn write_to(&self, out: &mut StreamOutput) -> Result<()> {
    out.write_duration(self.master_node_timeout)?;
    out.write_duration(self.ack_timeout)
  }
}

/// Wrap an encoded request body as `magic | body length | crc32 | body`.
pub fn encode_frame(body: &[u8]) -> Result<Vec<u8>> {
  let body_len = u32::try_from(body.len()).map_err(|_| {
    CcrError::InvalidWire(format!("transport frame body too large: {}", body.len()))
  })?;

  let mut bytes = Vec::with_capacity(FRAME_HEADER_BYTES + body.len());
  bytes.extend_from_slice(FRAME_MAGIC);
  bytes.extend_from_slice(&body_len.to_le_bytes());
  bytes.extend_from_slice(&crc32fast::hash(body).to_le_bytes());
  bytes.extend_from_slice(body);
  Ok(bytes)
}

/// Check a frame and return its body.
pub fn decode_frame(frame: &[u8]) -> Result<&[u8]> {
  if frame.len() < FRAME_HEADER_BYTES {
    return Err(CcrError::InvalidWire("transport frame too short".to_string()));
  }

  if &frame[..4] != FRAME_MAGIC {
    return Err(CcrError::InvalidWire(
      "transport frame has invalid magic".to_string(),
    ));
  }

  let mut cursor = Cursor::new(&frame[4..FRAME_HEADER_BYTES]);
  let body_len = cursor.read_u32::<LittleEndian>()? as usize;
  let stored = cursor.read_u32::<LittleEndian>()?;

  let body = &frame[FRAME_HEADER_BYTES..];
  if body.len() < body_len {
    return Err(CcrError::InvalidWire("transport frame truncated".to_string()));
  }
  if body.len() > body_len {
    return Err(CcrError::InvalidWire(
      "transport frame contains unexpected trailing bytes".to_string(),
    ));
  }

  let computed = crc32fast::hash(body);
  if computed != stored {
    return Err(CcrError::CrcMismatch { stored, computed });
  }

  Ok(body)
}

#[cfg(test)]
mod tests {
  use super::{decode_frame, encode_frame, AcknowledgedRequest};
  use crate::error::CcrError;
  use crate::stream::{StreamInput, StreamOutput};
  use std::time::Duration;

  #[test]
  fn roundtrip_frame() {
    let frame = encode_frame(b"abc").expect("encode");
    assert_eq!(&frame[..4], b"CCR1");
    assert_eq!(decode_frame(&frame).expect("decode"), b"abc");
  }

  #[test]
  fn rejects_bad_magic() {
    let mut frame = encode_frame(b"x").expect("encode");
    frame[0] = b'X';
    assert!(decode_frame(&frame).is_err());
  }

  #[test]
  fn rejects_truncated_and_trailing_frames() {
    let frame = encode_frame(b"payload").expect("encode");
    assert!(decode_frame(&frame[..frame.len() - 1]).is_err());

    let mut longer = frame.clone();
    longer.push(0);
    assert!(decode_frame(&longer).is_err());
  }

  #[test]
  fn detects_corrupted_body() {
    let mut frame = encode_frame(b"payload").expect("encode");
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;
    assert!(matches!(
      decode_frame(&frame),
      Err(CcrError::CrcMismatch { .. })
    ));
  }

  #[test]
  fn ack_header_roundtrip() {
    let header = AcknowledgedRequest {
      master_node_timeout: Duration::from_secs(60),
      ack_timeout: Duration::from_millis(1500),
    };
    let mut out = StreamOutput::new();
    out.write(&header).expect("write");
    assert_eq!(out.len(), 16);

    let bytes = out.into_bytes();
    let decoded = AcknowledgedRequest::read_from(&mut StreamInput::new(&bytes)).expect("read");
    assert_eq!(decoded, header);
  }
}
