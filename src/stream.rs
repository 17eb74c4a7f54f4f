//! Ordered binary stream primitives for inter-node transport.
//!
//! Values are written and read strictly in sequence; a reader must consume
//! fields in exactly the order the writer produced them.

use crate::error::{CcrError, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};
use std::time::Duration;

/// Types with a binary stream encoding.
pub trait Writeable {
  fn write_to(&self, out: &mut StreamOutput) -> Result<()>;
}

/// Growable little-endian output buffer.
#[derive(Debug, Default, Clone)]
pub struct StreamOutput {
  bytes: Vec<u8>,
}

impl StreamOutput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      bytes: Vec::with_capacity(capacity),
    }
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.bytes
  }

  pub fn write_u32(&mut self, value: u32) -> Result<()> {
    self.bytes.write_u32::<LittleEndian>(value)?;
    Ok(())
  }

  pub fn write_u64(&mut self, value: u64) -> Result<()> {
    self.bytes.write_u64::<LittleEndian>(value)?;
    Ok(())
  }

  pub fn write_bool(&mut self, value: bool) -> Result<()> {
    self.bytes.write_u8(u8::from(value))?;
    Ok(())
  }

  pub fn write_string(&mut self, value: &str) -> Result<()> {
    let len = u32::try_from(value.len()).map_err(|_| {
      CcrError::InvalidWire(format!("string too large for stream: {} bytes", value.len()))
    })?;
    self.write_u32(len)?;
    self.bytes.extend_from_slice(value.as_bytes());
    Ok(())
  }

  pub fn write_optional_string(&mut self, value: Option<&str>) -> Result<()> {
    match value {
      Some(value) => {
        self.write_bool(true)?;
        self.write_string(value)
      }
      None => self.write_bool(false),
    }
  }

  /// Durations travel as whole milliseconds.
  pub fn write_duration(&mut self, value: Duration) -> Result<()> {
    let millis = u64::try_from(value.as_millis()).map_err(|_| {
      CcrError::InvalidWire(format!("duration too large for stream: {value:?}"))
    })?;
    self.write_u64(millis)
  }

  pub fn write<W: Writeable + ?Sized>(&mut self, value: &W) -> Result<()> {
    value.write_to(self)
  }
}

/// Sequential reader over an encoded buffer.
#[derive(Debug)]
pub struct StreamInput<'a> {
  cursor: Cursor<&'a [u8]>,
}

impl<'a> StreamInput<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Self {
      cursor: Cursor::new(bytes),
    }
  }

  pub fn position(&self) -> usize {
    self.cursor.position() as usize
  }

  pub fn remaining(&self) -> usize {
    self.cursor.get_ref().len().saturating_sub(self.position())
  }

  pub fn read_u8(&mut self) -> Result<u8> {
    self.cursor.read_u8().map_err(|error| truncated("u8", error))
  }

  pub fn read_u32(&mut self) -> Result<u32> {
    self
      .cursor
      .read_u32::<LittleEndian>()
      .map_err(|error| truncated("u32", error))
  }

  pub fn read_u64(&mut self) -> Result<u64> {
    self
      .cursor
      .read_u64::<LittleEndian>()
      .map_err(|error| truncated("u64", error))
  }

  pub fn read_bool(&mut self) -> Result<bool> {
    match self.read_u8()? {
      0 => Ok(false),
      1 => Ok(true),
      other => Err(CcrError::InvalidWire(format!(
        "unexpected byte [{other:#04x}] for boolean at offset {}",
        self.position() - 1
      ))),
    }
  }

  pub fn read_string(&mut self) -> Result<String> {
    let len = self.read_u32()? as usize;
    if len > self.remaining() {
      return Err(CcrError::InvalidWire(format!(
        "string length {len} exceeds remaining {} bytes",
        self.remaining()
      )));
    }

    let mut bytes = vec![0; len];
    self
      .cursor
      .read_exact(&mut bytes)
      .map_err(|error| truncated("string", error))?;
    String::from_utf8(bytes)
      .map_err(|error| CcrError::InvalidWire(format!("string is not valid UTF-8: {error}")))
  }

  pub fn read_optional_string(&mut self) -> Result<Option<String>> {
    if self.read_bool()? {
      self.read_string().map(Some)
    } else {
      Ok(None)
    }
  }

  pub fn read_duration(&mut self) -> Result<Duration> {
    self.read_u64().map(Duration::from_millis)
  }

  /// Fails when bytes are left over after the last expected field.
  pub fn ensure_consumed(&self) -> Result<()> {
    match self.remaining() {
      0 => Ok(()),
      remaining => Err(CcrError::InvalidWire(format!(
        "stream contains {remaining} unexpected trailing bytes"
      ))),
    }
  }
}

fn truncated(what: &str, error: std::io::Error) -> CcrError {
  CcrError::InvalidWire(format!("stream truncated while reading {what}: {error}"))
}
