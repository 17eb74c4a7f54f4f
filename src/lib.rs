//! Request contract for starting cross-cluster index replication.
//!
//! The crate covers the request value itself: validation, the binary form
//! used between nodes and the JSON form exchanged with clients. Acting on a
//! request is left to the caller.

pub mod error;
pub mod naming;
pub mod replication;
pub mod settings;
pub mod stream;
pub mod transport;

pub use error::{CcrError, Result, ValidationErrors};
pub use naming::{IndexNamePolicy, NameValidator};
pub use replication::{AssumeRoles, StartReplicationRequest};
pub use settings::Settings;
