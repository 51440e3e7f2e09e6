//! Snapshot error types.

use thiserror::Error;

/// Why a snapshot could not be written or restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The state tree could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    SerializationFailed(String),

    /// The input is not a snapshot of this state type.
    #[error("failed to decode snapshot: {0}")]
    DeserializationFailed(String),

    /// The snapshot was written by an incompatible format version.
    #[error("snapshot {id} has format version {found}, this build reads version {supported}")]
    UnsupportedVersion {
        id: String,
        found: u32,
        supported: u32,
    },
}
