//! Current-schema wire codec.

use crate::{
    error::{SaveError, SaveResult},
    snapshot::Snapshot,
};

pub fn encode(snapshot: &Snapshot) -> SaveResult<Vec<u8>> {
    serde_json::to_vec(snapshot).map_err(SaveError::Encode)
}

/// Decode a whole record. Any malformed field fails the entire decode;
/// callers route that failure to partial recovery.
pub fn decode(bytes: &[u8]) -> SaveResult<Snapshot> {
    serde_json::from_slice(bytes).map_err(SaveError::Decode)
}
