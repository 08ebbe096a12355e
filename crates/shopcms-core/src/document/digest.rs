//! Revision digest for published component trees
//!
//! ## Determinism Guarantees
//!
//! - Same tree → same digest (canonical JSON serialization, sorted
//!   attribute keys)
//! - Child order matters: reordering siblings changes the digest

use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::tree::Node;

/// Compute the revision id of a component list.
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `CmsError::Serialization` if JSON serialization fails.
///
/// ## Example
///
/// ```
/// use shopcms_core::document::revision_id;
/// use shopcms_core::Node;
///
/// let digest = revision_id(&[Node::new("t1", "Text")]).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn revision_id(components: &[Node]) -> Result<String> {
    let canonical = serde_json::to_string(components)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
