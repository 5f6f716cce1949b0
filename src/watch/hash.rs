// src/watch/hash.rs

use blake3::Hasher;
use tracing::trace;

/// Hex-encoded blake3 digest of a document's bytes.
///
/// Editors often emit several filesystem events per save, and some saves
/// rewrite identical content; comparing digests lets the session skip those.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    let hash = hasher.finalize().to_hex().to_string();
    trace!(hash = %hash, len = bytes.len(), "computed document hash");
    hash
}
