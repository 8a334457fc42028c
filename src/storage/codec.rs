//! Binary envelope for persisted artifacts.
//!
//! ```text
//! offset  size  field
//! 0       4     magic ("FOLI" index, "FOLP" path cache)
//! 4       2     format version (LE)
//! 6       2     reserved, zero
//! 8       8     payload length (LE)
//! 16      4     CRC32 of payload (LE)
//! 20      n     bincode payload
//! ```

use crate::storage::error::{StorageError, StorageResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const INDEX_MAGIC: [u8; 4] = *b"FOLI";
pub const PATH_CACHE_MAGIC: [u8; 4] = *b"FOLP";
pub const FORMAT_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 20;

/// Encode `value` with the given magic into a self-checking byte buffer.
pub fn encode<T: Serialize>(magic: [u8; 4], value: &T) -> StorageResult<Vec<u8>> {
    let payload = bincode::serialize(value).map_err(|e| StorageError::Encode(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&magic);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a buffer produced by [`encode`] with the same magic.
pub fn decode<T: DeserializeOwned>(magic: [u8; 4], bytes: &[u8]) -> StorageResult<T> {
    if bytes.is_empty() {
        return Err(StorageError::EmptyArtifact);
    }
    if bytes.len() < HEADER_LEN {
        return Err(StorageError::Truncated {
            expected: HEADER_LEN,
            found: bytes.len(),
        });
    }
    if bytes[0..4] != magic {
        return Err(StorageError::BadMagic);
    }

    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[8..16]);
    let payload_len = usize::try_from(u64::from_le_bytes(len_bytes))
        .map_err(|_| StorageError::Decode("payload length overflows usize".to_string()))?;

    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&bytes[16..20]);
    let stored = u32::from_le_bytes(crc_bytes);

    let body = &bytes[HEADER_LEN..];
    if body.len() < payload_len {
        return Err(StorageError::Truncated {
            expected: HEADER_LEN.saturating_add(payload_len),
            found: bytes.len(),
        });
    }
    if body.len() > payload_len {
        return Err(StorageError::Decode(format!(
            "{} trailing bytes after payload",
            body.len() - payload_len
        )));
    }

    let computed = crc32fast::hash(body);
    if computed != stored {
        return Err(StorageError::ChecksumMismatch { stored, computed });
    }

    bincode::deserialize(body).map_err(|e| StorageError::Decode(e.to_string()))
}
