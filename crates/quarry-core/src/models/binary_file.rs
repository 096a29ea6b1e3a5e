use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of a stored binary asset, independent of the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryFile {
    /// Identifier within the repository, without any storage prefix.
    pub id: String,
    /// URI the file is reachable under.
    pub uri: String,
    /// Size in bytes.
    pub size: u64,
    pub mime_type: Option<String>,
    pub modified: Option<DateTime<Utc>>,
}

/// Write intent for a new binary file.
///
/// `id` stays `None` until the caller assigns one; the create operation
/// consumes the struct exactly once.
#[derive(Debug, Clone)]
pub struct BinaryFileCreateStruct {
    pub id: Option<String>,
    pub data: Bytes,
    pub size: u64,
    pub mime_type: String,
}

impl BinaryFileCreateStruct {
    /// Build a create struct from an in-memory payload. `id` is left unset.
    pub fn from_bytes(data: Bytes, mime_type: impl Into<String>) -> Self {
        let size = data.len() as u64;
        Self {
            id: None,
            data,
            size,
            mime_type: mime_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_struct_id_unset_until_assigned() {
        let create = BinaryFileCreateStruct::from_bytes(Bytes::from_static(b"abc"), "text/plain");
        assert!(create.id.is_none());
        assert_eq!(create.size, 3);
        assert_eq!(create.mime_type, "text/plain");
    }
}
