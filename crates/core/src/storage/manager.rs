use crate::errors::CoreError;
use crate::models::books::Books;

use super::format;

/// High-level storage operations: save/load the books to/from snapshot
/// bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Serialize the books to portable snapshot bytes.
    ///
    /// Flow: Books → bincode → FGBK format bytes
    pub fn save_to_bytes(books: &Books) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(books)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize books: {e}")))?;
        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    /// Deserialize books from snapshot bytes.
    ///
    /// Flow: FGBK bytes → parse header → bincode → Books
    pub fn load_from_bytes(data: &[u8]) -> Result<Books, CoreError> {
        let (_header, payload) = format::read_file(data)?;
        let books: Books = bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize books: {e}")))?;
        Ok(books)
    }

    /// Save books to a snapshot file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(books: &Books, path: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(books)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load books from a snapshot file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Books, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }
}
