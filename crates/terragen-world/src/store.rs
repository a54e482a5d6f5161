//! Chunk handle registry.
//!
//! Hosts that cannot hold a `Chunk` value directly keep chunks here and
//! refer to them through opaque handles. A foreign or already-removed
//! handle fails with [`WorldError::UnknownChunk`]; the store never hands
//! out dangling references.

use std::collections::HashMap;

use crate::chunk::Chunk;
use crate::error::WorldError;

/// Opaque identifier for a chunk held in a [`ChunkStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkHandle(u64);

/// Owning registry of generated chunks. Handles are unique for the life
/// of the store; removal does not recycle them.
#[derive(Default)]
pub struct ChunkStore {
    next: u64,
    chunks: HashMap<u64, Chunk>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a chunk and return its handle.
    pub fn insert(&mut self, chunk: Chunk) -> ChunkHandle {
        let handle = ChunkHandle(self.next);
        self.next += 1;
        self.chunks.insert(handle.0, chunk);
        handle
    }

    pub fn get(&self, handle: ChunkHandle) -> Result<&Chunk, WorldError> {
        self.chunks
            .get(&handle.0)
            .ok_or(WorldError::UnknownChunk { handle: handle.0 })
    }

    /// Remove a chunk, returning ownership to the caller. The handle is
    /// dead afterwards; using it again is an error.
    pub fn remove(&mut self, handle: ChunkHandle) -> Result<Chunk, WorldError> {
        self.chunks
            .remove(&handle.0)
            .ok_or(WorldError::UnknownChunk { handle: handle.0 })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TerrainGenerator;

    #[test]
    fn insert_get_remove_roundtrip() {
        let gen = TerrainGenerator::new(42);
        let mut store = ChunkStore::new();

        let handle = store.insert(gen.generate_chunk(1, 2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(handle).unwrap().coordinates(), (1, 2));

        let chunk = store.remove(handle).unwrap();
        assert_eq!(chunk.coordinates(), (1, 2));
        assert!(store.is_empty());
    }

    #[test]
    fn foreign_handle_is_an_error() {
        let gen = TerrainGenerator::new(42);
        let mut store = ChunkStore::new();
        let handle = store.insert(gen.generate_chunk(0, 0));
        store.remove(handle).unwrap();

        assert!(matches!(
            store.get(handle),
            Err(WorldError::UnknownChunk { handle: 0 })
        ));
        assert!(matches!(
            store.remove(handle),
            Err(WorldError::UnknownChunk { handle: 0 })
        ));
    }

    #[test]
    fn handles_are_not_recycled() {
        let gen = TerrainGenerator::new(42);
        let mut store = ChunkStore::new();
        let first = store.insert(gen.generate_chunk(0, 0));
        store.remove(first).unwrap();
        let second = store.insert(gen.generate_chunk(0, 1));
        assert_ne!(first, second);
        assert!(store.get(first).is_err());
        assert_eq!(store.get(second).unwrap().coordinates(), (0, 1));
    }
}
