//! Remote vector index adapters implementing the core `VectorIndex` port.

pub mod pinecone;
