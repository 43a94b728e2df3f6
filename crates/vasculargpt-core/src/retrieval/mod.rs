//! Retrieval ports and the retriever handle.
//!
//! - `Embedder`: text -> vector capability (hosted embedding service)
//! - `VectorIndex`: nearest-neighbour queries against a remote index
//! - `Retriever`: binds the two together and returns the top-K passages

pub mod embedder;
pub mod retriever;
pub mod vector;
