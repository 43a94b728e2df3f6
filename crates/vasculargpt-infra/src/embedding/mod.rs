//! Hosted embedding clients implementing the core `Embedder` port.

pub mod openai;
