//! Business logic and port traits for VascularGPT.
//!
//! This crate defines the "ports" (LLM provider, embedder, vector index,
//! secret provider) that the infrastructure layer implements, plus the
//! answering pipeline and session controller built on top of them. It
//! depends only on `vasculargpt-types` -- never on `vasculargpt-infra` or
//! any HTTP client.

pub mod llm;
pub mod pipeline;
pub mod retrieval;
pub mod secret;
pub mod session;
