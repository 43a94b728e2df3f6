//! Shared domain types for VascularGPT.
//!
//! Chat turns, retrieved passages, pipeline results, LLM request/response
//! shapes, configuration and the error taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
