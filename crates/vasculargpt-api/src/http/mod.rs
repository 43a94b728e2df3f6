//! HTTP layer for VascularGPT.
//!
//! Serves the chat page at `/` and a JSON API under `/api/v1/` using the
//! envelope response format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
