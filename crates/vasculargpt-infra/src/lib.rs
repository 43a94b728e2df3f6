//! Infrastructure layer for VascularGPT.
//!
//! Contains implementations of the ports defined in `vasculargpt-core`:
//! the OpenAI-compatible chat provider, the OpenAI embeddings client, the
//! Pinecone index handle, secret providers (environment, secrets file) and
//! the configuration loader.

pub mod config;
pub mod embedding;
pub mod llm;
pub mod secret;
pub mod vector;

use std::time::Duration;

/// Build the shared `reqwest` client used by the hosted-service adapters.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}
