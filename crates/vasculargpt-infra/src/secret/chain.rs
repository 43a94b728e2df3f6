//! Secret chain builder -- wires concrete providers in priority order.
//!
//! Default chain order: `[EnvSecretProvider, FileSecretProvider]`

use std::sync::Arc;

use vasculargpt_core::secret::{DynSecretProvider, SecretService};

use crate::secret::env::EnvSecretProvider;
use crate::secret::file::FileSecretProvider;

/// Build the default secret resolution chain.
///
/// The chain is ordered by precedence (first match wins):
/// 1. Environment variables (including those loaded from `.env`)
/// 2. The secrets file
pub fn build_secret_chain(file: FileSecretProvider) -> Vec<DynSecretProvider> {
    let env: DynSecretProvider = Arc::new(EnvSecretProvider::new());
    let file: DynSecretProvider = Arc::new(file);
    vec![env, file]
}

/// Convenience wrapper returning a ready [`SecretService`].
pub fn build_secret_service(file: FileSecretProvider) -> SecretService {
    SecretService::new(build_secret_chain(file))
}
