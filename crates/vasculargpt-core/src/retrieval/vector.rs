//! Vector index trait.
//!
//! The index is read-only from this system's perspective: only similarity
//! queries are issued, never upserts or deletes.

use vasculargpt_types::chat::RetrievedPassage;
use vasculargpt_types::error::RetrievalError;

/// Trait for a remote vector index supporting similarity search.
pub trait VectorIndex: Send + Sync {
    /// Name of the index this handle is bound to.
    fn index_name(&self) -> &str;

    /// Return up to `top_k` passages nearest to `vector`, most similar first.
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RetrievedPassage>, RetrievalError>> + Send;
}
