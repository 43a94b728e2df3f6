//! Retriever handle: embed the query, then search the vector index.

use tracing::{debug, info_span, Instrument};

use vasculargpt_types::chat::RetrievedPassage;
use vasculargpt_types::config::DEFAULT_TOP_K;
use vasculargpt_types::error::RetrievalError;

use super::embedder::Embedder;
use super::vector::VectorIndex;

/// Anything that maps a query string to ranked passages.
///
/// The answering pipeline depends on this trait rather than on
/// [`Retriever`] so that tests can substitute canned passages.
pub trait PassageRetriever: Send + Sync {
    fn retrieve(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<RetrievedPassage>, RetrievalError>> + Send;
}

/// Top-K retriever over a remote vector index.
pub struct Retriever<E: Embedder, V: VectorIndex> {
    embedder: E,
    index: V,
    top_k: usize,
}

impl<E: Embedder, V: VectorIndex> Retriever<E, V> {
    /// Wrap an already-bound index with the default `k` of 5.
    pub fn new(embedder: E, index: V) -> Self {
        Self {
            embedder,
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the number of passages returned per query.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &V {
        &self.index
    }
}

impl<E: Embedder, V: VectorIndex> PassageRetriever for Retriever<E, V> {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let span = info_span!(
            "retriever.query",
            index = self.index.index_name(),
            embedding.model = self.embedder.model_name(),
            top_k = self.top_k,
        );

        async {
            let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
            let vector = vectors.pop().ok_or_else(|| {
                RetrievalError::Embedding("embedding service returned no vectors".to_string())
            })?;

            let mut passages = self.index.query(&vector, self.top_k).await?;
            // Guard against an index that ignores topK.
            passages.truncate(self.top_k);

            debug!(count = passages.len(), "Retrieved passages");
            Ok(passages)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedEmbedder;

    impl Embedder for FixedEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct EmptyEmbedder;

    impl Embedder for EmptyEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(Vec::new())
        }

        fn model_name(&self) -> &str {
            "empty"
        }
    }

    /// Returns `stored` passages regardless of `top_k`, recording the request.
    struct RecordingIndex {
        stored: Vec<RetrievedPassage>,
        seen: Mutex<Vec<(Vec<f32>, usize)>>,
    }

    impl RecordingIndex {
        fn with_passages(n: usize) -> Self {
            Self {
                stored: (0..n)
                    .map(|i| RetrievedPassage::new(format!("passage {i}")))
                    .collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl VectorIndex for RecordingIndex {
        fn index_name(&self) -> &str {
            "test-index"
        }

        async fn query(
            &self,
            vector: &[f32],
            top_k: usize,
        ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
            self.seen.lock().unwrap().push((vector.to_vec(), top_k));
            Ok(self.stored.clone())
        }
    }

    #[tokio::test]
    async fn test_retrieve_defaults_to_five() {
        let retriever = Retriever::new(FixedEmbedder, RecordingIndex::with_passages(8));
        let passages = retriever.retrieve("plaque").await.unwrap();

        assert_eq!(passages.len(), 5);
        assert_eq!(passages[0].content, "passage 0");

        let seen = retriever.index().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (vec![6.0, 1.0], 5));
    }

    #[tokio::test]
    async fn test_retrieve_fewer_than_k() {
        let retriever = Retriever::new(FixedEmbedder, RecordingIndex::with_passages(2));
        let passages = retriever.retrieve("stent").await.unwrap();
        assert_eq!(passages.len(), 2);
    }

    #[tokio::test]
    async fn test_with_top_k_override() {
        let retriever =
            Retriever::new(FixedEmbedder, RecordingIndex::with_passages(8)).with_top_k(3);
        assert_eq!(retriever.top_k(), 3);
        assert_eq!(retriever.retrieve("aorta").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_embedding_is_error() {
        let retriever = Retriever::new(EmptyEmbedder, RecordingIndex::with_passages(1));
        let err = retriever.retrieve("vein").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
