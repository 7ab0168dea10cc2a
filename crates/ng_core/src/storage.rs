use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

/// Storage collaborator. The pipeline only needs a dedup probe and an insert;
/// `get` exists for browse surfaces and tests.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Returns true if a record for this URL is already stored.
    async fn exists(&self, url: &str) -> Result<bool>;

    /// Insert or replace the record for `article.url`.
    async fn insert(&self, article: &Article) -> Result<()>;

    /// Fetch a single record by URL.
    async fn get(&self, url: &str) -> Result<Option<Article>>;
}
