use async_trait::async_trait;
use tokio::sync::RwLock;

use ng_core::{Article, ArticleStore, Result};

/// Reference in-memory backend. Upserts by URL so a re-scrape of a known URL
/// replaces the old record instead of duplicating it.
#[derive(Default)]
pub struct MemoryStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn exists(&self, url: &str) -> Result<bool> {
        let articles = self.articles.read().await;
        Ok(articles.iter().any(|article| article.url == url))
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        let mut articles = self.articles.write().await;
        if let Some(existing) = articles.iter_mut().find(|a| a.url == article.url) {
            *existing = article.clone();
        } else {
            articles.push(article.clone());
        }
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|article| article.url == url).cloned())
    }
}
