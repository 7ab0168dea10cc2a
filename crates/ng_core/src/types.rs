use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One fetched page, owned by the pipeline for a single extraction pass.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub body: String,
    pub status: u16,
    pub elapsed: Duration,
    pub content_length: usize,
}

/// What the extractor pulls out of a parsed document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub title: String,
    pub content_html: String,
    pub plain_text: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Success,
    Failed,
}

/// The stored record. Failed fetches are persisted too, with empty content
/// fields and an error message, so known-bad URLs are not retried next run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub original_content: String,
    pub plain_text: String,
    pub published_at: DateTime<Utc>,
    pub status: ArticleStatus,
    pub http_status: Option<u16>,
    pub response_time: Option<f64>,
    pub content_length: Option<usize>,
    pub error_message: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl Article {
    pub fn failed(url: &str, reason: &str, published_at: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            original_content: String::new(),
            plain_text: String::new(),
            published_at,
            status: ArticleStatus::Failed,
            http_status: None,
            response_time: None,
            content_length: None,
            error_message: Some(reason.to_string()),
            scraped_at: Utc::now(),
        }
    }
}

/// Final classification for one processed URL. Exactly one per URL per run.
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(Article),
    Failed { url: String, reason: String },
    Skipped { url: String, reason: String },
}

impl Outcome {
    pub fn url(&self) -> &str {
        match self {
            Outcome::Success(article) => &article.url,
            Outcome::Failed { url, .. } => url,
            Outcome::Skipped { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleHandle {
    pub url: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
}

/// Per-run statistics, built incrementally in processing order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub articles: Vec<ArticleHandle>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success(article) => {
                self.successful += 1;
                self.articles.push(ArticleHandle {
                    url: article.url.clone(),
                    title: article.title.clone(),
                    published_at: article.published_at,
                });
            }
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_balance() {
        let mut summary = RunSummary::default();
        let article = Article {
            url: "http://test.com/a".to_string(),
            title: "Test Article".to_string(),
            original_content: "<p>body</p>".to_string(),
            plain_text: "body".to_string(),
            published_at: Utc::now(),
            status: ArticleStatus::Success,
            http_status: Some(200),
            response_time: Some(0.1),
            content_length: Some(11),
            error_message: None,
            scraped_at: Utc::now(),
        };
        summary.record(&Outcome::Success(article));
        summary.record(&Outcome::Failed {
            url: "http://test.com/b".to_string(),
            reason: "HTTP status 404".to_string(),
        });
        summary.record(&Outcome::Skipped {
            url: "http://test.com/c".to_string(),
            reason: "already stored".to_string(),
        });

        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful + summary.failed + summary.skipped, summary.total);
        assert_eq!(summary.articles.len(), 1);
        assert_eq!(summary.articles[0].title, "Test Article");
    }

    #[test]
    fn test_failed_record_has_empty_content() {
        let record = Article::failed("http://test.com/x", "Timeout", Utc::now());
        assert_eq!(record.status, ArticleStatus::Failed);
        assert!(record.title.is_empty());
        assert!(record.plain_text.is_empty());
        assert_eq!(record.error_message.as_deref(), Some("Timeout"));
    }
}
