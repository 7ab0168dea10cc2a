use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scraper::Html;
use tracing::{error, info, warn};

use ng_core::types::{Article, ArticleStatus, Outcome, RunSummary};
use ng_core::{ArticleStore, Result};
use ng_extract::extractor::MIN_TEXT_CHARS;
use ng_extract::{start_of_day, ArticleExtractor, MISSING_TITLE};

use crate::fetch::{HttpFetcher, PageFetch};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub request_timeout: Duration,
    /// Politeness pause between consecutive fetches. A throughput throttle,
    /// deliberately non-zero by default.
    pub request_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            request_delay: Duration::from_secs(1),
        }
    }
}

/// Drives fetch → dedup → extract → validate → classify for each URL, in
/// input order, one at a time. No single URL can fail the run.
pub struct FetchPipeline {
    fetcher: Box<dyn PageFetch>,
    extractor: ArticleExtractor,
    store: Arc<dyn ArticleStore>,
    delay: Duration,
}

impl FetchPipeline {
    pub fn new(store: Arc<dyn ArticleStore>, config: PipelineConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.request_timeout)?;
        Ok(Self::with_fetcher(store, Box::new(fetcher), config))
    }

    /// Build against a custom fetch collaborator (tests, recorded fixtures).
    pub fn with_fetcher(
        store: Arc<dyn ArticleStore>,
        fetcher: Box<dyn PageFetch>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor: ArticleExtractor::new(),
            store,
            delay: config.request_delay,
        }
    }

    pub async fn run(&self, urls: &[String]) -> RunSummary {
        info!("Starting run over {} URLs", urls.len());
        let mut summary = RunSummary::default();

        for (index, url) in urls.iter().enumerate() {
            info!("Processing article {}/{}: {}", index + 1, urls.len(), url);

            let outcome = self.process_url(url).await;
            match &outcome {
                Outcome::Success(article) => info!("Scraped: {}", article.title),
                Outcome::Failed { reason, .. } => warn!("Failed {}: {}", url, reason),
                Outcome::Skipped { reason, .. } => info!("Skipped {}: {}", url, reason),
            }
            summary.record(&outcome);

            if index + 1 < urls.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            skipped = summary.skipped,
            "Run finished"
        );
        summary
    }

    /// Every error ends up as a Failed outcome; the run continues regardless.
    async fn process_url(&self, url: &str) -> Outcome {
        match self.try_process(url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Unexpected error for {}: {}", url, e);
                Outcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_process(&self, url: &str) -> Result<Outcome> {
        // Dedup before any network cost.
        if self.store.exists(url).await? {
            return Ok(Outcome::Skipped {
                url: url.to_string(),
                reason: "article already stored".to_string(),
            });
        }

        let now = Utc::now();

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                let reason = e.to_string();
                self.store
                    .insert(&Article::failed(url, &reason, start_of_day(now)))
                    .await?;
                return Ok(Outcome::Failed {
                    url: url.to_string(),
                    reason,
                });
            }
        };

        // Best-effort recovery parse; malformed markup never raises.
        let extraction = {
            let document = Html::parse_document(&page.body);
            self.extractor.extract(&document, url, now)
        };

        // A blank document <title> slips past the extractor's cascade, so an
        // empty title is rejected here alongside the sentinel.
        if extraction.title.trim().is_empty()
            || extraction.title == MISSING_TITLE
            || extraction.plain_text.trim().chars().count() < MIN_TEXT_CHARS
        {
            let reason = "extraction incomplete: title or article text missing".to_string();
            self.store
                .insert(&Article::failed(url, &reason, start_of_day(now)))
                .await?;
            return Ok(Outcome::Failed {
                url: url.to_string(),
                reason,
            });
        }

        let article = Article {
            url: url.to_string(),
            title: extraction.title,
            original_content: extraction.content_html,
            plain_text: extraction.plain_text,
            published_at: extraction.published_at,
            status: ArticleStatus::Success,
            http_status: Some(page.status),
            response_time: Some(page.elapsed.as_secs_f64()),
            content_length: Some(page.content_length),
            error_message: None,
            scraped_at: Utc::now(),
        };
        self.store.insert(&article).await?;

        Ok(Outcome::Success(article))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ng_core::{Error, PageContent};
    use ng_storage::MemoryStore;
    use std::collections::HashMap;

    enum StubResponse {
        Page(String),
        Status(u16),
        Timeout,
    }

    struct StubFetcher {
        pages: HashMap<String, StubResponse>,
    }

    #[async_trait]
    impl PageFetch for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<PageContent> {
            match self.pages.get(url) {
                Some(StubResponse::Page(body)) => Ok(PageContent {
                    content_length: body.len(),
                    body: body.clone(),
                    status: 200,
                    elapsed: Duration::from_millis(5),
                }),
                Some(StubResponse::Status(code)) => Err(Error::HttpStatus {
                    code: *code,
                    url: url.to_string(),
                }),
                Some(StubResponse::Timeout) | None => Err(Error::Timeout(url.to_string())),
            }
        }
    }

    fn article_html() -> String {
        format!(
            r#"<html><head><title>Fixture</title></head><body>
            <h1 class="entry-title">A headline long enough to qualify</h1>
            <time datetime="2024-03-05T08:00:00Z">5 marca 2024</time>
            <div class="entry-content"><p>{}</p></div>
            </body></html>"#,
            "Plenty of article body text here. ".repeat(5)
        )
    }

    fn pipeline_with(
        pages: Vec<(&str, StubResponse)>,
    ) -> (FetchPipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let fetcher = StubFetcher {
            pages: pages
                .into_iter()
                .map(|(url, response)| (url.to_string(), response))
                .collect(),
        };
        let config = PipelineConfig {
            request_delay: Duration::ZERO,
            ..PipelineConfig::default()
        };
        let pipeline = FetchPipeline::with_fetcher(store.clone(), Box::new(fetcher), config);
        (pipeline, store)
    }

    #[tokio::test]
    async fn test_successful_url_is_extracted_and_stored() {
        let url = "https://news.example.com/a";
        let (pipeline, store) =
            pipeline_with(vec![(url, StubResponse::Page(article_html()))]);

        let summary = pipeline.run(&[url.to_string()]).await;
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.articles[0].title, "A headline long enough to qualify");

        let stored = store.get(url).await.unwrap().expect("record stored");
        assert_eq!(stored.status, ArticleStatus::Success);
        assert_eq!(stored.http_status, Some(200));
        assert!(stored.plain_text.contains("Plenty of article body text"));
    }

    #[tokio::test]
    async fn test_second_run_skips_everything_stored() {
        let url = "https://news.example.com/a";
        let (pipeline, _store) =
            pipeline_with(vec![(url, StubResponse::Page(article_html()))]);
        let urls = vec![url.to_string()];

        let first = pipeline.run(&urls).await;
        assert_eq!(first.successful, 1);

        let second = pipeline.run(&urls).await;
        assert_eq!(second.successful, 0);
        assert_eq!(second.skipped, 1);
        assert!(second.articles.is_empty());
    }

    #[tokio::test]
    async fn test_http_404_is_failed_with_classified_reason() {
        let url = "https://news.example.com/gone";
        let (pipeline, store) = pipeline_with(vec![(url, StubResponse::Status(404))]);

        let summary = pipeline.run(&[url.to_string()]).await;
        assert_eq!(summary.failed, 1);

        let stored = store.get(url).await.unwrap().expect("failed record stored");
        assert_eq!(stored.status, ArticleStatus::Failed);
        assert!(stored.title.is_empty());
        assert!(stored.plain_text.is_empty());
        assert!(stored.error_message.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_timeout_is_failed_and_persisted() {
        let url = "https://news.example.com/slow";
        let (pipeline, store) = pipeline_with(vec![(url, StubResponse::Timeout)]);

        let summary = pipeline.run(&[url.to_string()]).await;
        assert_eq!(summary.failed, 1);

        let stored = store.get(url).await.unwrap().expect("failed record stored");
        assert!(stored.error_message.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_thin_page_fails_validation() {
        let url = "https://news.example.com/thin";
        let html = r#"<html><body><h1>A headline long enough to qualify</h1>
            <div class="entry-content">too short</div></body></html>"#;
        let (pipeline, store) =
            pipeline_with(vec![(url, StubResponse::Page(html.to_string()))]);

        let summary = pipeline.run(&[url.to_string()]).await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.successful, 0);

        let stored = store.get(url).await.unwrap().expect("failed record stored");
        assert!(stored
            .error_message
            .unwrap()
            .contains("extraction incomplete"));
    }

    #[tokio::test]
    async fn test_blank_document_title_fails_validation() {
        // Long enough body, but the only title the document offers is an
        // empty <title> element.
        let url = "https://news.example.com/untitled";
        let html = format!(
            r#"<html><head><title></title></head><body>
            <div class="entry-content"><p>{}</p></div></body></html>"#,
            "Plenty of article body text here. ".repeat(5)
        );
        let (pipeline, store) = pipeline_with(vec![(url, StubResponse::Page(html))]);

        let summary = pipeline.run(&[url.to_string()]).await;
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 1);

        let stored = store.get(url).await.unwrap().expect("failed record stored");
        assert_eq!(stored.status, ArticleStatus::Failed);
        assert!(stored
            .error_message
            .unwrap()
            .contains("extraction incomplete"));
    }

    #[tokio::test]
    async fn test_counts_always_balance() {
        let ok = "https://news.example.com/ok";
        let gone = "https://news.example.com/gone";
        let slow = "https://news.example.com/slow";
        let (pipeline, _store) = pipeline_with(vec![
            (ok, StubResponse::Page(article_html())),
            (gone, StubResponse::Status(404)),
            (slow, StubResponse::Timeout),
        ]);

        let urls = vec![ok.to_string(), gone.to_string(), slow.to_string()];
        let summary = pipeline.run(&urls).await;
        assert_eq!(summary.total, 3);
        assert_eq!(
            summary.successful + summary.failed + summary.skipped,
            summary.total
        );
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 2);
    }

    #[tokio::test]
    async fn test_skipped_urls_are_not_fetched_or_rewritten() {
        let url = "https://news.example.com/known";
        // Fetcher knows nothing about the URL; a fetch attempt would fail.
        let (pipeline, store) = pipeline_with(vec![]);
        store
            .insert(&Article::failed(url, "previous run failure", Utc::now()))
            .await
            .unwrap();

        let summary = pipeline.run(&[url.to_string()]).await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);

        let stored = store.get(url).await.unwrap().expect("record kept");
        assert_eq!(
            stored.error_message.as_deref(),
            Some("previous run failure")
        );
    }
}
