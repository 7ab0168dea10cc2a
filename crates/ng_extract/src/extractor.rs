use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use ng_core::types::Extraction;

use crate::dates::DateNormalizer;
use crate::profiles::{self, ExtractionProfile};

/// Sentinel title for documents where every cascade came up empty. The
/// pipeline treats it as an extraction failure.
pub const MISSING_TITLE: &str = "(no title)";

/// Titles shorter than this are assumed to be navigation labels, not headlines.
const MIN_TITLE_CHARS: usize = 10;

/// Plain-text candidates at or below this length are rejected as boilerplate;
/// the pipeline applies the same bound when validating a Success.
pub const MIN_TEXT_CHARS: usize = 50;

/// Subtrees never considered article content.
const STRIP_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Class names marking ad, share and comment containers.
const STRIP_CLASSES: &[&str] = &["ads", "advertisement", "social-share", "comments"];

/// Pulls title, content block, plain text and publication date out of a
/// parsed document using the profile matching the source host. Stateless per
/// call; the document is only ever read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleExtractor {
    dates: DateNormalizer,
}

impl ArticleExtractor {
    pub fn new() -> Self {
        Self {
            dates: DateNormalizer::new(),
        }
    }

    pub fn extract(&self, document: &Html, url: &str, now: DateTime<Utc>) -> Extraction {
        let profile = profiles::profile_for(url);
        Extraction {
            title: self.extract_title(document, profile),
            content_html: self.extract_content(document, profile),
            plain_text: self.extract_plain_text(document, profile),
            published_at: self.extract_published_date(document, profile, now),
        }
    }

    /// First cascade hit whose trimmed text is long enough to be a headline;
    /// then the document `<title>`; then the sentinel.
    fn extract_title(&self, document: &Html, profile: &ExtractionProfile) -> String {
        for selector in profile.title_selectors {
            let Ok(parsed) = Selector::parse(selector) else {
                continue;
            };
            if let Some(element) = document.select(&parsed).next() {
                let title = element.text().collect::<String>().trim().to_string();
                if title.chars().count() > MIN_TITLE_CHARS {
                    return title;
                }
            }
        }

        if let Ok(title_tag) = Selector::parse("title") {
            if let Some(element) = document.select(&title_tag).next() {
                return element.text().collect::<String>().trim().to_string();
            }
        }

        MISSING_TITLE.to_string()
    }

    /// First cascade hit serialized as-is, structure retained for archival.
    fn extract_content(&self, document: &Html, profile: &ExtractionProfile) -> String {
        for selector in profile.content_selectors {
            let Ok(parsed) = Selector::parse(selector) else {
                continue;
            };
            if let Some(element) = document.select(&parsed).next() {
                return element.html();
            }
        }

        if let Ok(body) = Selector::parse("body") {
            if let Some(element) = document.select(&body).next() {
                return element.html();
            }
        }

        String::new()
    }

    /// Same cascade as the content block, but text-only with non-content
    /// subtrees skipped. Falls back to a whole-body pass, then empty.
    fn extract_plain_text(&self, document: &Html, profile: &ExtractionProfile) -> String {
        for selector in profile.text_selectors {
            let Ok(parsed) = Selector::parse(selector) else {
                continue;
            };
            if let Some(element) = document.select(&parsed).next() {
                let text = text_without_chrome(element, true);
                if text.chars().count() > MIN_TEXT_CHARS {
                    return text;
                }
            }
        }

        if let Ok(body) = Selector::parse("body") {
            if let Some(element) = document.select(&body).next() {
                let text = text_without_chrome(element, false);
                if text.chars().count() > MIN_TEXT_CHARS {
                    return text;
                }
            }
        }

        String::new()
    }

    /// Machine-readable `datetime` attributes beat visible text, visible text
    /// beats metadata tags. A candidate only counts if it normalizes to
    /// something other than the no-match sentinel; when every candidate
    /// degenerates, the sentinel is accepted as the published date.
    fn extract_published_date(
        &self,
        document: &Html,
        profile: &ExtractionProfile,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let fallback = self.dates.fallback(now);

        for selector in profile.date_selectors {
            let Ok(parsed) = Selector::parse(selector) else {
                continue;
            };
            if let Some(element) = document.select(&parsed).next() {
                if let Some(attr) = element.value().attr("datetime") {
                    let parsed_date = self.dates.normalize(attr, now);
                    if parsed_date != fallback {
                        return parsed_date;
                    }
                }
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    let parsed_date = self.dates.normalize(&text, now);
                    if parsed_date != fallback {
                        return parsed_date;
                    }
                }
            }
        }

        for selector in profile.meta_date_selectors {
            let Ok(parsed) = Selector::parse(selector) else {
                continue;
            };
            if let Some(element) = document.select(&parsed).next() {
                if let Some(content) = element.value().attr("content") {
                    let parsed_date = self.dates.normalize(content, now);
                    if parsed_date != fallback {
                        return parsed_date;
                    }
                }
            }
        }

        debug!("no publication date found, using start of day");
        fallback
    }
}

fn is_stripped(element: &ElementRef<'_>, strip_classes: bool) -> bool {
    let value = element.value();
    if STRIP_TAGS.contains(&value.name()) {
        return true;
    }
    strip_classes && value.classes().any(|class| STRIP_CLASSES.contains(&class))
}

/// Whitespace-joined text of a subtree, skipping stripped subtrees entirely.
/// A read-only walk: the source tree is never modified.
fn text_without_chrome(element: ElementRef<'_>, strip_classes: bool) -> String {
    let mut pieces = Vec::new();
    collect_text(element, strip_classes, &mut pieces);
    pieces.join(" ")
}

fn collect_text(element: ElementRef<'_>, strip_classes: bool, out: &mut Vec<String>) {
    for node in element.children() {
        match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(node) {
                    if !is_stripped(&child, strip_classes) {
                        collect_text(child, strip_classes, out);
                    }
                }
            }
            _ => {}
        }
    }
}
