use url::Url;

/// A named bundle of selector cascades tuned to one class of site markup.
/// Lists are ordered: the first selector yielding a qualifying match wins.
#[derive(Debug)]
pub struct ExtractionProfile {
    pub name: &'static str,
    /// Substrings matched against the source URL's host.
    host_patterns: &'static [&'static str],
    pub title_selectors: &'static [&'static str],
    /// Cascade for the archival HTML block.
    pub content_selectors: &'static [&'static str],
    /// Cascade for plain text; the whole-body fallback is applied separately.
    pub text_selectors: &'static [&'static str],
    pub date_selectors: &'static [&'static str],
    pub meta_date_selectors: &'static [&'static str],
}

impl ExtractionProfile {
    pub fn matches(&self, host: &str) -> bool {
        self.host_patterns.iter().any(|pattern| host.contains(pattern))
    }
}

const TITLE_SELECTORS: &[&str] = &[
    "h1.entry-title",
    "h1.post-title",
    "h1.article-title",
    "h1.news-title",
    ".entry-header h1",
    ".post-header h1",
    ".article-header h1",
    "h1",
    ".title h1",
    "title",
];

const DATE_SELECTORS: &[&str] = &[
    "time[datetime]",
    ".published-date",
    ".article-date",
    ".post-date",
    ".news-date",
    ".entry-date",
    ".date",
    r#"[class*="date"]"#,
    r#"[class*="time"]"#,
];

const META_DATE_SELECTORS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="date"]"#,
    r#"meta[name="pubdate"]"#,
    r#"meta[property="og:article:published_time"]"#,
];

/// Static-site blogs with a bare `<main>` wrapper and no CMS classes.
static MINIMAL_BLOG: ExtractionProfile = ExtractionProfile {
    name: "minimal-blog",
    host_patterns: &["take-group.github.io"],
    title_selectors: TITLE_SELECTORS,
    content_selectors: &[
        "main",
        ".main-content",
        ".post-content",
        ".content",
        "article",
        ".entry-content",
        "body",
    ],
    text_selectors: &[
        "main",
        ".main-content",
        ".post-content",
        ".content",
        "article",
        ".entry-content",
    ],
    date_selectors: DATE_SELECTORS,
    meta_date_selectors: META_DATE_SELECTORS,
};

/// Generic news-site markup (WordPress-style class conventions).
static NEWS: ExtractionProfile = ExtractionProfile {
    name: "news",
    host_patterns: &[],
    title_selectors: TITLE_SELECTORS,
    content_selectors: &[
        ".entry-content",
        ".post-content",
        ".article-content",
        ".news-content",
        ".content",
        "article",
        ".article-body",
        ".post-body",
        "main",
    ],
    text_selectors: &[
        ".entry-content",
        ".post-content",
        ".article-content",
        ".news-content",
        ".content",
        "article",
        ".article-body",
        ".post-body",
        "main",
    ],
    date_selectors: DATE_SELECTORS,
    meta_date_selectors: META_DATE_SELECTORS,
};

/// Host-specific profiles in priority order. Adding a site means adding an
/// entry here; the extractor itself stays untouched.
static PROFILES: &[&ExtractionProfile] = &[&MINIMAL_BLOG];

/// Picks the first profile whose host patterns match the URL; falls back to
/// the generic news profile for unknown hosts (and unparseable URLs).
pub fn profile_for(url: &str) -> &'static ExtractionProfile {
    let host = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_default();

    PROFILES
        .iter()
        .find(|profile| profile.matches(&host))
        .copied()
        .unwrap_or(&NEWS)
}
