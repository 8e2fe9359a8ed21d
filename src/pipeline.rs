//! Tag-by-tag aggregation of listings into full article records.
//!
//! One run walks the configured tags in order, fetches each tag's
//! listing, enriches every not-yet-seen article with its body text, and
//! groups the results by tag name. A run-scoped set of seen URLs
//! deduplicates articles globally: a URL listed under several tags is
//! kept only under the first tag processed.

use std::collections::HashSet;

use tracing::info;

use crate::models::ArticleRecord;
use crate::request::FetchJson;
use crate::scrapers::forbes::{ForbesApi, tag_label};

/// Outcome of one pipeline run.
///
/// `articles` keeps the tag insertion order; every configured tag is
/// present, with an empty list when its listing produced nothing. The
/// counters let callers and tests observe degraded runs without
/// parsing log output.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Tag name → records, in configuration order.
    pub articles: Vec<(String, Vec<ArticleRecord>)>,
    /// Records assembled across all tags.
    pub articles_fetched: usize,
    /// Listing entries dropped because their URL was already seen.
    pub duplicates_skipped: usize,
    /// Response-schema mismatches hit across listings and bodies.
    pub mismatches: usize,
}

/// Sequential fetch-clean-assemble pipeline over the Forbes API.
///
/// Tags and the articles within them are processed strictly one at a
/// time; the executor's pre-attempt delay therefore bounds the overall
/// request rate against the site.
#[derive(Debug)]
pub struct Pipeline<T> {
    api: ForbesApi<T>,
}

impl<T: FetchJson> Pipeline<T> {
    pub fn new(api: ForbesApi<T>) -> Self {
        Self { api }
    }

    /// Run the pipeline over `tags` (name → listing URL pairs).
    ///
    /// Never fails for upstream-data reasons: transport faults and
    /// schema mismatches surface as empty text, truncated listings,
    /// and counters on the report.
    pub async fn run(&self, tags: &[(String, String)]) -> RunReport {
        info!("Start parsing articles from Forbes");

        let mut report = RunReport::default();
        let mut seen_urls: HashSet<String> = HashSet::new();

        for (tag_name, tag_url) in tags {
            info!(tag = %tag_name, label = %tag_label(tag_url), "Start parsing news from tag");

            let listing = self.api.tag_listing(tag_url).await;
            if listing.is_partial() {
                report.mismatches += 1;
            }

            let mut records = Vec::new();
            for summary in listing.into_inner() {
                if !seen_urls.insert(summary.url.clone()) {
                    report.duplicates_skipped += 1;
                    continue;
                }

                let extracted = self.api.article_text(&summary.url).await;
                if extracted.is_partial() {
                    report.mismatches += 1;
                }

                records.push(ArticleRecord::from_summary(summary, extracted.into_inner()));
                report.articles_fetched += 1;
            }

            info!(tag = %tag_name, count = records.len(), "Finish parsing news from tag");
            report.articles.push((tag_name.clone(), records));
        }

        info!(
            articles = report.articles_fetched,
            duplicates_skipped = report.duplicates_skipped,
            mismatches = report.mismatches,
            "Finish parsing articles from Forbes"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{FetchError, RetryExecutor, RetryPolicy};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::time::Duration;

    struct CannedFetch {
        responses: HashMap<String, Value>,
    }

    impl FetchJson for CannedFetch {
        async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| format!("no canned response for {url}").into())
        }
    }

    fn pipeline(responses: Vec<(String, Value)>) -> Pipeline<CannedFetch> {
        let transport = CannedFetch {
            responses: responses.into_iter().collect(),
        };
        let policy = RetryPolicy::new(1, Duration::ZERO);
        Pipeline::new(ForbesApi::new(RetryExecutor::new(transport, policy)))
    }

    fn url(s: &str) -> String {
        s.to_string()
    }

    fn listing_entry(alias: &str) -> Value {
        json!({
            "title": format!("Title {alias}"),
            "subtitle": format!("Subtitle {alias}"),
            "url_alias": alias,
            "time": 1_709_290_200,
        })
    }

    fn detail_url(alias: &str) -> String {
        format!("https://www.forbes.ru/api/pub/article?url_alias={alias}")
    }

    fn paragraph_body(text: &str) -> Value {
        json!({"body": [{"type": "paragraph", "data": {"text": text}}]})
    }

    fn tags(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, url)| (name.to_string(), url.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_end_to_end_with_shared_url() {
        // Two tags, two listing entries each, one URL listed under both.
        let pipeline = pipeline(vec![
            (
                url("https://tag.test/biznes"),
                json!({"articles": [listing_entry("biznes/1-a"), listing_entry("shared/9-x")]}),
            ),
            (
                url("https://tag.test/finansy"),
                json!({"articles": [listing_entry("shared/9-x"), listing_entry("finansy/2-b")]}),
            ),
            (detail_url("biznes/1-a"), paragraph_body("<b>A</b>")),
            (detail_url("shared/9-x"), paragraph_body("X")),
            (detail_url("finansy/2-b"), paragraph_body("B")),
        ]);

        let report = pipeline
            .run(&tags(&[
                ("biznes", "https://tag.test/biznes"),
                ("finansy", "https://tag.test/finansy"),
            ]))
            .await;

        assert_eq!(report.articles.len(), 2);
        let (first_tag, first_records) = &report.articles[0];
        let (second_tag, second_records) = &report.articles[1];
        assert_eq!(first_tag, "biznes");
        assert_eq!(first_records.len(), 2);
        assert_eq!(second_tag, "finansy");
        assert_eq!(second_records.len(), 1);

        // The shared URL stays under the first-processed tag only.
        assert_eq!(first_records[1].url, "https://www.forbes.ru/shared/9-x");
        assert_eq!(second_records[0].url, "https://www.forbes.ru/finansy/2-b");
        assert_eq!(report.duplicates_skipped, 1);
        assert_eq!(report.articles_fetched, 3);
        assert_eq!(report.mismatches, 0);

        // Texts were fetched and cleaned.
        assert_eq!(first_records[0].text, "A");
        assert_eq!(second_records[0].text, "B");
    }

    #[tokio::test]
    async fn test_every_url_appears_once_across_output() {
        let pipeline = pipeline(vec![
            (
                url("https://tag.test/one"),
                json!({"articles": [listing_entry("a/1"), listing_entry("b/2")]}),
            ),
            (
                url("https://tag.test/two"),
                json!({"articles": [listing_entry("b/2"), listing_entry("a/1")]}),
            ),
            (detail_url("a/1"), paragraph_body("a")),
            (detail_url("b/2"), paragraph_body("b")),
        ]);

        let report = pipeline
            .run(&tags(&[
                ("one", "https://tag.test/one"),
                ("two", "https://tag.test/two"),
            ]))
            .await;

        let mut all_urls: Vec<&str> = report
            .articles
            .iter()
            .flat_map(|(_, records)| records.iter().map(|r| r.url.as_str()))
            .collect();
        let total = all_urls.len();
        all_urls.sort_unstable();
        all_urls.dedup();
        assert_eq!(all_urls.len(), total);
        assert_eq!(total, report.articles_fetched);
    }

    #[tokio::test]
    async fn test_malformed_listing_does_not_affect_sibling_tag() {
        let pipeline = pipeline(vec![
            (
                url("https://tag.test/broken"),
                json!({"articles": [{"title": "no alias", "subtitle": "s", "time": 1}]}),
            ),
            (
                url("https://tag.test/healthy"),
                json!({"articles": [listing_entry("ok/1")]}),
            ),
            (detail_url("ok/1"), paragraph_body("fine")),
        ]);

        let report = pipeline
            .run(&tags(&[
                ("broken", "https://tag.test/broken"),
                ("healthy", "https://tag.test/healthy"),
            ]))
            .await;

        assert_eq!(report.articles[0].1.len(), 0);
        assert_eq!(report.articles[1].1.len(), 1);
        assert_eq!(report.mismatches, 1);
    }

    #[tokio::test]
    async fn test_failed_body_extraction_keeps_record_with_empty_text() {
        // Detail response is missing entirely: the executor exhausts
        // its retries and the record is kept with empty text.
        let pipeline = pipeline(vec![(
            url("https://tag.test/solo"),
            json!({"articles": [listing_entry("solo/1")]}),
        )]);

        let report = pipeline
            .run(&tags(&[("solo", "https://tag.test/solo")]))
            .await;

        assert_eq!(report.articles[0].1.len(), 1);
        assert_eq!(report.articles[0].1[0].text, "");
        assert_eq!(report.mismatches, 0);
    }

    #[tokio::test]
    async fn test_unreachable_listing_yields_empty_tag() {
        let pipeline = pipeline(Vec::new());

        let report = pipeline
            .run(&tags(&[("gone", "https://tag.test/gone")]))
            .await;

        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].0, "gone");
        assert!(report.articles[0].1.is_empty());
        assert_eq!(report.articles_fetched, 0);
    }
}
