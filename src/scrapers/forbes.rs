//! Forbes publishing-API client.
//!
//! Two endpoints are consumed, both read-only:
//!
//! - tag listing: `{ articles: [ { title, subtitle, url_alias, time }, ... ] }`
//! - article detail: `{ body: [ { type, data: { text } }, ... ] }`
//!
//! The detail endpoint is addressed by the article's URL alias, i.e.
//! its canonical URL with the site prefix stripped.

use serde_json::Value;
use tracing::error;

use crate::clean::clean_text;
use crate::models::{ArticleSummary, Extracted};
use crate::request::{FetchJson, RetryExecutor};
use crate::utils::format_unix_timestamp;

/// Site prefix used to build canonical URLs and derive aliases.
pub const SITE_BASE: &str = "https://www.forbes.ru/";
/// Detail endpoint; takes the alias as the `url_alias` query parameter.
pub const ARTICLE_API: &str = "https://www.forbes.ru/api/pub/article";

/// Forbes API client over a retrying transport.
#[derive(Debug)]
pub struct ForbesApi<T> {
    executor: RetryExecutor<T>,
}

impl<T: FetchJson> ForbesApi<T> {
    pub fn new(executor: RetryExecutor<T>) -> Self {
        Self { executor }
    }

    /// Fetch one tag's listing and extract per-article summaries.
    ///
    /// An empty executor result (retry exhaustion) yields an empty,
    /// complete listing. A malformed entry stops extraction at that
    /// entry; summaries gathered before it are kept and the result is
    /// marked partial.
    pub async fn tag_listing(&self, tag_url: &str) -> Extracted<Vec<ArticleSummary>> {
        let Some(response) = self.executor.execute(tag_url).await else {
            return Extracted::Complete(Vec::new());
        };
        summaries_from_listing(&response)
    }

    /// Fetch an article's full body text, cleaned.
    ///
    /// Returns the empty string when the executor came back empty, and
    /// a partial accumulator when the body structure does not match
    /// expectations. Body extraction never fails the caller.
    pub async fn article_text(&self, article_url: &str) -> Extracted<String> {
        let alias = article_url.strip_prefix(SITE_BASE).unwrap_or(article_url);
        let detail_url = format!("{ARTICLE_API}?url_alias={alias}");

        let Some(response) = self.executor.execute(&detail_url).await else {
            return Extracted::Complete(String::new());
        };
        text_from_body(&response)
    }
}

/// Short human label for a tag listing URL, for log lines.
///
/// Tag URLs carry the tag alias percent-encoded, e.g.
/// `...?url_alias=tegi%2Fbiznes` labels as `biznes`.
pub fn tag_label(tag_url: &str) -> String {
    let Some(tail) = tag_url.split("%2F").nth(1) else {
        return tag_url.to_string();
    };
    let tail = tail.split('&').next().unwrap_or(tail);
    urlencoding::decode(tail)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| tail.to_string())
}

fn summaries_from_listing(response: &Value) -> Extracted<Vec<ArticleSummary>> {
    let mut summaries = Vec::new();

    let Some(articles) = response.get("articles").and_then(Value::as_array) else {
        error!(
            key = "articles",
            "Failed to get articles info. Response structure has changed."
        );
        return Extracted::Partial(summaries);
    };

    for entry in articles {
        match summary_from_entry(entry) {
            Ok(summary) => summaries.push(summary),
            Err(key) => {
                error!(key, "Failed to get articles info. Response structure has changed.");
                return Extracted::Partial(summaries);
            }
        }
    }

    Extracted::Complete(summaries)
}

fn summary_from_entry(entry: &Value) -> Result<ArticleSummary, &'static str> {
    let title = entry.get("title").and_then(Value::as_str).ok_or("title")?;
    let subtitle = entry.get("subtitle").and_then(Value::as_str).ok_or("subtitle")?;
    let url_alias = entry.get("url_alias").and_then(Value::as_str).ok_or("url_alias")?;
    let time = entry.get("time").and_then(Value::as_i64).ok_or("time")?;

    Ok(ArticleSummary {
        title: title.to_string(),
        description: subtitle.to_string(),
        url: format!("{SITE_BASE}{url_alias}"),
        publish_date: format_unix_timestamp(time),
    })
}

fn text_from_body(response: &Value) -> Extracted<String> {
    let mut text = String::new();

    let Some(body) = response.get("body").and_then(Value::as_array) else {
        error!(
            key = "body",
            "Failed to get article text. Response structure has changed."
        );
        return Extracted::Partial(text);
    };

    for block in body {
        let Some(block_type) = block.get("type").and_then(Value::as_str) else {
            error!(
                key = "type",
                "Failed to get article text. Response structure has changed."
            );
            return Extracted::Partial(text.trim().to_string());
        };
        if block_type != "paragraph" {
            continue;
        }
        let Some(raw) = block.pointer("/data/text").and_then(Value::as_str) else {
            error!(
                key = "data.text",
                "Failed to get article text. Response structure has changed."
            );
            return Extracted::Partial(text.trim().to_string());
        };
        text.push_str(&clean_text(raw));
        text.push(' ');
    }

    Extracted::Complete(text.trim().to_string())
}
