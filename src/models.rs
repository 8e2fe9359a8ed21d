//! Data models for collected articles.
//!
//! - [`ArticleSummary`]: listing-level metadata for one article
//! - [`ArticleRecord`]: a summary enriched with the cleaned body text;
//!   the shape written to the output file
//! - [`Extracted`]: distinguishes results that survived a response-schema
//!   mismatch from fully extracted ones

use serde::{Deserialize, Serialize};

/// Listing-level metadata for one article, produced from a single entry
/// of a tag listing response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleSummary {
    /// The article headline.
    pub title: String,
    /// The article subtitle, used as the description.
    pub description: String,
    /// Canonical absolute URL; the dedup key across a whole run.
    pub url: String,
    /// Publish timestamp formatted as `YYYY-MM-DD HH:MM:SS` local time.
    pub publish_date: String,
}

/// A fully assembled article as written to the output dataset.
///
/// `text` is the empty string, never absent, when body extraction
/// produced no data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: String,
    pub url: String,
    pub publish_date: String,
    /// Cleaned full body text.
    pub text: String,
}

impl ArticleRecord {
    pub fn from_summary(summary: ArticleSummary, text: String) -> Self {
        Self {
            title: summary.title,
            description: summary.description,
            url: summary.url,
            publish_date: summary.publish_date,
            text,
        }
    }
}

/// Result of extracting structured data from an upstream response.
///
/// `Partial` carries whatever was accumulated before a response-schema
/// mismatch was hit. Extraction never fails outright: a mismatch is
/// logged where it is detected and the pipeline keeps going, but the
/// variant lets callers count mismatches instead of parsing log output.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    /// The response matched the expected schema end to end.
    Complete(T),
    /// A schema mismatch cut extraction short; the payload holds the
    /// data gathered up to that point.
    Partial(T),
}

impl<T> Extracted<T> {
    pub fn is_partial(&self) -> bool {
        matches!(self, Extracted::Partial(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Extracted::Complete(value) | Extracted::Partial(value) => value,
        }
    }
}
