//! Tag configuration: which Forbes tag feeds to scan.
//!
//! The scan list is static per deployment. A JSON file mapping tag
//! names to listing URLs can override the built-in set; file order
//! becomes the tag processing (and output) order.

use std::error::Error;

use serde_json::{Map, Value};
use tokio::fs;
use tracing::info;

/// The default tag feeds.
pub fn default_tags() -> Vec<(String, String)> {
    [
        ("biznes", "tegi%2Fbiznes"),
        ("milliardery", "tegi%2Fmilliardery"),
        ("finansy", "tegi%2Ffinansy"),
        ("tehnologii", "tegi%2Ftehnologii"),
        ("obshchestvo", "tegi%2Fobshchestvo"),
    ]
    .into_iter()
    .map(|(name, alias)| {
        (
            name.to_string(),
            format!("https://www.forbes.ru/api/pub/tag_newsfeed?url_alias={alias}"),
        )
    })
    .collect()
}

/// Load a tag mapping from a JSON file, preserving key order.
pub async fn load_tags(path: &str) -> Result<Vec<(String, String)>, Box<dyn Error + Send + Sync>> {
    let raw = fs::read_to_string(path).await?;
    let mapping: Map<String, Value> = serde_json::from_str(&raw)?;

    let mut tags = Vec::with_capacity(mapping.len());
    for (name, value) in mapping {
        let Some(tag_url) = value.as_str() else {
            return Err(format!("tag `{name}` must map to a listing URL string").into());
        };
        tags.push((name, tag_url.to_string()));
    }

    info!(%path, count = tags.len(), "Loaded tags file");
    Ok(tags)
}
