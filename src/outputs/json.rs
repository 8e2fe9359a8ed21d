//! JSON artifact writer.
//!
//! Each run overwrites a single file with the full tag → articles
//! mapping: pretty-printed UTF-8 with non-ASCII text kept literal, so
//! the (mostly Cyrillic) article text stays readable in the file.

use std::error::Error;

use serde_json::{Map, Value};
use tokio::fs;
use tracing::info;

use crate::pipeline::RunReport;

/// Serialize the run's tag mapping and overwrite `path`.
///
/// Tag order in the file follows the report's (i.e. configuration)
/// order.
pub async fn write_articles(report: &RunReport, path: &str) -> Result<(), Box<dyn Error>> {
    let mut mapping = Map::new();
    for (tag_name, records) in &report.articles {
        mapping.insert(tag_name.clone(), serde_json::to_value(records)?);
    }

    let json = serde_json::to_string_pretty(&Value::Object(mapping))?;
    fs::write(path, json).await?;
    info!(%path, articles = report.articles_fetched, "Wrote news articles file");

    Ok(())
}
