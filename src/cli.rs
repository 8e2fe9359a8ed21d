//! Command-line interface definitions.
//!
//! Every option is backed by an environment variable so the service
//! can be configured entirely through its deployment environment.

use clap::Parser;

use crate::request::ProxyConfig;

/// Command-line arguments for the Forbes newsfeed collector.
///
/// # Examples
///
/// ```sh
/// # One immediate run, no proxy
/// forbes_newsfeed --once -o ./news_articles.json
///
/// # Scheduled service behind an authenticated proxy
/// PROXY_HOST=proxy.internal PROXY_PORT=3128 \
/// PROXY_USER=collector PROXY_PASS=secret \
/// forbes_newsfeed --parsing-interval 60
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Service name used to tag log records
    #[arg(long, env = "SERVICE_NAME", default_value = "forbes_newsfeed")]
    pub service_name: String,

    /// Maximum number of attempts for a failed request
    #[arg(long, env = "MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,

    /// Seconds to wait before every request attempt
    #[arg(long, env = "RETRY_DELAY", default_value_t = 5)]
    pub retry_delay: u64,

    /// Minutes between scheduled runs
    #[arg(long, env = "PARSING_INTERVAL", default_value_t = 60)]
    pub parsing_interval: u64,

    /// Output file for the aggregated articles
    #[arg(short, long, env = "OUTPUT_FILE", default_value = "news_articles.json")]
    pub output_file: String,

    /// Optional JSON file mapping tag names to listing URLs
    #[arg(short, long, env = "TAGS_FILE")]
    pub tags_file: Option<String>,

    /// Forward proxy host
    #[arg(long, env = "PROXY_HOST")]
    pub proxy_host: Option<String>,

    /// Forward proxy port
    #[arg(long, env = "PROXY_PORT")]
    pub proxy_port: Option<u16>,

    /// Forward proxy username
    #[arg(long, env = "PROXY_USER")]
    pub proxy_user: Option<String>,

    /// Forward proxy password
    #[arg(long, env = "PROXY_PASS")]
    pub proxy_pass: Option<String>,

    /// Run the pipeline once and exit instead of scheduling
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Proxy settings, when both host and port are configured.
    pub fn proxy(&self) -> Option<ProxyConfig> {
        match (self.proxy_host.as_ref(), self.proxy_port) {
            (Some(host), Some(port)) => Some(ProxyConfig {
                host: host.clone(),
                port,
                user: self.proxy_user.clone(),
                pass: self.proxy_pass.clone(),
            }),
            _ => None,
        }
    }
}
