// src/source.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::{
    fmt, fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 200;

/// Where the catalog CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Url(Url),
    File(PathBuf),
}

impl Source {
    /// `-` is stdin, `http(s)://` is a URL, everything else a path.
    pub fn parse(arg: &str) -> Result<Self> {
        if arg == "-" {
            return Ok(Source::Stdin);
        }
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(arg).with_context(|| format!("invalid URL {}", arg))?;
            return Ok(Source::Url(url));
        }
        Ok(Source::File(PathBuf::from(arg)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::Url(u) => write!(f, "{}", u),
            Source::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Read the whole CSV text behind `source`, dropping a leading BOM.
pub async fn load(client: &Client, source: &Source) -> Result<String> {
    let text = match source {
        Source::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading CSV from stdin")?;
            buf
        }
        Source::File(path) => fs::read_to_string(path)
            .with_context(|| format!("reading CSV {}", path.display()))?,
        Source::Url(url) => get_text_with_retry(client, url, MAX_RETRIES, INITIAL_BACKOFF_MS).await?,
    };
    info!(source = %source, bytes = text.len(), "loaded catalog");
    Ok(strip_bom(text))
}

pub fn read_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading CSV {}", path.display()))?;
    Ok(strip_bom(text))
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

async fn get_text_core(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

async fn get_text_with_retry(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff_ms: u64,
) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_core(client, url).await {
            Ok(t) => return Ok(t),
            Err(e) if attempts < max_retries => {
                attempts += 1;
                let backoff = initial_backoff_ms * 2u64.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                error!(%url, error = %e, "Exhausted retries");
                return Err(e);
            }
        }
    }
}
