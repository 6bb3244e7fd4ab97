use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by remote table sources. Non-2xx statuses are returned as
/// responses; only transport failures are errors.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &Url) -> anyhow::Result<FetchResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpFetch {
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build sheets http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn get(&self, url: &Url) -> anyhow::Result<FetchResponse> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, "scrollystory/0.1")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {}", redact_key(url)))?;

        let status = response.status().as_u16();
        let body = response.text().await.context("read response body")?;
        Ok(FetchResponse { status, body })
    }
}

/// Copy of `url` safe to log: the `key` query value is masked.
pub fn redact_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted;
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}
