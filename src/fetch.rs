use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::settings::Settings;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([a-zA-Z0-9][a-zA-Z0-9_-]*)/?(?:[?#].*)?$").unwrap());

/// Raw markup of one facility page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; this is what page results report.
    pub url: String,
    pub body: String,
    pub latency_ms: u64,
}

/// Outcome of fetching one configured URL.
pub struct FetchOutcome {
    pub requested: String,
    pub result: Result<FetchedPage>,
}

/// Last path segment of a facility URL, e.g. `walter-baker-sports-centre`.
pub fn slug(url: &str) -> &str {
    SLUG_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(url)
}

/// Fetch every configured URL concurrently. Outcomes come back in the
/// configured order regardless of completion order.
pub async fn fetch_all(settings: &Settings) -> Result<Vec<FetchOutcome>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;
    let semaphore = Arc::new(Semaphore::new(settings.concurrency));
    let total = settings.facility_urls.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, FetchOutcome)>(total.max(1));

    for (idx, url) in settings.facility_urls.iter().cloned().enumerate() {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let max_retries = settings.max_retries;
        let backoff_ms = settings.backoff_ms;

        tokio::spawn(async move {
            let result = match sem.acquire().await {
                Ok(_permit) => fetch_with_retry(&client, &url, max_retries, backoff_ms).await,
                Err(e) => Err(e.into()),
            };
            let _ = tx
                .send((idx, FetchOutcome { requested: url, result }))
                .await;
        });
    }

    drop(tx);

    let mut outcomes: Vec<Option<FetchOutcome>> = (0..total).map(|_| None).collect();
    while let Some((idx, outcome)) = rx.recv().await {
        pb.set_message(slug(&outcome.requested).to_string());
        pb.inc(1);
        outcomes[idx] = Some(outcome);
    }
    pb.finish_and_clear();

    let outcomes: Vec<FetchOutcome> = outcomes.into_iter().flatten().collect();
    let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!("Fetched {} pages ({} ok, {} errors)", total, ok, total - ok);
    Ok(outcomes)
}

/// Statuses worth another attempt after backing off.
pub fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
    backoff_ms: u64,
) -> Result<FetchedPage> {
    let mut attempt = 0;
    loop {
        let start = Instant::now();
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = response.status();

        if status.is_success() {
            let final_url = response.url().to_string();
            let body = response
                .text()
                .await
                .with_context(|| format!("Failed to read body of {}", url))?;
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!(url = %final_url, latency_ms, bytes = body.len(), "fetched");
            return Ok(FetchedPage {
                url: final_url,
                body,
                latency_ms,
            });
        }

        if !should_retry(status) || attempt == max_retries {
            bail!("GET {} returned {}", url, status);
        }

        let backoff = Duration::from_millis(backoff_ms * 2u64.pow(attempt));
        warn!(
            "{} on {} (attempt {}/{}), backing off {:.1}s",
            status,
            slug(url),
            attempt + 1,
            max_retries,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification() {
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(should_retry(StatusCode::BAD_GATEWAY));
        assert!(should_retry(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!should_retry(StatusCode::NOT_FOUND));
        assert!(!should_retry(StatusCode::FORBIDDEN));
    }

    #[test]
    fn slugs() {
        assert_eq!(
            slug("https://ottawa.ca/en/recreation-and-parks/facilities/place-listing/walter-baker-sports-centre"),
            "walter-baker-sports-centre"
        );
        assert_eq!(slug("https://example.test/pool/?week=2"), "pool");
        assert_eq!(slug("not a url"), "not a url");
    }
}
