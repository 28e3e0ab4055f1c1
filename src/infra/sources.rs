//! Market data source boundary: the trait external providers implement and
//! the fan-in that joins them.
//!
//! One analysis request queries N independent sources; the join waits for
//! all of them, but each fetch runs under its own timeout and a slow or
//! failing source degrades to "no observations" with a recorded reason
//! instead of blocking or failing the request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::MarketObservation;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Missing or invalid credentials, detected at construction or first
    /// use. Distinct from runtime failures so callers can guide
    /// remediation differently.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// What to look comps up by. Providers use whichever fields they index.
#[derive(Clone, Debug, Default)]
pub struct MarketQuery {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
}

impl MarketQuery {
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One external market data provider. Absence of data is an empty vec,
/// not an error.
#[async_trait]
pub trait MarketSource: Send + Sync {
    fn name(&self) -> &str;

    async fn observations(
        &self,
        query: &MarketQuery,
    ) -> Result<Vec<MarketObservation>, SourceError>;
}

/// Joined output of one fan-in: merged observations plus a reason string
/// per source that produced none.
#[derive(Clone, Debug, Default)]
pub struct FanInResult {
    pub observations: Vec<MarketObservation>,
    pub failures: Vec<String>,
}

/// Default per-source budget before a fetch is abandoned.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(8);

/// Queries every source concurrently and joins the results. Each fetch is
/// capped at `per_source_timeout`; a timed-out source contributes no
/// observations. The call itself never fails.
pub async fn fetch_all_sources(
    sources: &[Arc<dyn MarketSource>],
    query: &MarketQuery,
    per_source_timeout: Duration,
) -> FanInResult {
    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        let source = source.clone();
        let query = query.clone();
        handles.push(tokio::spawn(async move {
            let name = source.name().to_string();
            let outcome =
                tokio::time::timeout(per_source_timeout, source.observations(&query)).await;
            match outcome {
                Ok(Ok(observations)) => (name, Ok(observations)),
                Ok(Err(error)) => (name, Err(error.to_string())),
                Err(_) => (name, Err(SourceError::Timeout(per_source_timeout).to_string())),
            }
        }));
    }

    let mut result = FanInResult::default();
    for handle in handles {
        match handle.await {
            Ok((name, Ok(observations))) => {
                println!(
                    "[market] {name}: {} observation(s)",
                    observations.len()
                );
                result.observations.extend(observations);
            }
            Ok((name, Err(reason))) => {
                println!("[market] {name}: {reason}");
                result.failures.push(format!("{name}: {reason}"));
            }
            Err(join_error) => {
                println!("[market] source task failed: {join_error}");
                result.failures.push(format!("source task failed: {join_error}"));
            }
        }
    }
    result
}

/// Pacing for multi-item batches, to respect third-party quotas. A policy
/// knob, not a correctness requirement.
#[derive(Clone, Copy, Debug)]
pub struct BatchOptions {
    pub delay_between_items: Duration,
    pub per_source_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay_between_items: Duration::from_millis(500),
            per_source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }
}

/// Fans in market data for a batch of queries, pausing between items.
pub async fn fetch_batch(
    sources: &[Arc<dyn MarketSource>],
    queries: &[MarketQuery],
    options: BatchOptions,
) -> Vec<FanInResult> {
    let mut results = Vec::with_capacity(queries.len());
    for (index, query) in queries.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(options.delay_between_items).await;
        }
        println!(
            "[batch] {}/{}: fetching comps for {}",
            index + 1,
            queries.len(),
            query.name
        );
        results.push(fetch_all_sources(sources, query, options.per_source_timeout).await);
    }
    results
}
