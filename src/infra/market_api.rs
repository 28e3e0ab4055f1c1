//! Thin asynchronous client for a JSON comps/listings API.
//!
//! - Maps provider listings to [`MarketObservation`]s behind the
//!   [`MarketSource`] trait.
//! - Maintains a simple in-memory cache with stale fallbacks so a flaky
//!   provider degrades to cached data instead of an empty result.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::domain::MarketObservation;
use crate::infra::sources::{MarketQuery, MarketSource, SourceError};

const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);
const USER_AGENT: &str = "resale-scanner/1.0.0";

/// Sold-listings client for one provider endpoint.
///
/// The provider's exact wire format is not part of the core contract; the
/// envelope below is the shape this client understands and everything else
/// stays opaque.
pub struct HttpMarketSource {
    name: String,
    http: Client,
    base_url: Url,
    api_key: String,
    cache: Arc<Mutex<HashMap<String, Cached<Vec<MarketObservation>>>>>,
    ttl: Duration,
}

impl HttpMarketSource {
    /// Fails fast with a configuration error when the API key is absent,
    /// so the caller can distinguish setup problems from market failures.
    pub fn new(
        name: impl Into<String>,
        base: &str,
        api_key: Option<String>,
    ) -> Result<Self, SourceError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SourceError::Config("missing API key".to_string()))?;
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            name: name.into(),
            http,
            base_url,
            api_key,
            cache: Arc::new(Mutex::new(HashMap::new())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn cached(&self, key: &str) -> Option<Vec<MarketObservation>> {
        let cache = self.cache.lock().await;
        cache.get(key).and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_stale(&self, key: &str) -> Option<Vec<MarketObservation>> {
        let cache = self.cache.lock().await;
        cache.get(key).map(Cached::stale)
    }

    async fn store(&self, key: String, data: Vec<MarketObservation>) {
        let mut cache = self.cache.lock().await;
        cache.insert(key, Cached::new(data, SystemTime::now()));
    }

    fn listings_url(&self, query: &MarketQuery) -> Result<Url, SourceError> {
        let mut url = self.base_url.join("listings")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &query.name);
            if let Some(brand) = &query.brand {
                pairs.append_pair("brand", brand);
            }
            if let Some(barcode) = &query.barcode {
                pairs.append_pair("barcode", barcode);
            }
        }
        Ok(url)
    }

    async fn fetch(&self, query: &MarketQuery) -> Result<Vec<MarketObservation>, SourceError> {
        let url = self.listings_url(query)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;
        let envelope: ApiEnvelope<Vec<ListingDto>> = response.json().await?;

        let ApiEnvelope {
            status,
            http_code,
            data,
            message,
        } = envelope;

        if status.eq_ignore_ascii_case("ok") {
            let listings = data.ok_or_else(|| SourceError::Api("response missing data".into()))?;
            Ok(listings
                .into_iter()
                .filter_map(ListingDto::into_observation)
                .collect())
        } else {
            let reason = message.unwrap_or(status);
            Err(SourceError::Api(match http_code {
                Some(code) => format!("{reason} (http {code})"),
                None => reason,
            }))
        }
    }

    fn cache_key(query: &MarketQuery) -> String {
        format!(
            "{}|{}|{}",
            query.name.to_lowercase(),
            query.brand.as_deref().unwrap_or("").to_lowercase(),
            query.barcode.as_deref().unwrap_or("")
        )
    }
}

#[async_trait]
impl MarketSource for HttpMarketSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn observations(
        &self,
        query: &MarketQuery,
    ) -> Result<Vec<MarketObservation>, SourceError> {
        let key = Self::cache_key(query);
        if let Some(cached) = self.cached(&key).await {
            println!("[market] {}: serving cached comps for {}", self.name, query.name);
            return Ok(cached);
        }

        match self.fetch(query).await {
            Ok(observations) => {
                self.store(key, observations.clone()).await;
                Ok(observations)
            }
            Err(error) => {
                if let Some(stale) = self.cached_stale(&key).await {
                    println!(
                        "[market] {}: fetch failed ({error}); serving stale cache",
                        self.name
                    );
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    #[serde(default)]
    http_code: Option<u16>,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingDto {
    price: Option<f64>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    sold_at: Option<String>,
}

impl ListingDto {
    /// Listings without a finite positive price carry no signal and are
    /// dropped.
    fn into_observation(self) -> Option<MarketObservation> {
        let price = self.price.filter(|p| p.is_finite() && *p > 0.0)?;
        let observed_at = self
            .sold_at
            .as_deref()
            .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok());
        Some(MarketObservation {
            price,
            source_confidence: self.confidence.unwrap_or(0.7).clamp(0.0, 1.0),
            observed_at,
        })
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<T> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(self.value.clone())
        } else {
            None
        }
    }

    fn stale(&self) -> T {
        self.value.clone()
    }
}
