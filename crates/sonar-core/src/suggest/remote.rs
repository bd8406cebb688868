//! Remote completion client.
//!
//! Talks to a Firefox-style suggestion endpoint (`GET ?client=firefox&q=...`
//! answering `[query, [suggestion, ...], ...]`). Responses are cached per
//! query text, and concurrent fetches for the same text share one request.
//! Every failure mode resolves to an empty list.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use super::cache::FifoCache;
use crate::error::{Error, Result};

/// Wire access to a completion service.
///
/// The client handles caching, coalescing and timeouts; implementations only
/// perform one request and report what came back.
pub trait SuggestionTransport: Send + Sync + 'static {
    fn fetch(&self, query: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// reqwest-backed transport for the Firefox suggestion contract.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            Error::Config(format!("Invalid suggestion endpoint {endpoint}: {e}"))
        })?;

        // reqwest is built with rustls-no-provider; `Err` means a provider is
        // already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .user_agent(concat!("sonar/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Build the request URL for `query`.
    pub(crate) fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "firefox")
            .append_pair("q", query);
        url
    }
}

impl SuggestionTransport for HttpTransport {
    async fn fetch(&self, query: &str) -> Result<Vec<String>> {
        let resp = self.http.get(self.request_url(query)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "completion service answered {}",
                status.as_u16()
            )));
        }
        // `text()` honours the response charset; the service answers in
        // ISO-8859-1 for some locales.
        let body = resp.text().await?;
        parse_payload(&body)
    }
}

/// Extract the suggestion list from a Firefox-style payload.
///
/// Element 1 must be an array of strings; any other shape is an error.
pub fn parse_payload(body: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let list = value
        .as_array()
        .and_then(|items| items.get(1))
        .ok_or_else(|| Error::Transport("payload has no suggestion list".into()))?;
    serde_json::from_value(list.clone())
        .map_err(|e| Error::Transport(format!("suggestion list is not a list of strings: {e}")))
}

/// Outcome of one request, published once when it settles.
type Settlement = watch::Receiver<Option<Vec<String>>>;

#[derive(Debug)]
struct RemoteState {
    cache: FifoCache,
    /// In-flight requests keyed by query text.
    pending: HashMap<String, Settlement>,
}

/// Cached, coalescing front for a [`SuggestionTransport`].
///
/// Create one per address bar and share it; the cache and the pending table
/// live as long as the client.
#[derive(Debug)]
pub struct RemoteSuggestionClient<T = HttpTransport> {
    transport: Arc<T>,
    state: Arc<Mutex<RemoteState>>,
    timeout: Duration,
    #[cfg(feature = "metrics")]
    metrics: crate::metrics::SuggestionMetrics,
}

impl<T: SuggestionTransport> RemoteSuggestionClient<T> {
    pub fn new(transport: T, cache_capacity: usize, timeout: Duration) -> Self {
        Self {
            transport: Arc::new(transport),
            state: Arc::new(Mutex::new(RemoteState {
                cache: FifoCache::new(cache_capacity),
                pending: HashMap::new(),
            })),
            timeout,
            #[cfg(feature = "metrics")]
            metrics: crate::metrics::SuggestionMetrics::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Remote suggestions for `query`, or an empty list on any failure.
    ///
    /// Served from the cache without suspending when possible. Otherwise joins
    /// the in-flight request for the same text, or starts one. At most one
    /// request per distinct query text is outstanding at any time.
    pub async fn fetch(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut settlement = {
            let mut state = self.state.lock().await;
            if let Some(hit) = state.cache.get(query) {
                debug!(query, "Remote suggestion cache hit");
                #[cfg(feature = "metrics")]
                self.metrics.cache_hit();
                return hit.clone();
            }
            if let Some(in_flight) = state.pending.get(query) {
                debug!(query, "Joining in-flight suggestion request");
                #[cfg(feature = "metrics")]
                self.metrics.coalesced();
                in_flight.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                state.pending.insert(query.to_string(), rx.clone());
                self.spawn_request(query.to_string(), tx);
                rx
            }
        };

        match settlement.wait_for(Option::is_some).await {
            Ok(settled) => (*settled).clone().unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Run the request on its own task so settlement happens even if every
    /// caller stops waiting.
    fn spawn_request(&self, query: String, tx: watch::Sender<Option<Vec<String>>>) {
        let transport = Arc::clone(&self.transport);
        let state = Arc::clone(&self.state);
        let budget = self.timeout;
        #[cfg(feature = "metrics")]
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            #[cfg(feature = "metrics")]
            metrics.request();

            let fetched = match tokio::time::timeout(budget, transport.fetch(&query)).await {
                Ok(Ok(suggestions)) => {
                    debug!(query = %query, count = suggestions.len(), "Remote suggestions received");
                    Some(suggestions)
                }
                Ok(Err(e)) => {
                    warn!(query = %query, error = %e, "Remote suggestion request failed");
                    None
                }
                Err(_) => {
                    warn!(
                        query = %query,
                        timeout_ms = budget.as_millis(),
                        "Remote suggestion request timed out"
                    );
                    None
                }
            };

            #[cfg(feature = "metrics")]
            if fetched.is_none() {
                metrics.failure();
            }

            {
                let mut state = state.lock().await;
                state.pending.remove(&query);
                if let Some(suggestions) = &fetched {
                    if let Some(evicted) = state.cache.insert(query.clone(), suggestions.clone()) {
                        debug!(evicted = %evicted, "Evicted oldest cached query");
                    }
                }
            }

            // No receivers left is fine: the outcome is already cached.
            let _ = tx.send(Some(fetched.unwrap_or_default()));
        });
    }

    /// Cached suggestions for `query`, without touching the network.
    pub async fn cached(&self, query: &str) -> Option<Vec<String>> {
        self.state.lock().await.cache.get(query).cloned()
    }

    /// Number of requests currently in flight.
    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Number of cached queries.
    pub async fn cache_len(&self) -> usize {
        self.state.lock().await.cache.len()
    }
}
