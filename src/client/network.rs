//! Network Quality Module
//!
//! Estimates connection quality for playback decisions. Results are memoized
//! in a single-slot cache so the latency probe does not run on every call,
//! and the slot is dropped as soon as the connection changes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::ExpiringCache;
use crate::config::ClientConfig;

/// URL fetched by the default latency probe.
pub const PROBE_URL: &str = "https://www.youtube.com/favicon.ico";

const QUALITY_KEY: &str = "network-quality";
const SLOW_LATENCY: Duration = Duration::from_millis(2000);
const MEDIUM_LATENCY: Duration = Duration::from_millis(1000);

// == Network Quality ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkQuality {
    Good,
    Medium,
    Slow,
    Offline,
}

/// What the platform reports about the current connection.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStatus {
    pub online: bool,
    /// None when the platform exposes no connection details
    pub link: Option<LinkInfo>,
}

impl NetworkStatus {
    /// Online, with no connection details available.
    pub fn online() -> Self {
        Self {
            online: true,
            link: None,
        }
    }

    pub fn offline() -> Self {
        Self {
            online: false,
            link: None,
        }
    }

    pub fn with_link(link: LinkInfo) -> Self {
        Self {
            online: true,
            link: Some(link),
        }
    }
}

/// Connection details, mirroring the Network Information API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkInfo {
    /// e.g. `slow-2g`, `2g`, `3g`, `4g`
    pub effective_type: Option<String>,
    /// Estimated downlink bandwidth in Mbit/s
    pub downlink_mbps: Option<f64>,
}

/// Classifies a connection from its reported details.
pub fn classify_link(link: &LinkInfo) -> NetworkQuality {
    match link.effective_type.as_deref() {
        Some("slow-2g") | Some("2g") => return NetworkQuality::Slow,
        Some("3g") => return NetworkQuality::Medium,
        _ => {}
    }

    match link.downlink_mbps.filter(|mbps| *mbps > 0.0) {
        Some(mbps) if mbps < 1.0 => NetworkQuality::Slow,
        Some(mbps) if mbps < 2.0 => NetworkQuality::Medium,
        _ => NetworkQuality::Good,
    }
}

/// Classifies a measured round trip.
pub fn quality_from_latency(latency: Duration) -> NetworkQuality {
    if latency > SLOW_LATENCY {
        NetworkQuality::Slow
    } else if latency > MEDIUM_LATENCY {
        NetworkQuality::Medium
    } else {
        NetworkQuality::Good
    }
}

// == Latency Probe ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("latency probe failed: {0}")]
pub struct ProbeError(pub String);

/// A small request whose round trip stands in for connection speed.
#[async_trait]
pub trait LatencyProbe: Send + Sync {
    async fn probe(&self) -> Result<(), ProbeError>;
}

/// HEAD request against a tiny static asset.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProbeError(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LatencyProbe for HttpProbe {
    async fn probe(&self) -> Result<(), ProbeError> {
        // Any HTTP answer counts: only the round trip matters
        self.client
            .head(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ProbeError(e.to_string()))
    }
}

// == Network Monitor ==
/// Memoized network quality detection.
#[derive(Debug)]
pub struct NetworkMonitor<P> {
    probe: P,
    cache: ExpiringCache<&'static str, NetworkQuality>,
    probe_timeout: Duration,
}

impl<P: LatencyProbe> NetworkMonitor<P> {
    pub fn new(probe: P, config: &ClientConfig) -> Self {
        Self {
            probe,
            cache: ExpiringCache::new(1, config.network_cache_ttl),
            probe_timeout: config.probe_timeout,
        }
    }

    // == Detect ==
    /// Returns the current quality, probing only when nothing is cached.
    ///
    /// Offline is answered directly and never cached.
    pub async fn detect(&mut self, status: &NetworkStatus) -> NetworkQuality {
        if !status.online {
            return NetworkQuality::Offline;
        }

        if let Some(quality) = self.cache.get(QUALITY_KEY) {
            return quality;
        }

        let quality = match &status.link {
            Some(link) => classify_link(link),
            None => self.measure().await,
        };

        debug!(?quality, "Network quality detected");
        self.cache.set(QUALITY_KEY, quality);
        quality
    }

    /// Times one probe. Failures and timeouts fall back to `Medium`.
    pub async fn measure(&self) -> NetworkQuality {
        let started = Instant::now();

        match tokio::time::timeout(self.probe_timeout, self.probe.probe()).await {
            Ok(Ok(())) => quality_from_latency(started.elapsed()),
            Ok(Err(err)) => {
                warn!(error = %err, "Network speed measurement failed");
                NetworkQuality::Medium
            }
            Err(_) => {
                warn!(
                    "Network speed probe aborted after {} ms",
                    self.probe_timeout.as_millis()
                );
                NetworkQuality::Medium
            }
        }
    }

    // == Invalidation ==
    /// Drops the memoized quality.
    pub fn invalidate(&mut self) {
        self.cache.remove(QUALITY_KEY);
    }

    /// Handles a connection-change event: invalidate, then re-detect.
    pub async fn on_connection_change(&mut self, status: &NetworkStatus) -> NetworkQuality {
        self.invalidate();
        self.detect(status).await
    }

    /// Memoized quality, if still fresh.
    pub fn cached(&mut self) -> Option<NetworkQuality> {
        self.cache.get(QUALITY_KEY)
    }
}

// == Playback Helpers ==
/// Player quality label suited to `quality`.
pub fn optimal_quality(quality: NetworkQuality, audio_only: bool) -> &'static str {
    if audio_only {
        return "tiny";
    }

    match quality {
        NetworkQuality::Slow => "small",
        NetworkQuality::Medium => "medium",
        NetworkQuality::Good | NetworkQuality::Offline => "default",
    }
}

/// Thumbnail URL sized for `quality`; slow links get the smallest image.
pub fn thumbnail_url(video_id: &str, quality: NetworkQuality) -> Option<String> {
    if video_id.is_empty() {
        return None;
    }

    let size = match quality {
        NetworkQuality::Slow => "default",
        _ => "mqdefault",
    };
    Some(format!("https://img.youtube.com/vi/{}/{}.jpg", video_id, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Probe that takes a fixed time and counts invocations.
    struct FakeProbe {
        latency: Duration,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LatencyProbe for FakeProbe {
        async fn probe(&self) -> Result<(), ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            if self.fail {
                Err(ProbeError("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn monitor(latency_ms: u64, fail: bool) -> (NetworkMonitor<FakeProbe>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let probe = FakeProbe {
            latency: Duration::from_millis(latency_ms),
            fail,
            calls: calls.clone(),
        };
        (NetworkMonitor::new(probe, &ClientConfig::default()), calls)
    }

    fn link(effective_type: Option<&str>, downlink_mbps: Option<f64>) -> LinkInfo {
        LinkInfo {
            effective_type: effective_type.map(str::to_string),
            downlink_mbps,
        }
    }

    #[test]
    fn test_classify_link() {
        assert_eq!(classify_link(&link(Some("slow-2g"), None)), NetworkQuality::Slow);
        assert_eq!(classify_link(&link(Some("2g"), Some(10.0))), NetworkQuality::Slow);
        assert_eq!(classify_link(&link(Some("3g"), None)), NetworkQuality::Medium);
        assert_eq!(classify_link(&link(Some("4g"), Some(0.5))), NetworkQuality::Slow);
        assert_eq!(classify_link(&link(Some("4g"), Some(1.5))), NetworkQuality::Medium);
        assert_eq!(classify_link(&link(Some("4g"), Some(10.0))), NetworkQuality::Good);
        // Zero downlink means "unknown"
        assert_eq!(classify_link(&link(None, Some(0.0))), NetworkQuality::Good);
    }

    #[test]
    fn test_quality_from_latency() {
        assert_eq!(quality_from_latency(Duration::from_millis(300)), NetworkQuality::Good);
        assert_eq!(quality_from_latency(Duration::from_millis(1000)), NetworkQuality::Good);
        assert_eq!(quality_from_latency(Duration::from_millis(1500)), NetworkQuality::Medium);
        assert_eq!(quality_from_latency(Duration::from_millis(2500)), NetworkQuality::Slow);
    }

    #[tokio::test(start_paused = true)]
    async fn test_measure_by_latency() {
        assert_eq!(monitor(200, false).0.measure().await, NetworkQuality::Good);
        assert_eq!(monitor(1500, false).0.measure().await, NetworkQuality::Medium);
        assert_eq!(monitor(2500, false).0.measure().await, NetworkQuality::Slow);
    }

    #[tokio::test(start_paused = true)]
    async fn test_measure_falls_back_on_timeout_and_error() {
        assert_eq!(monitor(10_000, false).0.measure().await, NetworkQuality::Medium);
        assert_eq!(monitor(10, true).0.measure().await, NetworkQuality::Medium);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detect_is_memoized_until_ttl() {
        let (mut monitor, calls) = monitor(200, false);
        let status = NetworkStatus::online();

        assert_eq!(monitor.detect(&status).await, NetworkQuality::Good);
        assert_eq!(monitor.detect(&status).await, NetworkQuality::Good);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(121)).await;
        assert_eq!(monitor.cached(), None);
        monitor.detect(&status).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_change_invalidates() {
        let (mut monitor, calls) = monitor(200, false);

        monitor.detect(&NetworkStatus::online()).await;
        assert_eq!(monitor.cached(), Some(NetworkQuality::Good));

        let quality = monitor
            .on_connection_change(&NetworkStatus::with_link(link(Some("2g"), None)))
            .await;

        assert_eq!(quality, NetworkQuality::Slow);
        assert_eq!(monitor.cached(), Some(NetworkQuality::Slow));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_is_not_cached() {
        let (mut monitor, calls) = monitor(200, false);

        assert_eq!(monitor.detect(&NetworkStatus::offline()).await, NetworkQuality::Offline);
        assert_eq!(monitor.cached(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_optimal_quality() {
        assert_eq!(optimal_quality(NetworkQuality::Good, true), "tiny");
        assert_eq!(optimal_quality(NetworkQuality::Slow, false), "small");
        assert_eq!(optimal_quality(NetworkQuality::Medium, false), "medium");
        assert_eq!(optimal_quality(NetworkQuality::Good, false), "default");
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("abc", NetworkQuality::Slow).as_deref(),
            Some("https://img.youtube.com/vi/abc/default.jpg")
        );
        assert_eq!(
            thumbnail_url("abc", NetworkQuality::Good).as_deref(),
            Some("https://img.youtube.com/vi/abc/mqdefault.jpg")
        );
        assert_eq!(thumbnail_url("", NetworkQuality::Good), None);
    }

    #[test]
    fn test_quality_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NetworkQuality::Offline).unwrap(),
            "\"offline\""
        );
    }
}
