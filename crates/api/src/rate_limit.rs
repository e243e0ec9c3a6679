//! Rate Limiting using the GCRA algorithm
//!
//! Per-IP limiting via tower_governor; requires the service to be built
//! with `into_make_service_with_connect_info::<SocketAddr>()` so the
//! peer IP is available to the key extractor.

use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config with X-RateLimit-* response headers enabled
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Replenishment period in seconds
    pub per_second: u64,
    /// Requests allowed to burst immediately
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Dashboards poll metrics twice a second and hold one stream
        // connection; keep headroom for a detect call alongside.
        Self {
            per_second: 1,
            burst_size: 20,
        }
    }
}

/// Build the governor config used by `GovernorLayer`.
pub fn create_governor_config(config: &RateLimitConfig) -> Arc<DefaultGovernorConfig> {
    Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.per_second)
            .burst_size(config.burst_size)
            .use_headers()
            .finish()
            .expect("rate limit config must have non-zero period and burst"),
    )
}
