//! Per-IP rate limiting via `tower_governor`.
//!
//! Route groups pick a (rate, burst) pair and build their own layer with
//! [`make_rate_limit_layer!`](crate::make_rate_limit_layer); keys come from
//! `SmartIpKeyExtractor` so deployments behind a proxy still limit by client
//! address.

/// General API endpoints: 10 requests per second with burst of 20
pub const GENERAL_RATE_PER_SECOND: u64 = 10;
pub const GENERAL_BURST_SIZE: u32 = 20;

/// Login endpoints: 5 requests per second with burst of 10
pub const AUTH_RATE_PER_SECOND: u64 = 5;
pub const AUTH_BURST_SIZE: u32 = 10;

/// Build a rate-limit layer from a per-second rate and burst size.
///
/// A macro rather than a function so each call site gets its own limiter and
/// the full `GovernorLayer` type never needs spelling out.
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($per_second:expr, $burst_size:expr) => {{
        let governor_conf = tower_governor::governor::GovernorConfigBuilder::default()
            .per_second($per_second)
            .burst_size($burst_size)
            .key_extractor(tower_governor::key_extractor::SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .expect("Failed to build rate limiter configuration");

        tower_governor::GovernorLayer::new(governor_conf)
    }};
}
