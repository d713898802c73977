use std::net::SocketAddr;

use crate::v2::{DecodeError, ProxyHeader};

/// A passive callback interface for observing [`crate::pipeline::UdpRelay`]
/// activity. Every method defaults to a no-op, so implementers only override
/// what they need.
///
/// This crate wires diagnostic `tracing` events independently of this trait
/// (see the cache and pipeline modules); `MetricsListener` is the intended
/// extension point for counters and gauges, not logging.
pub trait MetricsListener: Send + Sync {
    fn on_header_parsed(&self, _header: &ProxyHeader) {}
    fn on_parse_error(&self, _cause: DecodeError) {}
    fn on_cache_hit(&self, _client: SocketAddr) {}
    fn on_cache_miss(&self, _client: SocketAddr) {}
    fn on_trusted_proxy(&self, _balancer: SocketAddr) {}
    fn on_untrusted_proxy(&self, _balancer: SocketAddr) {}
    fn on_local(&self, _balancer: SocketAddr) {}
}

/// The default [`MetricsListener`]: every callback is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsListener for NoopMetrics {}
