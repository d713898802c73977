use std::net::SocketAddr;
use std::time::Duration;

use moka::sync::Cache;
use tracing::trace;

use crate::cache::AddressCache;

/// An [`AddressCache`] backed by a capacity-bounded, idle-TTL
/// [`moka::sync::Cache`].
///
/// A mapping is evicted once it has gone unaccessed for `idle_ttl`, or when
/// `max_entries` is exceeded (moka evicts by an approximated-LRU policy in
/// that case). `idle_ttl` of [`Duration::ZERO`] disables idle expiry,
/// leaving only the capacity bound.
#[derive(Debug, Clone)]
pub struct BoundedAddressCache {
    entries: Cache<SocketAddr, SocketAddr>,
}

impl BoundedAddressCache {
    pub fn new(max_entries: u64, idle_ttl: Duration) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);
        if !idle_ttl.is_zero() {
            builder = builder.time_to_idle(idle_ttl);
        }

        BoundedAddressCache {
            entries: builder.build(),
        }
    }
}

impl AddressCache for BoundedAddressCache {
    fn put(&self, client: SocketAddr, balancer: SocketAddr) {
        trace!(%client, %balancer, "caching client to balancer mapping");
        self.entries.insert(client, balancer);
    }

    fn get(&self, client: SocketAddr) -> Option<SocketAddr> {
        self.entries.get(&client)
    }

    fn invalidate(&self, client: SocketAddr) {
        self.entries.invalidate(&client);
    }

    fn clear(&self) {
        self.entries.invalidate_all();
    }
}
