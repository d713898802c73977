use std::net::SocketAddr;

use dashmap::DashMap;
use tracing::trace;

use crate::cache::AddressCache;

/// An [`AddressCache`] with no eviction policy: every inserted mapping is
/// held until explicitly invalidated, cleared, or the cache is dropped.
///
/// Suitable for relays whose client population is bounded (a fixed fleet of
/// backends) where unconditional growth isn't a concern. For an open client
/// population, prefer [`crate::cache::BoundedAddressCache`].
#[derive(Debug, Default)]
pub struct UnboundedAddressCache {
    entries: DashMap<SocketAddr, SocketAddr>,
}

impl UnboundedAddressCache {
    pub fn new() -> Self {
        UnboundedAddressCache::default()
    }
}

impl AddressCache for UnboundedAddressCache {
    fn put(&self, client: SocketAddr, balancer: SocketAddr) {
        trace!(%client, %balancer, "caching client to balancer mapping");
        self.entries.insert(client, balancer);
    }

    fn get(&self, client: SocketAddr) -> Option<SocketAddr> {
        self.entries.get(&client).map(|entry| *entry.value())
    }

    fn invalidate(&self, client: SocketAddr) {
        self.entries.remove(&client);
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::thread;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::new(Ipv4Addr::new(127, 0, 0, 1).into(), port)
    }

    #[test]
    fn put_then_get_round_trips() {
        let cache = UnboundedAddressCache::new();
        cache.put(addr(1), addr(2));
        assert_eq!(cache.get(addr(1)), Some(addr(2)));
    }

    #[test]
    fn missing_entry_is_none() {
        let cache = UnboundedAddressCache::new();
        assert_eq!(cache.get(addr(99)), None);
    }

    #[test]
    fn put_overwrites_existing_mapping() {
        let cache = UnboundedAddressCache::new();
        cache.put(addr(1), addr(2));
        cache.put(addr(1), addr(3));
        assert_eq!(cache.get(addr(1)), Some(addr(3)));
    }

    #[test]
    fn invalidate_removes_the_entry() {
        let cache = UnboundedAddressCache::new();
        cache.put(addr(1), addr(2));
        cache.invalidate(addr(1));
        assert_eq!(cache.get(addr(1)), None);
    }

    #[test]
    fn invalidate_on_absent_key_is_a_no_op() {
        let cache = UnboundedAddressCache::new();
        cache.invalidate(addr(1));
        assert_eq!(cache.get(addr(1)), None);
    }

    #[test]
    fn clear_removes_every_entry() {
        let cache = UnboundedAddressCache::new();
        cache.put(addr(1), addr(2));
        cache.put(addr(3), addr(4));
        cache.clear();
        assert_eq!(cache.get(addr(1)), None);
        assert_eq!(cache.get(addr(3)), None);
    }

    #[test]
    fn concurrent_puts_from_many_threads_on_disjoint_keys_are_all_visible() {
        let cache = Arc::new(UnboundedAddressCache::new());

        thread::scope(|scope| {
            for thread_index in 0..10u16 {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    for item in 0..100u16 {
                        let port = thread_index * 100 + item;
                        let client = addr(port);
                        let balancer = addr(port + 10_000);
                        cache.put(client, balancer);
                        assert_eq!(cache.get(client), Some(balancer));
                    }
                });
            }
        });
    }
}
