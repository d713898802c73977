//! Reverse-mapping address caches used by [`crate::pipeline::UdpRelay`] to
//! recover the balancer address a reply datagram must be redirected through,
//! given the client address the application is replying to.

mod bounded;
mod unbounded;

pub use bounded::BoundedAddressCache;
pub use unbounded::UnboundedAddressCache;

use std::fmt;
use std::net::SocketAddr;

/// A concurrent map from a client address to the balancer address that last
/// relayed a datagram from it.
///
/// Implementations must be safe to share across the receive and send sides
/// of a [`crate::pipeline::UdpRelay`] running on separate threads.
pub trait AddressCache: fmt::Debug + Send + Sync {
    /// Records that `client` was last seen via `balancer`. Replaces any
    /// existing mapping for `client`.
    fn put(&self, client: SocketAddr, balancer: SocketAddr);

    /// Looks up the balancer address currently associated with `client`.
    fn get(&self, client: SocketAddr) -> Option<SocketAddr>;

    /// Removes the mapping for `client`, if present.
    fn invalidate(&self, client: SocketAddr);

    /// Removes every mapping.
    fn clear(&self);
}
