//! PROXY Protocol v2 (PPv2) codec and a stateful UDP relay pipeline for
//! servers that sit behind a PPv2-speaking load balancer.
//!
//! - [`v2`] — binary decoder/encoder for PPv2 headers.
//! - [`cache`] — reverse-mapping `AddressCache` (unbounded and bounded
//!   idle-TTL implementations).
//! - [`pipeline`] — [`pipeline::UdpRelay`], the datagram wrapper that ties
//!   the decoder, cache, trust predicate, and metrics listener together.
//! - [`trust`] — a CIDR-based helper for building a [`pipeline::TrustPredicate`].
//!
//! ```
//! use relay_proxy_protocol::v2::{Command, Transport, ProxyHeaderBuilder, decode};
//! use std::net::{IpAddr, Ipv4Addr, SocketAddr};
//!
//! let bytes = ProxyHeaderBuilder::new()
//!     .command(Command::Proxy)
//!     .transport(Transport::Dgram)
//!     .addresses(
//!         SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 12345),
//!         SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)), 443),
//!     )
//!     .build();
//!
//! let header = decode(&bytes, 0, bytes.len()).unwrap();
//! assert_eq!(header.source_addr().unwrap().port(), 12345);
//! ```

pub mod cache;
pub mod pipeline;
pub mod trust;
pub mod v2;
