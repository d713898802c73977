//! A UDP datagram pipeline that strips and validates PPv2 preambles on
//! receive, and redirects replies back through the originating balancer on
//! send, consulting an [`AddressCache`].

mod metrics;

pub use metrics::{MetricsListener, NoopMetrics};

use std::fmt;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::cache::AddressCache;
use crate::v2::{decode, Command, Transport};

/// A pure function deciding whether a sender address is authorized to speak
/// PPv2 to this endpoint. Must be safe to call from any thread.
pub type TrustPredicate = Arc<dyn Fn(SocketAddr) -> bool + Send + Sync>;

/// The outcome of [`UdpRelay::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The datagram was forwarded; the payload was `usize` bytes.
    Sent(usize),
    /// No balancer mapping was known for the destination; the datagram was
    /// dropped.
    DroppedNoMapping,
}

/// A datagram received through [`UdpRelay::receive`], with the PPv2 header
/// (if any) already stripped from its data window.
pub struct ReceivedDatagram<'a> {
    payload: &'a [u8],
    source: SocketAddr,
    balancer: SocketAddr,
}

impl<'a> ReceivedDatagram<'a> {
    /// The application payload, with any PPv2 header already removed.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// The address the application should treat as the sender: the real
    /// client address when a PPv2/DGRAM header carried one, otherwise the
    /// balancer's own address.
    pub fn source(&self) -> SocketAddr {
        self.source
    }

    /// The address the datagram actually arrived from on the wire.
    pub fn balancer(&self) -> SocketAddr {
        self.balancer
    }
}

/// Builds an immutable [`UdpRelay`]: configuration happens once, up front,
/// so the receive/send fast path dereferences final fields with no
/// synchronization of its own.
pub struct UdpRelayBuilder {
    socket: UdpSocket,
    cache: Option<Arc<dyn AddressCache>>,
    metrics: Arc<dyn MetricsListener>,
    trust_predicate: Option<TrustPredicate>,
}

impl fmt::Debug for UdpRelayBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdpRelayBuilder")
            .field("socket", &self.socket)
            .field("has_cache", &self.cache.is_some())
            .field("has_trust_predicate", &self.trust_predicate.is_some())
            .finish()
    }
}

impl UdpRelayBuilder {
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(UdpRelayBuilder {
            socket,
            cache: None,
            metrics: Arc::new(NoopMetrics),
            trust_predicate: None,
        })
    }

    pub fn cache(mut self, cache: Arc<dyn AddressCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the underlying socket's receive timeout. `None` blocks
    /// indefinitely (the default). A timed-out `receive` surfaces the
    /// underlying `io::ErrorKind::WouldBlock`/`TimedOut` error.
    pub fn read_timeout(self, timeout: Option<std::time::Duration>) -> io::Result<Self> {
        self.socket.set_read_timeout(timeout)?;
        Ok(self)
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsListener>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn trust_predicate(mut self, predicate: TrustPredicate) -> Self {
        self.trust_predicate = Some(predicate);
        self
    }

    pub fn build(self) -> UdpRelay {
        UdpRelay {
            socket: self.socket,
            cache: self.cache,
            metrics: self.metrics,
            trust_predicate: self.trust_predicate,
        }
    }
}

/// An immutable UDP relay endpoint. Construct with [`UdpRelayBuilder`].
pub struct UdpRelay {
    socket: UdpSocket,
    cache: Option<Arc<dyn AddressCache>>,
    metrics: Arc<dyn MetricsListener>,
    trust_predicate: Option<TrustPredicate>,
}

impl fmt::Debug for UdpRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UdpRelay")
            .field("socket", &self.socket)
            .field("has_cache", &self.cache.is_some())
            .field("has_trust_predicate", &self.trust_predicate.is_some())
            .finish()
    }
}

impl UdpRelay {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Reads one datagram into `buffer` and applies the receive algorithm:
    /// trust check, PPv2 decode, cache update, and source rewriting.
    ///
    /// Returns a window into `buffer` — no bytes are copied beyond what the
    /// underlying `recv_from` call itself writes.
    pub fn receive<'a>(&self, buffer: &'a mut [u8]) -> io::Result<ReceivedDatagram<'a>> {
        let (received, balancer) = self.socket.recv_from(buffer)?;
        let datagram = &buffer[..received];

        if let Some(predicate) = &self.trust_predicate {
            if !predicate(balancer) {
                self.metrics.on_untrusted_proxy(balancer);
                warn!(%balancer, "rejected datagram from untrusted sender");
                return Ok(ReceivedDatagram {
                    payload: datagram,
                    source: balancer,
                    balancer,
                });
            }
        }

        match decode(datagram, 0, datagram.len()) {
            Err(cause) => {
                self.metrics.on_parse_error(cause);
                debug!(%balancer, %cause, "failed to decode PPv2 header");
                Ok(ReceivedDatagram {
                    payload: datagram,
                    source: balancer,
                    balancer,
                })
            }
            Ok(header) => {
                self.metrics.on_header_parsed(&header);

                if header.command() == Command::Local {
                    self.metrics.on_local(balancer);
                    return Ok(ReceivedDatagram {
                        payload: &datagram[header.header_length()..],
                        source: balancer,
                        balancer,
                    });
                }

                let apparent_source = if header.transport() == Transport::Dgram {
                    header.source_addr()
                } else {
                    None
                };

                let source = match apparent_source {
                    Some(client) => {
                        self.metrics.on_trusted_proxy(balancer);
                        trace!(%client, %balancer, "recording client to balancer mapping");
                        if let Some(cache) = &self.cache {
                            cache.put(client, balancer);
                        }
                        client
                    }
                    None => balancer,
                };

                Ok(ReceivedDatagram {
                    payload: &datagram[header.header_length()..],
                    source,
                    balancer,
                })
            }
        }
    }

    /// Applies the send algorithm: cache lookup, hit/miss handling, and
    /// forward-when-no-cache-configured.
    pub fn send(&self, payload: &[u8], client: SocketAddr) -> io::Result<SendOutcome> {
        let destination = match &self.cache {
            Some(cache) => match cache.get(client) {
                Some(balancer) => {
                    self.metrics.on_cache_hit(client);
                    balancer
                }
                None => {
                    self.metrics.on_cache_miss(client);
                    return Ok(SendOutcome::DroppedNoMapping);
                }
            },
            None => client,
        };

        let sent = self.socket.send_to(payload, destination)?;
        Ok(SendOutcome::Sent(sent))
    }
}
