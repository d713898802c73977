use std::net::SocketAddr;

/// The type of connection the proxy observed from its client.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Command {
    /// The proxy initiated the connection itself; no client addresses follow.
    Local,
    /// The connection is relayed on behalf of a client.
    Proxy,
}

/// The address family carried by the header's address block.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Family {
    Unspec,
    Inet4,
    Inet6,
    Unix,
}

/// The transport protocol used by the proxied connection.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum Transport {
    Unspec,
    Stream,
    Dgram,
}

/// A single Type-Length-Value record parsed from the TLV region of a header.
///
/// Owns a copy of its value; `value_type` is an unsigned octet, opaque to
/// this crate (TLV interpretation is left to the caller).
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Tlv {
    value_type: u8,
    value: Vec<u8>,
}

impl Tlv {
    pub fn new(value_type: u8, value: Vec<u8>) -> Tlv {
        Tlv { value_type, value }
    }

    /// The type used to interpret the value.
    pub fn value_type(&self) -> u8 {
        self.value_type
    }

    /// The raw TLV payload.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// The length of the value, in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// An immutable, fully decoded PPv2 header.
///
/// Constructed either by [`crate::v2::decode`]/[`crate::v2::decode_with_tlvs`]
/// on successful parse, or by [`crate::v2::ProxyHeaderBuilder`]. Never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyHeader {
    pub(crate) command: Command,
    pub(crate) family: Family,
    pub(crate) transport: Transport,
    pub(crate) source: Option<SocketAddr>,
    pub(crate) destination: Option<SocketAddr>,
    pub(crate) tlvs: Vec<Tlv>,
    pub(crate) header_length: usize,
}

impl ProxyHeader {
    pub fn command(&self) -> Command {
        self.command
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// The client's real address, if the header carried one.
    pub fn source_addr(&self) -> Option<SocketAddr> {
        self.source
    }

    /// The address the proxy connected to on the client's behalf, if present.
    pub fn destination_addr(&self) -> Option<SocketAddr> {
        self.destination
    }

    /// The TLVs parsed from the header, in wire order. Empty if TLV parsing
    /// was not requested or none were present.
    pub fn tlvs(&self) -> &[Tlv] {
        &self.tlvs
    }

    /// Total bytes this header occupied on the wire, including the 16-byte
    /// fixed prefix. Always `>= 16`.
    pub fn header_length(&self) -> usize {
        self.header_length
    }

    /// Shorthand for `command() == Command::Local`.
    pub fn is_local(&self) -> bool {
        self.command == Command::Local
    }
}
