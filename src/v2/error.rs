/// A recoverable failure to decode a PPv2 header from a byte window.
///
/// Every variant here corresponds to a step in the decoder's validation
/// order; a caller can match on the specific step that failed, but all of
/// them are handled identically by [`crate::pipeline::UdpRelay`]: report via
/// the metrics listener, then deliver the original datagram untouched.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("window of {0} bytes is shorter than the 16-byte fixed header")]
    InsufficientData(usize),
    #[error("byte {index} of the 12-byte signature was {found:#04x}")]
    InvalidSignature { index: usize, found: u8 },
    #[error("version nibble {0:#03x} is not 2")]
    InvalidVersion(u8),
    #[error("command nibble {0:#03x} is not Local (0) or Proxy (1)")]
    InvalidCommand(u8),
    #[error("address family nibble {0:#03x} is not Unspec, Inet4, Inet6, or Unix")]
    InvalidFamily(u8),
    #[error("transport nibble {0:#03x} is not Unspec, Stream, or Dgram")]
    InvalidTransport(u8),
    #[error("address block needs {needed} bytes but only {available} remain")]
    TruncatedAddresses { needed: usize, available: usize },
    #[error("TLV at offset {offset} declares {declared} bytes but only {available} remain")]
    TruncatedTlv {
        offset: usize,
        declared: usize,
        available: usize,
    },
    #[error("address bytes could not be converted to a network address")]
    InvalidAddress,
}
