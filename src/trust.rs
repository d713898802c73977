//! A CIDR-based [`TrustPredicate`] helper.
//!
//! The predicate itself (the `Fn(SocketAddr) -> bool` a [`crate::pipeline::UdpRelay`]
//! consults before trusting a PPv2 header) is intentionally left to the
//! caller; this module only supplies a convenient, correctly-masked
//! implementation for the common "trust these CIDR ranges" case.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use ipnet::IpNet;

use crate::pipeline::TrustPredicate;

/// A CIDR string in a `cidr_predicate` allow-list failed to parse.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    #[error("{0:?} has no parseable IP address")]
    MalformedAddress(String),
    #[error("{0:?} has a prefix length out of range for its address family")]
    PrefixOutOfRange(String),
}

/// Builds a [`TrustPredicate`] that trusts a [`SocketAddr`] if its IP falls
/// within any of the given CIDR networks.
///
/// Only the address portion of the candidate [`SocketAddr`] is matched; its
/// port is ignored. IPv4 and IPv6 networks are matched independently against
/// the candidate address's own family — an IPv4-mapped IPv6 address is never
/// matched by an IPv4 network. Non-canonical prefixes (host bits set) are
/// normalized by [`ipnet::IpNet`] before matching.
///
/// # Errors
/// Returns [`CidrError::MalformedAddress`] if an entry's address portion
/// does not parse, or [`CidrError::PrefixOutOfRange`] if its prefix length
/// exceeds the address family's bit width (32 for IPv4, 128 for IPv6).
pub fn cidr_predicate<I, S>(networks: I) -> Result<TrustPredicate, CidrError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let networks: Vec<IpNet> = networks
        .into_iter()
        .map(|entry| parse_network(entry.as_ref()))
        .collect::<Result<_, _>>()?;

    Ok(Arc::new(move |addr: SocketAddr| contains(&networks, addr.ip())))
}

fn parse_network(entry: &str) -> Result<IpNet, CidrError> {
    let (address, prefix) = entry
        .split_once('/')
        .ok_or_else(|| CidrError::MalformedAddress(entry.to_owned()))?;

    let address = IpAddr::from_str(address).map_err(|_| CidrError::MalformedAddress(entry.to_owned()))?;
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| CidrError::PrefixOutOfRange(entry.to_owned()))?;

    IpNet::new(address, prefix).map_err(|_| CidrError::PrefixOutOfRange(entry.to_owned()))
}

fn contains(networks: &[IpNet], ip: IpAddr) -> bool {
    networks.iter().any(|net| net.contains(&ip))
}
