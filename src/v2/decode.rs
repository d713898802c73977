use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::v2::error::DecodeError;
use crate::v2::model::{Command, Family, ProxyHeader, Tlv, Transport};

/// The fixed 12-byte PPv2 signature: `0D 0A 0D 0A 00 0D 0A 51 55 49 54 0A`.
pub const SIGNATURE: [u8; 12] = [
    0x0D, 0x0A, 0x0D, 0x0A, 0x00, 0x0D, 0x0A, 0x51, 0x55, 0x49, 0x54, 0x0A,
];

/// Size of the fixed header: signature + version/command + family/transport + length.
pub const FIXED_HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TlvMode {
    Skip,
    Lenient,
    Strict,
}

/// Decode a PPv2 header from `bytes[offset..offset + length]`, skipping the
/// TLV region entirely (an empty TLV list is always returned).
///
/// # Panics
/// Panics in debug builds if `offset + length` is out of bounds for `bytes`;
/// this is a programmer error, distinct from a [`DecodeError`].
pub fn decode(bytes: &[u8], offset: usize, length: usize) -> Result<ProxyHeader, DecodeError> {
    decode_internal(bytes, offset, length, TlvMode::Skip)
}

/// Decode a PPv2 header from `bytes[offset..offset + length]`, additionally
/// parsing the TLV region.
///
/// `strict_tlvs` selects the caller's policy for a TLV whose declared length
/// crosses the end of the variable-length region: `true` reports
/// [`DecodeError::TruncatedTlv`]; `false` stops parsing silently and returns
/// the header with the TLVs decoded so far.
pub fn decode_with_tlvs(
    bytes: &[u8],
    offset: usize,
    length: usize,
    strict_tlvs: bool,
) -> Result<ProxyHeader, DecodeError> {
    let mode = if strict_tlvs {
        TlvMode::Strict
    } else {
        TlvMode::Lenient
    };
    decode_internal(bytes, offset, length, mode)
}

fn decode_internal(
    bytes: &[u8],
    offset: usize,
    length: usize,
    tlv_mode: TlvMode,
) -> Result<ProxyHeader, DecodeError> {
    debug_assert!(
        offset.checked_add(length).map_or(false, |end| end <= bytes.len()),
        "offset + length out of bounds for a {}-byte buffer",
        bytes.len()
    );

    if length < FIXED_HEADER_LEN {
        return Err(DecodeError::InsufficientData(length));
    }

    let start = offset.min(bytes.len());
    let end = start.saturating_add(length).min(bytes.len());
    let window = &bytes[start..end];

    if window.len() < FIXED_HEADER_LEN {
        return Err(DecodeError::InsufficientData(window.len()));
    }

    for (index, expected) in SIGNATURE.iter().enumerate() {
        if window[index] != *expected {
            return Err(DecodeError::InvalidSignature {
                index,
                found: window[index],
            });
        }
    }

    let version = window[12] >> 4;
    if version != 0x2 {
        return Err(DecodeError::InvalidVersion(version));
    }

    let command_nibble = window[12] & 0x0F;
    let command = match command_nibble {
        0x0 => Command::Local,
        0x1 => Command::Proxy,
        other => return Err(DecodeError::InvalidCommand(other)),
    };

    if command == Command::Local {
        return Ok(ProxyHeader {
            command: Command::Local,
            family: Family::Unspec,
            transport: Transport::Unspec,
            source: None,
            destination: None,
            tlvs: Vec::new(),
            header_length: FIXED_HEADER_LEN,
        });
    }

    let family_nibble = window[13] >> 4;
    let family = match family_nibble {
        0x0 => Family::Unspec,
        0x1 => Family::Inet4,
        0x2 => Family::Inet6,
        0x3 => Family::Unix,
        other => return Err(DecodeError::InvalidFamily(other)),
    };

    let transport_nibble = window[13] & 0x0F;
    let transport = match transport_nibble {
        0x0 => Transport::Unspec,
        0x1 => Transport::Stream,
        0x2 => Transport::Dgram,
        other => return Err(DecodeError::InvalidTransport(other)),
    };

    let variable_length = u16::from_be_bytes([window[14], window[15]]) as usize;
    let total_length = FIXED_HEADER_LEN + variable_length;
    if total_length > window.len() {
        return Err(DecodeError::InsufficientData(window.len()));
    }

    let variable_region = &window[FIXED_HEADER_LEN..total_length];
    let address_block_len = address_block_len(family);
    if variable_region.len() < address_block_len {
        return Err(DecodeError::TruncatedAddresses {
            needed: address_block_len,
            available: variable_region.len(),
        });
    }

    let (source, destination) = decode_addresses(family, &variable_region[..address_block_len])?;

    let tlv_region = &variable_region[address_block_len..];
    let tlvs = match tlv_mode {
        TlvMode::Skip => Vec::new(),
        TlvMode::Strict => parse_tlvs_strict(tlv_region, FIXED_HEADER_LEN + address_block_len)?,
        TlvMode::Lenient => parse_tlvs_lenient(tlv_region),
    };

    Ok(ProxyHeader {
        command,
        family,
        transport,
        source,
        destination,
        tlvs,
        header_length: total_length,
    })
}

/// Size in bytes of the address block for a given family. A function of
/// `Family` alone — `Transport` never changes the on-wire layout.
fn address_block_len(family: Family) -> usize {
    match family {
        Family::Unspec => 0,
        Family::Inet4 => 12,
        Family::Inet6 => 36,
        Family::Unix => 216,
    }
}

/// Decode the address block. IPv4/IPv6 byte-to-address conversion is
/// infallible in this implementation (fixed-size arrays always form a valid
/// `Ipv4Addr`/`Ipv6Addr`), so [`DecodeError::InvalidAddress`] is unreachable
/// here; it remains part of the public error enum for API stability and in
/// case a future family gains a fallible conversion.
fn decode_addresses(
    family: Family,
    block: &[u8],
) -> Result<(Option<SocketAddr>, Option<SocketAddr>), DecodeError> {
    match family {
        Family::Unspec | Family::Unix => Ok((None, None)),
        Family::Inet4 => {
            let source_ip = Ipv4Addr::new(block[0], block[1], block[2], block[3]);
            let dest_ip = Ipv4Addr::new(block[4], block[5], block[6], block[7]);
            let source_port = u16::from_be_bytes([block[8], block[9]]);
            let dest_port = u16::from_be_bytes([block[10], block[11]]);
            Ok((
                Some(SocketAddr::new(source_ip.into(), source_port)),
                Some(SocketAddr::new(dest_ip.into(), dest_port)),
            ))
        }
        Family::Inet6 => {
            let source_ip = Ipv6Addr::from(<[u8; 16]>::try_from(&block[0..16]).unwrap());
            let dest_ip = Ipv6Addr::from(<[u8; 16]>::try_from(&block[16..32]).unwrap());
            let source_port = u16::from_be_bytes([block[32], block[33]]);
            let dest_port = u16::from_be_bytes([block[34], block[35]]);
            Ok((
                Some(SocketAddr::new(source_ip.into(), source_port)),
                Some(SocketAddr::new(dest_ip.into(), dest_port)),
            ))
        }
    }
}

fn parse_tlvs_strict(region: &[u8], base_offset: usize) -> Result<Vec<Tlv>, DecodeError> {
    let mut tlvs = Vec::new();
    let mut pos = 0;

    while pos < region.len() {
        if region.len() - pos < 3 {
            return Err(DecodeError::TruncatedTlv {
                offset: base_offset + pos,
                declared: 0,
                available: region.len() - pos,
            });
        }

        let value_type = region[pos];
        let declared_len = u16::from_be_bytes([region[pos + 1], region[pos + 2]]) as usize;
        let value_start = pos + 3;
        let value_end = value_start + declared_len;

        if value_end > region.len() {
            return Err(DecodeError::TruncatedTlv {
                offset: base_offset + pos,
                declared: declared_len,
                available: region.len() - value_start,
            });
        }

        tlvs.push(Tlv::new(value_type, region[value_start..value_end].to_vec()));
        pos = value_end;
    }

    Ok(tlvs)
}

fn parse_tlvs_lenient(region: &[u8]) -> Vec<Tlv> {
    let mut tlvs = Vec::new();
    let mut pos = 0;

    while pos < region.len() {
        if region.len() - pos < 3 {
            break;
        }

        let value_type = region[pos];
        let declared_len = u16::from_be_bytes([region[pos + 1], region[pos + 2]]) as usize;
        let value_start = pos + 3;
        let value_end = value_start + declared_len;

        if value_end > region.len() {
            break;
        }

        tlvs.push(Tlv::new(value_type, region[value_start..value_end].to_vec()));
        pos = value_end;
    }

    tlvs
}
