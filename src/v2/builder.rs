use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::v2::decode::SIGNATURE;
use crate::v2::model::{Command, Family, Transport};

const VERSION: u8 = 0x2 << 4;

#[derive(Debug, Default)]
struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.bytes.len() + buf.len() > u16::MAX as usize + 16 {
            Err(io::ErrorKind::WriteZero.into())
        } else {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Addresses {
    Inet4 {
        source: (Ipv4Addr, u16),
        destination: (Ipv4Addr, u16),
    },
    Inet6 {
        source: (Ipv6Addr, u16),
        destination: (Ipv6Addr, u16),
    },
    Unix {
        source: [u8; 108],
        destination: [u8; 108],
    },
}

impl Addresses {
    fn family(&self) -> Family {
        match self {
            Addresses::Inet4 { .. } => Family::Inet4,
            Addresses::Inet6 { .. } => Family::Inet6,
            Addresses::Unix { .. } => Family::Unix,
        }
    }

    fn write_to(&self, writer: &mut Writer) -> io::Result<()> {
        match self {
            Addresses::Inet4 {
                source: (src_ip, src_port),
                destination: (dst_ip, dst_port),
            } => {
                writer.write_all(&src_ip.octets())?;
                writer.write_all(&dst_ip.octets())?;
                writer.write_all(&src_port.to_be_bytes())?;
                writer.write_all(&dst_port.to_be_bytes())?;
            }
            Addresses::Inet6 {
                source: (src_ip, src_port),
                destination: (dst_ip, dst_port),
            } => {
                writer.write_all(&src_ip.octets())?;
                writer.write_all(&dst_ip.octets())?;
                writer.write_all(&src_port.to_be_bytes())?;
                writer.write_all(&dst_port.to_be_bytes())?;
            }
            Addresses::Unix {
                source,
                destination,
            } => {
                writer.write_all(source)?;
                writer.write_all(destination)?;
            }
        }

        Ok(())
    }
}

/// Converts a socket address pair to the wire family, upgrading a mixed
/// IPv4/IPv6 pair to INET6 by mapping the IPv4 side into `::ffff:a.b.c.d`
/// (per the original spec's address-family resolution rule).
fn resolve_addresses(source: SocketAddr, destination: SocketAddr) -> Addresses {
    match (source.ip(), destination.ip()) {
        (IpAddr::V4(src), IpAddr::V4(dst)) => Addresses::Inet4 {
            source: (src, source.port()),
            destination: (dst, destination.port()),
        },
        _ => Addresses::Inet6 {
            source: (to_ipv6(source.ip()), source.port()),
            destination: (to_ipv6(destination.ip()), destination.port()),
        },
    }
}

fn to_ipv6(addr: IpAddr) -> Ipv6Addr {
    match addr {
        IpAddr::V4(v4) => v4.to_ipv6_mapped(),
        IpAddr::V6(v6) => v6,
    }
}

/// Builds a PPv2 header byte-by-byte, the inverse of
/// [`crate::v2::decode`]/[`crate::v2::decode_with_tlvs`]: a header built here
/// and fed back through `decode_with_tlvs` reports an equivalent
/// [`crate::v2::ProxyHeader`] (round-trip law).
///
/// Defaults to `Command::Proxy` and `Transport::Stream`; call
/// [`ProxyHeaderBuilder::command`] and [`ProxyHeaderBuilder::transport`] to
/// override. When the command is `Local`, any addresses or TLVs set on the
/// builder are ignored and the output is exactly the 16-byte fixed header.
#[derive(Debug, Default)]
pub struct ProxyHeaderBuilder {
    command: Option<Command>,
    transport: Option<Transport>,
    addresses: Option<Addresses>,
    tlvs: Vec<(u8, Vec<u8>)>,
}

impl ProxyHeaderBuilder {
    pub fn new() -> Self {
        ProxyHeaderBuilder::default()
    }

    pub fn command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the INET4 or INET6 address pair, chosen from the variant of
    /// `source`/`destination`. A mixed V4/V6 pair is promoted to INET6.
    ///
    /// # Panics
    /// Panics if addresses were already set on this builder (via this method
    /// or [`ProxyHeaderBuilder::unix_addresses`]).
    pub fn addresses(mut self, source: SocketAddr, destination: SocketAddr) -> Self {
        assert!(
            self.addresses.is_none(),
            "addresses already set on this builder"
        );
        self.addresses = Some(resolve_addresses(source, destination));
        self
    }

    /// Sets a raw 108-byte Unix socket address pair (family `Unix`).
    ///
    /// # Panics
    /// Panics if addresses were already set on this builder.
    pub fn unix_addresses(mut self, source: [u8; 108], destination: [u8; 108]) -> Self {
        assert!(
            self.addresses.is_none(),
            "addresses already set on this builder"
        );
        self.addresses = Some(Addresses::Unix {
            source,
            destination,
        });
        self
    }

    /// Appends a TLV record. TLVs are written in the order they were added.
    pub fn tlv(mut self, value_type: u8, value: Vec<u8>) -> Self {
        self.tlvs.push((value_type, value));
        self
    }

    /// Encodes the accumulated state into a complete PPv2 header.
    ///
    /// # Panics
    /// Panics if the variable-length region (addresses plus TLVs, each with
    /// a 3-byte type/length prefix) would exceed `u16::MAX` bytes — the wire
    /// format has no way to express a longer header.
    pub fn build(self) -> Vec<u8> {
        let command = self.command.unwrap_or(Command::Proxy);

        let mut writer = Writer::default();
        writer
            .write_all(&SIGNATURE)
            .expect("writing the fixed signature never exceeds the capacity bound");

        if command == Command::Local {
            writer
                .write_all(&[VERSION, 0x00, 0x00, 0x00])
                .expect("a 4-byte LOCAL trailer never exceeds the capacity bound");
            return writer.finish();
        }

        let transport = self.transport.unwrap_or(Transport::Stream);
        let family = self.addresses.as_ref().map_or(Family::Unspec, Addresses::family);

        let family_nibble = match family {
            Family::Unspec => 0x0,
            Family::Inet4 => 0x1,
            Family::Inet6 => 0x2,
            Family::Unix => 0x3,
        };
        let transport_nibble = match transport {
            Transport::Unspec => 0x0,
            Transport::Stream => 0x1,
            Transport::Dgram => 0x2,
        };

        let mut body = Writer::default();
        if let Some(addresses) = &self.addresses {
            addresses
                .write_to(&mut body)
                .expect("encoding the address block never exceeds the capacity bound");
        }
        for (value_type, value) in &self.tlvs {
            body.write_all(&[*value_type])
                .expect("a 1-byte TLV type never exceeds the capacity bound");
            let len = u16::try_from(value.len())
                .expect("a single TLV value longer than u16::MAX cannot be encoded");
            body.write_all(&len.to_be_bytes())
                .expect("a 2-byte TLV length never exceeds the capacity bound");
            body.write_all(value)
                .expect("TLV value exceeds the maximum header size");
        }
        let body = body.finish();

        let variable_length = u16::try_from(body.len())
            .expect("addresses plus TLVs exceed the maximum header size of u16::MAX bytes");

        writer
            .write_all(&[VERSION | 0x1, (family_nibble << 4) | transport_nibble])
            .expect("writing the family/transport byte never exceeds the capacity bound");
        writer
            .write_all(&variable_length.to_be_bytes())
            .expect("writing the length field never exceeds the capacity bound");
        writer
            .write_all(&body)
            .expect("writing the variable-length region never exceeds the capacity bound");

        writer.finish()
    }
}
