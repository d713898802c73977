use criterion::{black_box, criterion_group, criterion_main, Criterion};

use relay_proxy_protocol::v2::{decode, decode_with_tlvs, Command, ProxyHeaderBuilder, Transport};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

fn benchmarks(c: &mut Criterion) {
    let ipv4 = ProxyHeaderBuilder::new()
        .command(Command::Proxy)
        .transport(Transport::Dgram)
        .addresses(
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 12345),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)), 443),
        )
        .build();

    let ipv6_with_tlvs = ProxyHeaderBuilder::new()
        .command(Command::Proxy)
        .transport(Transport::Dgram)
        .addresses(
            SocketAddr::new(IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1)), 1000),
            SocketAddr::new(IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 2)), 2000),
        )
        .tlv(0x01, vec![0x41, 0x42])
        .tlv(0x02, vec![0u8; 32])
        .build();

    c.bench_function("decode ipv4 dgram, tlvs skipped", |b| {
        b.iter(|| decode(black_box(&ipv4), 0, ipv4.len()))
    });

    c.bench_function("decode ipv6 dgram with tlvs, strict", |b| {
        b.iter(|| decode_with_tlvs(black_box(&ipv6_with_tlvs), 0, ipv6_with_tlvs.len(), true))
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
