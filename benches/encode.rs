use criterion::{black_box, criterion_group, criterion_main, Criterion};

use relay_proxy_protocol::v2::{Command, ProxyHeaderBuilder, Transport};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn benchmarks(c: &mut Criterion) {
    let source = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 12345);
    let destination = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)), 443);

    c.bench_function("encode ipv4 dgram, no tlvs", |b| {
        b.iter(|| {
            ProxyHeaderBuilder::new()
                .command(Command::Proxy)
                .transport(Transport::Dgram)
                .addresses(black_box(source), black_box(destination))
                .build()
        })
    });

    c.bench_function("encode ipv4 dgram with tlvs", |b| {
        b.iter(|| {
            ProxyHeaderBuilder::new()
                .command(Command::Proxy)
                .transport(Transport::Dgram)
                .addresses(black_box(source), black_box(destination))
                .tlv(0x01, vec![0x41, 0x42])
                .tlv(0x02, vec![0u8; 32])
                .build()
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
