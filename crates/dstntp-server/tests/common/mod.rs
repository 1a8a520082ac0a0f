// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for server integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;

use dst_server::protocol::{
    ConstPackedSizeBytes, Mode, Packet, Stratum, TimestampFormat, WriteBytes,
};
use dst_server::server::NtpServerBuilder;

/// Build and spawn a server on an ephemeral localhost port, returning
/// the address it is serving on.
pub async fn spawn_test_server(builder: NtpServerBuilder) -> SocketAddr {
    let server = builder.listen("127.0.0.1:0").build().await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

/// Spawn a mock upstream authority that answers every probe with a
/// fixed transmit-timestamp seconds value.
pub async fn spawn_mock_upstream(transmit_seconds: u32) -> SocketAddr {
    let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = sock.local_addr().unwrap();
    tokio::spawn(async move {
        let mut buf = [0u8; 1024];
        while let Ok((_, src)) = sock.recv_from(&mut buf).await {
            let reply = Packet {
                mode: Mode::Server,
                stratum: Stratum::PRIMARY,
                transmit_timestamp: TimestampFormat {
                    seconds: transmit_seconds,
                    fraction: 0,
                },
                ..Packet::default()
            };
            let mut out = [0u8; Packet::PACKED_SIZE_BYTES];
            (&mut out[..]).write_bytes(reply).unwrap();
            let _ = sock.send_to(&out, src).await;
        }
    });
    addr
}

/// Send raw bytes to the server and wait up to 5 seconds for a reply.
pub async fn send_receive_raw(server: SocketAddr, request: &[u8]) -> Vec<u8> {
    try_send_receive_raw(server, request, Duration::from_secs(5))
        .await
        .expect("server did not reply")
}

/// Send raw bytes to the server; `None` if no reply arrives in time.
pub async fn try_send_receive_raw(
    server: SocketAddr,
    request: &[u8],
    timeout: Duration,
) -> Option<Vec<u8>> {
    let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sock.send_to(request, server).await.unwrap();

    let mut buf = [0u8; 1024];
    match tokio::time::timeout(timeout, sock.recv_from(&mut buf)).await {
        Ok(Ok((len, _))) => Some(buf[..len].to_vec()),
        _ => None,
    }
}

/// A standard client request carrying the given transmit timestamp.
pub fn client_request(transmit: TimestampFormat) -> [u8; Packet::PACKED_SIZE_BYTES] {
    let request = Packet {
        transmit_timestamp: transmit,
        ..Packet::default()
    };
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut buf[..]).write_bytes(request).unwrap();
    buf
}
