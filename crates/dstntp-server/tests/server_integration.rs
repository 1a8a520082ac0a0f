// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests running the full serving path over localhost UDP.

mod common;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::Local;

use dst_server::dst::DstPolicy;
use dst_server::protocol::{
    ConstPackedSizeBytes, Mode, Packet, ReadBytes, ReferenceIdentifier, Stratum, TimestampFormat,
    Version,
};
use dst_server::server::NtpServer;

use common::{client_request, send_receive_raw, spawn_mock_upstream, spawn_test_server, try_send_receive_raw};

/// The offset the default policy applies to today's date, so these tests
/// pass in any season.
fn current_offset() -> i64 {
    DstPolicy::default().offset_seconds(Local::now().naive_local())
}

#[tokio::test]
async fn serves_upstream_time_with_current_offset() {
    let upstream_seconds: u32 = 3_913_056_000;
    let upstream = spawn_mock_upstream(upstream_seconds).await;
    let server = spawn_test_server(NtpServer::builder().upstream(upstream.to_string())).await;

    let request = client_request(TimestampFormat::default());
    let reply = send_receive_raw(server, &request).await;
    assert_eq!(reply.len(), Packet::PACKED_SIZE_BYTES);

    let response: Packet = (&reply[..]).read_bytes().unwrap();
    let expected = (upstream_seconds as i64 + current_offset()) as u32;
    assert_eq!(response.transmit_timestamp.seconds, expected);
    assert_eq!(response.transmit_timestamp.fraction, 0);
    assert_eq!(response.receive_timestamp.seconds, expected);
    assert_eq!(response.reference_timestamp.seconds, expected);
}

#[tokio::test]
async fn response_header_is_stratum_one_server() {
    let upstream = spawn_mock_upstream(3_913_056_000).await;
    let server = spawn_test_server(NtpServer::builder().upstream(upstream.to_string())).await;

    let reply = send_receive_raw(server, &client_request(TimestampFormat::default())).await;
    let response: Packet = (&reply[..]).read_bytes().unwrap();

    assert_eq!(response.version, Version::V4);
    assert_eq!(response.mode, Mode::Server);
    assert_eq!(response.stratum, Stratum::PRIMARY);
    assert_eq!(response.reference_id, ReferenceIdentifier::LOCL);
    assert_eq!(reply[0], 0x24);
}

#[tokio::test]
async fn echoes_client_transmit_as_origin() {
    let upstream = spawn_mock_upstream(3_913_056_000).await;
    let server = spawn_test_server(NtpServer::builder().upstream(upstream.to_string())).await;

    let client_transmit = TimestampFormat {
        seconds: 100,
        fraction: 200,
    };
    let reply = send_receive_raw(server, &client_request(client_transmit)).await;
    let response: Packet = (&reply[..]).read_bytes().unwrap();
    assert_eq!(response.origin_timestamp, client_transmit);
}

#[tokio::test]
async fn falls_back_to_local_clock_when_upstream_is_dead() {
    // TEST-NET-1, guaranteed unresponsive; short timeout keeps the test
    // fast.
    let server = spawn_test_server(
        NtpServer::builder()
            .upstream("192.0.2.1:123")
            .upstream_timeout(Duration::from_millis(200)),
    )
    .await;

    let before = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    let reply = send_receive_raw(server, &client_request(TimestampFormat::default())).await;
    let after = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let response: Packet = (&reply[..]).read_bytes().unwrap();
    let offset = current_offset();
    let served = response.transmit_timestamp.seconds as i64;
    assert!(served >= before + offset - 2 && served <= after + offset + 2);
}

#[tokio::test]
async fn drops_short_requests_silently() {
    let upstream = spawn_mock_upstream(3_913_056_000).await;
    let server = spawn_test_server(NtpServer::builder().upstream(upstream.to_string())).await;

    let no_reply =
        try_send_receive_raw(server, &[0u8; 10], Duration::from_millis(500)).await;
    assert!(no_reply.is_none());

    // The loop keeps serving after a malformed request.
    let reply = send_receive_raw(server, &client_request(TimestampFormat::default())).await;
    assert_eq!(reply.len(), Packet::PACKED_SIZE_BYTES);
}

#[tokio::test]
async fn answers_concurrent_clients() {
    let upstream = spawn_mock_upstream(3_913_056_000).await;
    let server = spawn_test_server(NtpServer::builder().upstream(upstream.to_string())).await;

    let mut handles = Vec::new();
    for i in 0..8u32 {
        handles.push(tokio::spawn(async move {
            let transmit = TimestampFormat {
                seconds: i,
                fraction: 0,
            };
            let reply = send_receive_raw(server, &client_request(transmit)).await;
            let response: Packet = (&reply[..]).read_bytes().unwrap();
            assert_eq!(response.origin_timestamp.seconds, i);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}
