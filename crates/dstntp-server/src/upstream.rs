// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Upstream NTP time source with local-clock fallback.
//!
//! [`UpstreamTimeSource::fetch`] is total: it either returns the
//! upstream authority's time or, on any failure (timeout, resolution
//! error, short or garbled response), the local system clock's time.
//! The two outcomes stay distinguishable in [`FetchedTime`] so callers
//! and logs can tell which branch was taken, but both always carry a
//! usable value.
//!
//! ## Time scales
//!
//! The upstream branch carries the response's transmit-timestamp
//! seconds field verbatim: seconds counted from the 1900 NTP epoch. The
//! fallback branch carries Unix seconds. The two scales differ by
//! [`unix_time::EPOCH_DELTA`] (~70 years) and are intentionally not
//! reconciled here; the reference deployment serves the raw upstream
//! field, and downstream compatibility depends on reproducing that
//! exactly. [`FetchedTime::approx_unix_seconds`] rebases the upstream
//! branch for diagnostics only.

use std::io;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use tokio::net::UdpSocket;

use crate::error::ParseError;
use crate::protocol::{
    ConstPackedSizeBytes, Mode, Packet, ReadBytes, Version, WriteBytes,
};
use crate::unix_time;

/// A time value obtained by [`UpstreamTimeSource::fetch`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FetchedTime {
    /// The upstream authority answered.
    Upstream {
        /// Raw transmit-timestamp seconds from the response, counted
        /// from the 1900 NTP epoch.
        seconds: i64,
    },
    /// The upstream was unreachable; this is the local system clock.
    LocalClock {
        /// Unix epoch seconds from the local clock.
        seconds: i64,
    },
}

impl FetchedTime {
    /// The fetched seconds value, whichever branch produced it.
    pub fn seconds(&self) -> i64 {
        match *self {
            FetchedTime::Upstream { seconds } => seconds,
            FetchedTime::LocalClock { seconds } => seconds,
        }
    }

    /// Whether this value came from the local-clock fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchedTime::LocalClock { .. })
    }

    /// A Unix-epoch rendering of the value, for diagnostics.
    ///
    /// Rebases the upstream branch by [`unix_time::EPOCH_DELTA`]; the
    /// fallback branch is already Unix time.
    pub fn approx_unix_seconds(&self) -> i64 {
        match *self {
            FetchedTime::Upstream { seconds } => seconds - unix_time::EPOCH_DELTA,
            FetchedTime::LocalClock { seconds } => seconds,
        }
    }
}

/// Fetches a reference time from a remote NTP authority over UDP.
#[derive(Clone, Debug)]
pub struct UpstreamTimeSource {
    addr: String,
    timeout: Duration,
}

impl UpstreamTimeSource {
    /// Create a source that queries `addr` (`host:port`) and waits at
    /// most `timeout` for each response.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        UpstreamTimeSource {
            addr: addr.into(),
            timeout,
        }
    }

    /// The configured upstream address.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Fetch the current time.
    ///
    /// Never fails: any upstream problem degrades to the local system
    /// clock, with the failure logged at warn level.
    pub async fn fetch(&self) -> FetchedTime {
        match self.query_upstream().await {
            Ok(seconds) => {
                debug!(
                    "upstream {} reported {} (unix ~{})",
                    self.addr,
                    seconds,
                    seconds - unix_time::EPOCH_DELTA
                );
                FetchedTime::Upstream { seconds }
            }
            Err(e) => {
                warn!(
                    "failed to get time from upstream {}: {}; falling back to local clock",
                    self.addr, e
                );
                FetchedTime::LocalClock {
                    seconds: local_unix_seconds(),
                }
            }
        }
    }

    /// One request/response round trip to the upstream authority.
    async fn query_upstream(&self) -> io::Result<i64> {
        let resolved: Vec<SocketAddr> =
            tokio::net::lookup_host(self.addr.as_str()).await?.collect();
        let target = *resolved.first().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "upstream address resolved to no socket addresses",
            )
        })?;

        let sock = UdpSocket::bind(bind_addr_for(&target)).await?;
        let send_buf = build_probe_packet()?;
        sock.send_to(&send_buf, target).await?;
        debug!("sent {} byte probe to {}", send_buf.len(), target);

        let mut recv_buf = [0u8; 1024];
        let (recv_len, src_addr) =
            tokio::time::timeout(self.timeout, sock.recv_from(&mut recv_buf))
                .await
                .map_err(|_| {
                    io::Error::new(io::ErrorKind::TimedOut, "upstream response timed out")
                })??;
        debug!("recv: {} bytes from {}", recv_len, src_addr);

        if recv_len < Packet::PACKED_SIZE_BYTES {
            return Err(ParseError::BufferTooShort {
                needed: Packet::PACKED_SIZE_BYTES,
                available: recv_len,
            }
            .into());
        }

        let response: Packet = (&recv_buf[..Packet::PACKED_SIZE_BYTES]).read_bytes()?;
        // Raw 1900-epoch seconds, served onward without rebasing.
        Ok(response.transmit_timestamp.seconds as i64)
    }
}

/// Select the bind address matching the target's address family.
fn bind_addr_for(target: &SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

/// The minimal client probe: first byte `0x1B` (LI=0, VN=3, Mode=3),
/// everything else zero.
fn build_probe_packet() -> io::Result<[u8; Packet::PACKED_SIZE_BYTES]> {
    let probe = Packet {
        version: Version::V3,
        mode: Mode::Client,
        ..Packet::default()
    };
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut buf[..]).write_bytes(probe)?;
    Ok(buf)
}

/// Current Unix time from the system clock, in whole seconds.
fn local_unix_seconds() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_secs() as i64,
        Err(err) => -(err.duration().as_secs() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Stratum, TimestampFormat};

    #[test]
    fn probe_packet_is_raw_sntp_request() {
        let buf = build_probe_packet().unwrap();
        assert_eq!(buf[0], 0x1B);
        assert!(buf[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn fetched_time_accessors() {
        let up = FetchedTime::Upstream {
            seconds: 3_913_056_000,
        };
        assert_eq!(up.seconds(), 3_913_056_000);
        assert!(!up.is_fallback());
        assert_eq!(up.approx_unix_seconds(), 1_704_067_200);

        let local = FetchedTime::LocalClock {
            seconds: 1_704_067_200,
        };
        assert_eq!(local.seconds(), 1_704_067_200);
        assert!(local.is_fallback());
        assert_eq!(local.approx_unix_seconds(), 1_704_067_200);
    }

    async fn spawn_fixed_upstream(transmit_seconds: u32) -> SocketAddr {
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

    #[tokio::test]
    async fn fetch_returns_raw_upstream_seconds() {
        let addr = spawn_fixed_upstream(3_913_056_000).await;
        let source = UpstreamTimeSource::new(addr.to_string(), Duration::from_secs(2));
        let fetched = source.fetch().await;
        // The raw 1900-epoch field passes through unconverted.
        assert_eq!(
            fetched,
            FetchedTime::Upstream {
                seconds: 3_913_056_000
            }
        );
    }

    #[tokio::test]
    async fn fetch_falls_back_on_timeout() {
        // 192.0.2.0/24 (TEST-NET-1) never answers.
        let source = UpstreamTimeSource::new("192.0.2.1:123", Duration::from_millis(200));
        let before = local_unix_seconds();
        let fetched = source.fetch().await;
        let after = local_unix_seconds();

        assert!(fetched.is_fallback());
        assert!(fetched.seconds() >= before - 2 && fetched.seconds() <= after + 2);
    }

    #[tokio::test]
    async fn fetch_falls_back_on_short_response() {
        let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = sock.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            while let Ok((_, src)) = sock.recv_from(&mut buf).await {
                let _ = sock.send_to(&[0u8; 10], src).await;
            }
        });

        let source = UpstreamTimeSource::new(addr.to_string(), Duration::from_secs(2));
        let fetched = source.fetch().await;
        assert!(fetched.is_fallback());
    }
}
