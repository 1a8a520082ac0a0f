// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The tokio UDP server loop.
//!
//! [`NtpServer::run`] receives datagrams on the bound socket and spawns
//! one task per request. Each task decodes the client's transmit
//! timestamp, asks the [`SpoofedClock`] for the shifted time (which may
//! block on the upstream round trip), and sends the response. A slow or
//! dead upstream therefore delays only the requests in flight, never the
//! receive loop itself.
//!
//! Malformed requests and transient socket errors are logged and
//! dropped; the loop only exits if `recv_from` itself fails.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::dst::DstPolicy;
use crate::response;
use crate::spoof::SpoofedClock;
use crate::upstream::UpstreamTimeSource;

/// Builder for [`NtpServer`].
///
/// All knobs default to the values in [`crate::config`]; call
/// [`build`](Self::build) to bind the socket.
#[derive(Clone, Debug, Default)]
pub struct NtpServerBuilder {
    config: ServerConfig,
}

impl NtpServerBuilder {
    /// Begin building with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the address the UDP socket binds to.
    pub fn listen(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the `host:port` of the upstream NTP authority.
    pub fn upstream(mut self, addr: impl Into<String>) -> Self {
        self.config.upstream_addr = addr.into();
        self
    }

    /// Set how long to wait for the upstream before falling back to the
    /// local clock.
    pub fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.config.upstream_timeout = timeout;
        self
    }

    /// Set the months whose first Sundays delimit the no-offset window.
    ///
    /// # Panics
    ///
    /// [`build`](Self::build) panics if either month is outside `1..=12`.
    pub fn dst_window(mut self, start_month: u32, end_month: u32) -> Self {
        self.config.window_start_month = start_month;
        self.config.window_end_month = end_month;
        self
    }

    /// Bind the socket and assemble the server.
    pub async fn build(self) -> io::Result<NtpServer> {
        let dst = DstPolicy::new(self.config.window_start_month, self.config.window_end_month);
        let upstream = UpstreamTimeSource::new(
            self.config.upstream_addr.clone(),
            self.config.upstream_timeout,
        );
        let sock = UdpSocket::bind(&self.config.listen_addr).await?;
        debug!("listening on {}", sock.local_addr()?);
        Ok(NtpServer {
            sock: Arc::new(sock),
            clock: Arc::new(SpoofedClock::new(upstream, dst)),
        })
    }
}

/// A bound NTP server ready to answer client queries.
#[derive(Debug)]
pub struct NtpServer {
    sock: Arc<UdpSocket>,
    clock: Arc<SpoofedClock>,
}

impl NtpServer {
    /// Start building a server.
    pub fn builder() -> NtpServerBuilder {
        NtpServerBuilder::new()
    }

    /// The address the server is bound to.
    ///
    /// Useful when binding port 0 in tests.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Serve requests until `recv_from` fails.
    pub async fn run(&self) -> io::Result<()> {
        let mut buf = [0u8; 1024];
        loop {
            let (len, peer) = self.sock.recv_from(&mut buf).await?;
            debug!("recv: {} bytes from {}", len, peer);

            let datagram = buf[..len].to_vec();
            let sock = Arc::clone(&self.sock);
            let clock = Arc::clone(&self.clock);
            tokio::spawn(async move {
                if let Err(e) = handle_request(&sock, &clock, &datagram, peer).await {
                    warn!("dropping request from {}: {}", peer, e);
                }
            });
        }
    }
}

/// Answer one client datagram.
async fn handle_request(
    sock: &UdpSocket,
    clock: &SpoofedClock,
    datagram: &[u8],
    peer: SocketAddr,
) -> io::Result<()> {
    let client_transmit = response::decode_client_transmit(datagram, datagram.len())?;
    let spoofed_seconds = clock.now().await;
    let reply = response::build_response(spoofed_seconds, client_transmit)?;
    sock.send_to(&reply, peer).await?;
    debug!("sent {} bytes to {}", reply.len(), peer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_binds_requested_addr() {
        let server = NtpServer::builder()
            .listen("127.0.0.1:0")
            .upstream("127.0.0.1:123")
            .build()
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        assert_eq!(addr.ip(), std::net::Ipv4Addr::LOCALHOST);
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn builder_rejects_unbindable_addr() {
        let result = NtpServer::builder().listen("256.0.0.1:0").build().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[should_panic(expected = "invalid DST window months")]
    async fn builder_panics_on_bad_window() {
        let _ = NtpServer::builder()
            .listen("127.0.0.1:0")
            .dst_window(0, 13)
            .build()
            .await;
    }
}
