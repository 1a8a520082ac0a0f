// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Server configuration assembled by the builder.
//!
//! Everything the serving path needs is carried in one explicit
//! [`ServerConfig`] value passed into constructors; there are no
//! module-level tunables.

use std::time::Duration;

use crate::protocol;

/// Default listen address.
///
/// Port 124 rather than the well-known 123, so a development instance
/// never collides with a real NTP service on the same host. Standard
/// clients query port 123, so a production deployment must either bind
/// 123 or redirect; that is a deployment concern, not a protocol one.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:124";

/// Default upstream time authority.
pub const DEFAULT_UPSTREAM: &str = "au.pool.ntp.org";

/// Default upstream fetch timeout.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(2);

/// Default first month of the no-offset window (April).
pub const DEFAULT_WINDOW_START_MONTH: u32 = 4;

/// Default end month of the no-offset window (October).
pub const DEFAULT_WINDOW_END_MONTH: u32 = 10;

/// Complete configuration for an [`NtpServer`](crate::server::NtpServer).
///
/// Produced by [`NtpServerBuilder`](crate::server::NtpServerBuilder);
/// the defaults match the reference deployment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the UDP socket binds to.
    pub listen_addr: String,
    /// `host:port` of the upstream NTP authority.
    pub upstream_addr: String,
    /// How long to wait for an upstream response before falling back to
    /// the local clock.
    pub upstream_timeout: Duration,
    /// First month of the no-offset window (1-12).
    pub window_start_month: u32,
    /// End month of the no-offset window (1-12).
    pub window_end_month: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            upstream_addr: format!("{}:{}", DEFAULT_UPSTREAM, protocol::PORT),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            window_start_month: DEFAULT_WINDOW_START_MONTH,
            window_end_month: DEFAULT_WINDOW_END_MONTH,
        }
    }
}
