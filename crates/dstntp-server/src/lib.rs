// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP server that reports upstream time shifted by a daylight-saving
//! window.
//!
//! The server answers NTPv4 client queries with a timestamp fetched from
//! an upstream NTP authority and shifted by +1 hour whenever the current
//! local date falls outside a configured first-Sunday-to-first-Sunday
//! window (April to October by default). Responses are structurally
//! valid stratum-1 packets, so any generic NTP client accepts them.
//!
//! # Architecture
//!
//! Each inbound datagram is handled on its own tokio task: decode the
//! client's transmit timestamp, fetch-and-shift the time, encode the
//! response, send it. No state is shared between requests beyond the
//! listening socket.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use dst_server::server::NtpServer;
//!
//! let server = NtpServer::builder()
//!     .listen("0.0.0.0:124")
//!     .upstream("au.pool.ntp.org:123")
//!     .build()
//!     .await?;
//!
//! server.run().await
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Re-export protocol types from dst_proto for convenience.
pub use dst_proto::{protocol, unix_time};

/// Server configuration assembled by the builder.
pub mod config;

/// Daylight-saving offset policy based on first Sundays.
pub mod dst;

/// Custom error types for the NTP server.
pub mod error;

/// Request decoding and response construction.
pub mod response;

/// The tokio UDP server loop.
pub mod server;

/// The shifted time provider composing upstream fetch and DST offset.
pub mod spoof;

/// Upstream NTP time source with local-clock fallback.
pub mod upstream;
