// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the NTP server.
//!
//! All public APIs return `io::Result<T>`. Internally, errors are
//! constructed as [`NtpServerError`] variants and converted to
//! `io::Error` via `From`. Callers that want programmatic matching can
//! downcast via `io::Error::get_ref()`:
//!
//! ```no_run
//! use dst_server::error::NtpServerError;
//!
//! # fn example(result: std::io::Result<()>) {
//! if let Err(e) = result {
//!     if let Some(srv_err) = e
//!         .get_ref()
//!         .and_then(|inner| inner.downcast_ref::<NtpServerError>())
//!     {
//!         eprintln!("server error: {srv_err}");
//!     }
//! }
//! # }
//! ```

// Re-export the proto parse error for callers matching codec failures.
pub use dst_proto::error::ParseError;

use std::fmt;
use std::io;

/// Errors that can occur during NTP server operations.
#[derive(Debug)]
pub enum NtpServerError {
    /// Malformed or undersized client request.
    Protocol(ProtocolError),
    /// Underlying I/O error (socket bind, send/recv, etc.).
    Io(io::Error),
}

/// Protocol-level problems with an inbound client request.
///
/// A request that trips one of these is dropped without a reply; NTP
/// defines no error packet for a garbled query, and the serving loop
/// keeps running.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolError {
    /// Request datagram shorter than the 48-byte header, so it cannot
    /// carry a client transmit timestamp.
    RequestTooShort {
        /// Number of bytes received.
        received: usize,
    },
}

impl fmt::Display for NtpServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NtpServerError::Protocol(e) => write!(f, "protocol error: {e}"),
            NtpServerError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::RequestTooShort { received } => {
                write!(f, "request too short: {received} bytes, need 48")
            }
        }
    }
}

impl std::error::Error for NtpServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NtpServerError::Protocol(e) => Some(e),
            NtpServerError::Io(e) => Some(e),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<ProtocolError> for NtpServerError {
    fn from(e: ProtocolError) -> Self {
        NtpServerError::Protocol(e)
    }
}

impl From<io::Error> for NtpServerError {
    fn from(e: io::Error) -> Self {
        NtpServerError::Io(e)
    }
}

impl From<NtpServerError> for io::Error {
    fn from(err: NtpServerError) -> io::Error {
        match err {
            NtpServerError::Io(e) => e,
            NtpServerError::Protocol(_) => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_request_too_short() {
        let err = NtpServerError::Protocol(ProtocolError::RequestTooShort { received: 10 });
        assert_eq!(
            err.to_string(),
            "protocol error: request too short: 10 bytes, need 48"
        );
    }

    #[test]
    fn downcast_from_io_error() {
        let err: io::Error =
            NtpServerError::Protocol(ProtocolError::RequestTooShort { received: 0 }).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        let inner = err
            .get_ref()
            .and_then(|e| e.downcast_ref::<NtpServerError>());
        assert!(matches!(
            inner,
            Some(NtpServerError::Protocol(ProtocolError::RequestTooShort { received: 0 }))
        ));
    }

    #[test]
    fn io_error_passes_through() {
        let orig = io::Error::new(io::ErrorKind::AddrInUse, "bind failed");
        let err: io::Error = NtpServerError::from(orig).into();
        assert_eq!(err.kind(), io::ErrorKind::AddrInUse);
    }
}
