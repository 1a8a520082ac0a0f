// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for NTP packet parsing and serialization.
//!
//! [`ParseError`] implements [`std::error::Error`] and converts into
//! [`std::io::Error`], so codec failures flow through `io::Result`
//! call chains unchanged.

use std::fmt;
use std::io;

/// Errors that can occur while parsing or serializing an NTP packet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The buffer is too short for the expected data.
    ///
    /// This is the malformed-request case for inbound datagrams: anything
    /// shorter than the 48-byte header cannot carry a client transmit
    /// timestamp and is dropped by the server without a reply.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// An invalid or unrecognized field value was encountered.
    InvalidField {
        /// Name of the field that was invalid.
        field: &'static str,
        /// The invalid value.
        value: u32,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "buffer too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            ParseError::InvalidField { field, value } => {
                write!(f, "invalid {} value: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> io::Error {
        let kind = match &err {
            ParseError::BufferTooShort { .. } => io::ErrorKind::UnexpectedEof,
            ParseError::InvalidField { .. } => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}
