// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTPv4 packet header types, wire codec, and timestamp conversions.
//!
//! This crate provides the on-wire types for the 48-byte NTPv4 packet
//! header (RFC 5905) together with big-endian read/write codecs and the
//! 1900-epoch / Unix-epoch timestamp conversions. It contains no
//! networking; the `dstntp-server` crate builds on it.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Custom error types for NTP packet parsing and serialization.
pub mod error;

/// NTP protocol types and the big-endian wire codec (RFC 5905).
pub mod protocol;

/// Conversions between NTP timestamps and Unix epoch time.
pub mod unix_time;
