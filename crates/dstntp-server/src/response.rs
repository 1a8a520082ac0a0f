// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request decoding and response construction.
//!
//! The serving path extracts exactly one field from an inbound request
//! (the client's transmit timestamp, echoed back as the origin
//! timestamp) and builds a fixed-shape stratum-1 response around the
//! shifted seconds value. All other inbound header fields are ignored.

use std::io;

use crate::error::ProtocolError;
use crate::protocol::{
    ConstPackedSizeBytes, LeapIndicator, Mode, Packet, ReadBytes, ReferenceIdentifier, Stratum,
    TimestampFormat, Version, WriteBytes,
};

/// Poll interval advertised in responses, in log2 seconds (16s).
pub const RESPONSE_POLL: i8 = 4;

/// Clock precision advertised in responses, in log2 seconds (~1us).
pub const RESPONSE_PRECISION: i8 = -20;

/// Extract the client's transmit timestamp from a request datagram.
///
/// Fails with [`ProtocolError::RequestTooShort`] (as an
/// `io::ErrorKind::InvalidData` error) if fewer than 48 bytes arrived;
/// such requests carry no usable timestamp and are dropped without a
/// reply.
pub fn decode_client_transmit(buf: &[u8], len: usize) -> io::Result<TimestampFormat> {
    if len < Packet::PACKED_SIZE_BYTES {
        return Err(crate::error::NtpServerError::from(ProtocolError::RequestTooShort {
            received: len,
        })
        .into());
    }
    let request: Packet = (&buf[..Packet::PACKED_SIZE_BYTES]).read_bytes()?;
    Ok(request.transmit_timestamp)
}

/// Encode the 48-byte response for a client.
///
/// `spoofed_seconds` is written verbatim into the seconds word of the
/// reference, receive, and transmit timestamps (truncated mod 2^32,
/// fraction zero); `client_transmit` is echoed as the origin timestamp
/// so the client's sanity check passes.
pub fn build_response(
    spoofed_seconds: i64,
    client_transmit: TimestampFormat,
) -> io::Result<[u8; Packet::PACKED_SIZE_BYTES]> {
    let stamp = TimestampFormat {
        seconds: spoofed_seconds as u32,
        fraction: 0,
    };
    let response = Packet {
        leap_indicator: LeapIndicator::NoWarning,
        version: Version::V4,
        mode: Mode::Server,
        stratum: Stratum::PRIMARY,
        poll: RESPONSE_POLL,
        precision: RESPONSE_PRECISION,
        reference_id: ReferenceIdentifier::LOCL,
        reference_timestamp: stamp,
        origin_timestamp: client_transmit,
        receive_timestamp: stamp,
        transmit_timestamp: stamp,
        ..Packet::default()
    };
    let mut buf = [0u8; Packet::PACKED_SIZE_BYTES];
    (&mut buf[..]).write_bytes(response)?;
    Ok(buf)
}
