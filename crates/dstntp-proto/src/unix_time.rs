// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversions between the NTP timestamp format and Unix epoch time.
//!
//! NTP counts seconds from the prime epoch, 1900-01-01 00:00:00 UTC,
//! while Unix time counts from 1970-01-01 00:00:00 UTC. The two scales
//! differ by a fixed [`EPOCH_DELTA`] of 2,208,988,800 seconds.

use crate::protocol::TimestampFormat;

/// The number of seconds from 1st January 1900 UTC to the start of the
/// Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

// The NTP fractional scale (2^32).
const NTP_SCALE: f64 = 4_294_967_296.0;

/// Convert an NTP timestamp to Unix epoch seconds.
///
/// `seconds - EPOCH_DELTA + fraction / 2^32`. Pure numeric transform
/// with no error cases; the fractional component is preserved to the
/// resolution of `f64`.
pub fn to_unix_seconds(ts: TimestampFormat) -> f64 {
    ts.seconds as f64 - EPOCH_DELTA as f64 + ts.fraction as f64 / NTP_SCALE
}

/// Convert Unix epoch seconds to an NTP timestamp.
///
/// The seconds component is truncated to 32 bits; values past the era
/// boundary wrap mod 2^32, which matches the protocol's documented era
/// rollover behavior and is not an error. The fraction is quantized to
/// units of 2^-32.
pub fn from_unix_seconds(unix_seconds: f64) -> TimestampFormat {
    let whole = unix_seconds.floor();
    let frac = unix_seconds - whole;
    TimestampFormat {
        seconds: (whole as i64).wrapping_add(EPOCH_DELTA) as u32,
        fraction: (frac * NTP_SCALE) as u32,
    }
}

/// Convert whole Unix epoch seconds to an NTP timestamp with a zero
/// fraction.
///
/// Convenience for time sources with one-second resolution; wrapping
/// behaves as in [`from_unix_seconds`].
pub fn from_unix_whole_seconds(unix_seconds: i64) -> TimestampFormat {
    TimestampFormat {
        seconds: unix_seconds.wrapping_add(EPOCH_DELTA) as u32,
        fraction: 0,
    }
}
