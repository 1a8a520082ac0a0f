// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The shifted time provider composing upstream fetch and DST offset.

use log::debug;

use crate::dst::DstPolicy;
use crate::upstream::{FetchedTime, UpstreamTimeSource};

/// Produces the seconds value served to clients: the upstream (or
/// fallback) time plus the policy's current offset.
#[derive(Clone, Debug)]
pub struct SpoofedClock {
    upstream: UpstreamTimeSource,
    dst: DstPolicy,
}

impl SpoofedClock {
    /// Combine an upstream source with a DST policy.
    pub fn new(upstream: UpstreamTimeSource, dst: DstPolicy) -> Self {
        SpoofedClock { upstream, dst }
    }

    /// The DST policy in effect.
    pub fn policy(&self) -> DstPolicy {
        self.dst
    }

    /// Fetch the current time and apply the offset for today's date.
    ///
    /// Total for the same reason [`UpstreamTimeSource::fetch`] is: a
    /// dead upstream degrades to the local clock rather than an error.
    pub async fn now(&self) -> i64 {
        let fetched = self.upstream.fetch().await;
        let offset = self.dst.offset_seconds_now();
        let shifted = fetched.seconds() + offset;
        debug!(
            "serving {} ({} {} + offset {})",
            shifted,
            if fetched.is_fallback() {
                "local"
            } else {
                "upstream"
            },
            fetched.seconds(),
            offset
        );
        shifted
    }

    /// Like [`now`](Self::now), but also reports which source answered.
    pub async fn now_detailed(&self) -> (i64, FetchedTime) {
        let fetched = self.upstream.fetch().await;
        let offset = self.dst.offset_seconds_now();
        (fetched.seconds() + offset, fetched)
    }
}
