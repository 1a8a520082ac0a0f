// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Daylight-saving offset policy based on first Sundays.
//!
//! The year is partitioned by the first Sunday of two configured months
//! (April and October by default). Inside the half-open window
//! `[first Sunday of April, first Sunday of October)` no offset applies;
//! everywhere else the reported time is shifted forward one hour.
//!
//! The window labels follow the reference deployment's Southern
//! Hemisphere convention (the April-October stretch is the *unshifted*
//! season). The labels are internal; only the boundary comparisons
//! matter, and they are half-open: inclusive at the window start,
//! exclusive at the window end.
//!
//! Zone policy: the live serving path evaluates the policy against the
//! process's local calendar date ([`DstPolicy::offset_seconds_now`]),
//! matching the reference behavior. [`DstPolicy::offset_seconds`] takes
//! the instant explicitly so callers and tests can pin exact dates.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// One hour, in seconds.
pub const OFFSET_SECONDS: i64 = 3600;

/// The first-Sunday window policy deciding whether the one-hour shift
/// applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DstPolicy {
    window_start_month: u32,
    window_end_month: u32,
}

impl Default for DstPolicy {
    /// The reference window: April through October.
    fn default() -> Self {
        DstPolicy::new(4, 10)
    }
}

impl DstPolicy {
    /// Create a policy with the window delimited by the first Sundays of
    /// the given months.
    ///
    /// # Panics
    ///
    /// Panics if either month is outside `1..=12`.
    pub fn new(window_start_month: u32, window_end_month: u32) -> Self {
        if !(1..=12).contains(&window_start_month) || !(1..=12).contains(&window_end_month) {
            panic!(
                "invalid DST window months: {window_start_month}, {window_end_month} (must be 1-12)"
            );
        }
        DstPolicy {
            window_start_month,
            window_end_month,
        }
    }

    /// The first Sunday of the given month.
    ///
    /// Computed as the first day of the month plus the days remaining
    /// until Sunday in a Monday-start week.
    pub fn first_sunday(year: i32, month: u32) -> NaiveDate {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .expect("month validated at policy construction");
        let days_until_sunday =
            Weekday::Sun.num_days_from_monday() - first.weekday().num_days_from_monday();
        first + Days::new(days_until_sunday as u64)
    }

    /// The offset to apply for the given local instant: `0` inside the
    /// window, [`OFFSET_SECONDS`] outside it.
    ///
    /// The window runs from the first Sunday of the start month at
    /// midnight (inclusive) to the first Sunday of the end month at
    /// midnight (exclusive).
    pub fn offset_seconds(&self, now: NaiveDateTime) -> i64 {
        let window_start =
            Self::first_sunday(now.year(), self.window_start_month).and_time(NaiveTime::MIN);
        let window_end =
            Self::first_sunday(now.year(), self.window_end_month).and_time(NaiveTime::MIN);

        if window_start <= now && now < window_end {
            0
        } else {
            OFFSET_SECONDS
        }
    }

    /// The offset for the current local calendar time.
    pub fn offset_seconds_now(&self) -> i64 {
        self.offset_seconds(Local::now().naive_local())
    }
}
