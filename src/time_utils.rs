// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Clamp a client-reported timestamp so it never lies in the server's future.
pub fn clamp_to_now(reported: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    reported.map_or(now, |at| at.min(now))
}
