// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request timestamp for the `X-Eolia-Date` header.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Offset of Japan Standard Time from UTC, in seconds.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Formats `now` as the JST wall-clock time expected in `X-Eolia-Date`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use eolia_lib::types::eolia_timestamp;
///
/// let now = Utc.with_ymd_and_hms(2024, 7, 1, 20, 30, 0).unwrap();
/// assert_eq!(eolia_timestamp(now), "2024-07-02T05:30:00");
/// ```
#[must_use]
pub fn eolia_timestamp(now: DateTime<Utc>) -> String {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&jst)
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}
