// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan volume and air-flow preset types.
//!
//! `wind_volume` is an ordered numeric scale where `0` means automatic.
//! `air_flow` is a separate preset (quiet / powerful) that the unit couples
//! with the fan volume: choosing a preset puts the volume back to automatic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fan volume reported in `wind_volume`.
///
/// Variants are declared in increasing strength, so they compare in order.
///
/// # Examples
///
/// ```
/// use eolia_lib::types::WindVolume;
///
/// assert_eq!(WindVolume::Auto.value(), 0);
/// assert!(WindVolume::Low < WindVolume::High);
/// assert_eq!(WindVolume::try_from(5), Ok(WindVolume::High));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum WindVolume {
    /// Automatic fan speed.
    Auto,
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// Medium high.
    MediumHigh,
    /// High.
    High,
    /// Very high.
    VeryHigh,
}

impl WindVolume {
    /// Returns the numeric value used by the API.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::Low => 2,
            Self::Medium => 3,
            Self::MediumHigh => 4,
            Self::High => 5,
            Self::VeryHigh => 6,
        }
    }
}

impl TryFrom<u8> for WindVolume {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Auto),
            2 => Ok(Self::Low),
            3 => Ok(Self::Medium),
            4 => Ok(Self::MediumHigh),
            5 => Ok(Self::High),
            6 => Ok(Self::VeryHigh),
            other => Err(format!("unknown wind volume {other}")),
        }
    }
}

impl From<WindVolume> for u8 {
    fn from(volume: WindVolume) -> Self {
        volume.value()
    }
}

impl fmt::Display for WindVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::MediumHigh => "medium_high",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        };
        f.write_str(name)
    }
}

/// Air-flow preset reported in `air_flow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirFlow {
    /// No preset.
    NotSet,
    /// Quiet operation.
    Quiet,
    /// Powerful operation.
    Powerful,
}

impl AirFlow {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotSet => "not_set",
            Self::Quiet => "quiet",
            Self::Powerful => "powerful",
        }
    }

    /// Returns true if selecting this preset forces the fan volume to automatic.
    #[must_use]
    pub const fn resets_wind_volume(&self) -> bool {
        matches!(self, Self::Quiet | Self::Powerful)
    }
}

impl fmt::Display for AirFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
