// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Louver direction types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vertical louver position reported in `wind_direction`.
///
/// Positions are declared top to bottom; `Auto` and `Swing` bracket them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum WindDirection {
    /// Automatic.
    Auto,
    /// Top.
    Top,
    /// Between top and middle.
    MiddleTop,
    /// Middle.
    Middle,
    /// Between middle and bottom.
    MiddleBottom,
    /// Bottom.
    Bottom,
    /// Continuous swing.
    Swing,
}

impl WindDirection {
    /// Returns the numeric value used by the API.
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Auto => 0,
            Self::Top => 1,
            Self::MiddleTop => 2,
            Self::Middle => 3,
            Self::MiddleBottom => 4,
            Self::Bottom => 5,
            Self::Swing => 6,
        }
    }
}

impl TryFrom<u8> for WindDirection {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Top),
            2 => Ok(Self::MiddleTop),
            3 => Ok(Self::Middle),
            4 => Ok(Self::MiddleBottom),
            5 => Ok(Self::Bottom),
            6 => Ok(Self::Swing),
            other => Err(format!("unknown wind direction {other}")),
        }
    }
}

impl From<WindDirection> for u8 {
    fn from(direction: WindDirection) -> Self {
        direction.value()
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Top => "top",
            Self::MiddleTop => "middle_top",
            Self::Middle => "middle",
            Self::MiddleBottom => "middle_bottom",
            Self::Bottom => "bottom",
            Self::Swing => "swing",
        };
        f.write_str(name)
    }
}

/// Horizontal louver position reported in `wind_direction_horizon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalDirection {
    /// Automatic.
    Auto,
    /// Far left.
    ToLeft,
    /// Slightly left.
    NearbyLeft,
    /// Straight ahead.
    Front,
    /// Slightly right.
    NearbyRight,
    /// Far right.
    ToRight,
}

impl HorizontalDirection {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::ToLeft => "to_left",
            Self::NearbyLeft => "nearby_left",
            Self::Front => "front",
            Self::NearbyRight => "nearby_right",
            Self::ToRight => "to_right",
        }
    }
}

impl fmt::Display for HorizontalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
