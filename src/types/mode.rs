// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operation mode of an air conditioner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating mode reported in `operation_mode`.
///
/// The wire strings are the ones used by the Eolia app.
///
/// # Examples
///
/// ```
/// use eolia_lib::types::OperationMode;
///
/// assert_eq!(OperationMode::Dry.as_str(), "CoolDehumidifying");
/// assert_eq!(OperationMode::Fan.as_str(), "Blast");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    /// Unit stopped.
    #[serde(rename = "Stop")]
    Off,
    /// Cooling.
    #[serde(rename = "Cooling")]
    Cooling,
    /// Heating.
    #[serde(rename = "Heating")]
    Heating,
    /// Automatic heat/cool.
    #[serde(rename = "Auto")]
    Auto,
    /// Dehumidifying.
    #[serde(rename = "CoolDehumidifying")]
    Dry,
    /// Fan only.
    #[serde(rename = "Blast")]
    Fan,
    /// Nanoe air purification only.
    #[serde(rename = "Nanoe")]
    Nanoe,
}

impl OperationMode {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Stop",
            Self::Cooling => "Cooling",
            Self::Heating => "Heating",
            Self::Auto => "Auto",
            Self::Dry => "CoolDehumidifying",
            Self::Fan => "Blast",
            Self::Nanoe => "Nanoe",
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_wire_names() {
        for mode in [
            OperationMode::Off,
            OperationMode::Cooling,
            OperationMode::Heating,
            OperationMode::Auto,
            OperationMode::Dry,
            OperationMode::Fan,
            OperationMode::Nanoe,
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn rejects_unknown_string() {
        assert!(serde_json::from_str::<OperationMode>("\"Warm\"").is_err());
    }
}
