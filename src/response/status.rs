// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device status parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::command::UpdateDeviceRequest;
use crate::types::scalar;
use crate::types::{AirFlow, HorizontalDirection, Lenient, OperationMode, WindDirection, WindVolume};

/// Snapshot of an appliance, as returned by the status endpoint.
///
/// Every field is optional. Enumerated fields are [`Lenient`], and keys this
/// struct does not model are kept in `extra`. Scalars are read tolerantly:
/// `"24.0"` parses as a temperature and `0`/`1` as a flag. A scalar of an
/// unusable type is dropped to `None` rather than failing the parse.
///
/// # Examples
///
/// ```
/// use eolia_lib::response::DeviceStatus;
/// use eolia_lib::types::OperationMode;
///
/// let json = r#"{
///     "operation_status": true,
///     "operation_mode": "Cooling",
///     "temperature": 26.0,
///     "wind_volume": 0,
///     "operation_token": "tok"
/// }"#;
/// let status: DeviceStatus = serde_json::from_str(json).unwrap();
/// assert!(status.is_on());
/// assert_eq!(status.mode(), Some(OperationMode::Cooling));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Appliance this status belongs to.
    #[serde(default, deserialize_with = "scalar::text")]
    pub appliance_id: Option<String>,

    /// Whether the unit is running.
    #[serde(default, deserialize_with = "scalar::flag")]
    pub operation_status: Option<bool>,

    /// Operating mode.
    pub operation_mode: Option<Lenient<OperationMode>>,

    /// Target temperature in °C.
    #[serde(default, deserialize_with = "scalar::number")]
    pub temperature: Option<f64>,

    /// Fan volume.
    pub wind_volume: Option<Lenient<WindVolume>>,

    /// Vertical louver position.
    pub wind_direction: Option<Lenient<WindDirection>>,

    /// Indoor relative humidity in %.
    #[serde(default, deserialize_with = "scalar::number")]
    pub inside_humidity: Option<f64>,

    /// Indoor temperature in °C.
    #[serde(default, deserialize_with = "scalar::number")]
    pub inside_temp: Option<f64>,

    /// Outdoor temperature in °C.
    #[serde(default, deserialize_with = "scalar::number")]
    pub outside_temp: Option<f64>,

    /// Vendor priority setting.
    pub operation_priority: Option<Value>,

    /// Timer setting.
    #[serde(default, deserialize_with = "scalar::integer")]
    pub timer_value: Option<i64>,

    /// Whether the unit reports an error.
    #[serde(default, deserialize_with = "scalar::flag")]
    pub device_errstatus: Option<bool>,

    /// Air quality mode.
    #[serde(default, deserialize_with = "scalar::flag")]
    pub airquality: Option<bool>,

    /// Nanoe X generator.
    #[serde(default, deserialize_with = "scalar::flag")]
    pub nanoex: Option<bool>,

    /// Air quality reading.
    #[serde(default, deserialize_with = "scalar::integer")]
    pub aq_value: Option<i64>,

    /// Air quality label.
    #[serde(default, deserialize_with = "scalar::text")]
    pub aq_name: Option<String>,

    /// AI control setting.
    pub ai_control: Option<Value>,

    /// Air-flow preset.
    pub air_flow: Option<Lenient<AirFlow>>,

    /// Wind shield setting.
    pub wind_shield_hit: Option<Value>,

    /// Horizontal louver position.
    pub wind_direction_horizon: Option<Lenient<HorizontalDirection>>,

    /// Token that authorizes the next write.
    #[serde(default, deserialize_with = "scalar::text")]
    pub operation_token: Option<String>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceStatus {
    /// Returns true if the unit reports that it is running.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.operation_status.unwrap_or(false)
    }

    /// Returns the operating mode, if recognized.
    #[must_use]
    pub fn mode(&self) -> Option<OperationMode> {
        self.operation_mode.as_ref().and_then(Lenient::known).copied()
    }

    /// Returns the fan volume, if recognized.
    #[must_use]
    pub fn fan_volume(&self) -> Option<WindVolume> {
        self.wind_volume.as_ref().and_then(Lenient::known).copied()
    }

    /// Returns the air-flow preset, if recognized.
    #[must_use]
    pub fn preset(&self) -> Option<AirFlow> {
        self.air_flow.as_ref().and_then(Lenient::known).copied()
    }

    /// Returns the vertical louver position, if recognized.
    #[must_use]
    pub fn swing(&self) -> Option<WindDirection> {
        self.wind_direction.as_ref().and_then(Lenient::known).copied()
    }

    /// Builds a write request that carries every writable field of this status.
    #[must_use]
    pub fn to_update_request(&self) -> UpdateDeviceRequest {
        UpdateDeviceRequest::from(self)
    }
}
