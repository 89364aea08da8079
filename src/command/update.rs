// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status update request.

use serde::{Serialize, Serializer};

use crate::response::DeviceStatus;
use crate::types::{AirFlow, HorizontalDirection, Lenient, OperationMode, WindDirection, WindVolume};

/// Body of `PUT /eolia/v6/devices/{id}/status`.
///
/// The API expects the complete writable state on every write, so a request
/// is built from the last [`DeviceStatus`] and only the intended fields are
/// then overridden. Unset fields are sent as `null`.
///
/// # Examples
///
/// ```
/// use eolia_lib::command::UpdateDeviceRequest;
/// use eolia_lib::response::DeviceStatus;
/// use eolia_lib::types::OperationMode;
///
/// let status: DeviceStatus = serde_json::from_str(
///     r#"{"operation_mode": "Cooling", "temperature": 26.0, "wind_volume": 5}"#,
/// ).unwrap();
///
/// let request = status.to_update_request().with_temperature(24.0);
/// assert_eq!(request.temperature, Some(24.0));
/// assert!(request.operation_mode.unwrap().is(&OperationMode::Cooling));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UpdateDeviceRequest {
    /// Nanoe X generator.
    pub nanoex: Option<bool>,

    /// Whether the unit should run.
    pub operation_status: Option<bool>,

    /// Air quality mode.
    pub airquality: Option<bool>,

    /// Fan volume.
    pub wind_volume: Option<Lenient<WindVolume>>,

    /// Target temperature in °C, sent as a string.
    #[serde(serialize_with = "serialize_temperature")]
    pub temperature: Option<f64>,

    /// Operating mode.
    pub operation_mode: Option<Lenient<OperationMode>>,

    /// Vertical louver position.
    pub wind_direction: Option<Lenient<WindDirection>>,

    /// Timer setting, sent as a string.
    #[serde(serialize_with = "serialize_timer")]
    pub timer_value: Option<i64>,

    /// Token from the previous read or write.
    pub operation_token: Option<String>,

    /// Horizontal louver position.
    pub wind_direction_horizon: Option<Lenient<HorizontalDirection>>,

    /// Air-flow preset.
    pub air_flow: Option<Lenient<AirFlow>>,
}

impl UpdateDeviceRequest {
    /// Sets the target temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the operating mode and power state.
    #[must_use]
    pub fn with_mode(mut self, mode: OperationMode, on: bool) -> Self {
        self.operation_mode = Some(mode.into());
        self.operation_status = Some(on);
        self
    }

    /// Sets the power state, keeping the mode.
    #[must_use]
    pub fn with_power(mut self, on: bool) -> Self {
        self.operation_status = Some(on);
        self
    }

    /// Sets the fan volume.
    #[must_use]
    pub fn with_wind_volume(mut self, volume: WindVolume) -> Self {
        self.wind_volume = Some(volume.into());
        self
    }

    /// Sets the air-flow preset.
    ///
    /// Quiet and powerful presets also put the fan volume back to automatic,
    /// which is how the unit itself couples the two settings.
    #[must_use]
    pub fn with_air_flow(mut self, air_flow: AirFlow) -> Self {
        self.air_flow = Some(air_flow.into());
        if air_flow.resets_wind_volume() {
            self.wind_volume = Some(WindVolume::Auto.into());
        }
        self
    }

    /// Sets the vertical louver position.
    #[must_use]
    pub fn with_wind_direction(mut self, direction: WindDirection) -> Self {
        self.wind_direction = Some(direction.into());
        self
    }

    /// Sets the horizontal louver position.
    #[must_use]
    pub fn with_horizontal_direction(mut self, direction: HorizontalDirection) -> Self {
        self.wind_direction_horizon = Some(direction.into());
        self
    }

    /// Sets or clears the operation token.
    #[must_use]
    pub fn with_operation_token(mut self, token: Option<String>) -> Self {
        self.operation_token = token;
        self
    }
}

impl From<&DeviceStatus> for UpdateDeviceRequest {
    fn from(status: &DeviceStatus) -> Self {
        Self {
            nanoex: status.nanoex,
            operation_status: status.operation_status,
            airquality: status.airquality,
            wind_volume: status.wind_volume.clone(),
            temperature: status.temperature,
            operation_mode: status.operation_mode.clone(),
            wind_direction: status.wind_direction.clone(),
            timer_value: status.timer_value,
            operation_token: status.operation_token.clone(),
            wind_direction_horizon: status.wind_direction_horizon.clone(),
            air_flow: status.air_flow.clone(),
        }
    }
}

// The app sends temperature as "24.0" and the timer as "0".
#[allow(clippy::ref_option)]
fn serialize_temperature<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(temperature) => serializer.collect_str(&format_args!("{temperature:.1}")),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::ref_option)]
fn serialize_timer<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(timer) => serializer.collect_str(timer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cooling_status() -> DeviceStatus {
        serde_json::from_value(json!({
            "appliance_id": "A1",
            "operation_status": true,
            "operation_mode": "Cooling",
            "temperature": 26.0,
            "wind_volume": 5,
            "wind_direction": 1,
            "timer_value": 30,
            "nanoex": true,
            "airquality": false,
            "air_flow": "not_set",
            "wind_direction_horizon": "front",
            "inside_temp": 28.0,
            "operation_token": "tok"
        }))
        .unwrap()
    }

    #[test]
    fn copies_every_writable_field() {
        let request = cooling_status().to_update_request();
        assert_eq!(request.operation_status, Some(true));
        assert!(request.operation_mode.as_ref().unwrap().is(&OperationMode::Cooling));
        assert_eq!(request.temperature, Some(26.0));
        assert!(request.wind_volume.as_ref().unwrap().is(&WindVolume::High));
        assert!(request.wind_direction.as_ref().unwrap().is(&WindDirection::Top));
        assert_eq!(request.timer_value, Some(30));
        assert_eq!(request.nanoex, Some(true));
        assert!(request.air_flow.as_ref().unwrap().is(&AirFlow::NotSet));
        assert!(
            request
                .wind_direction_horizon
                .as_ref()
                .unwrap()
                .is(&HorizontalDirection::Front)
        );
        assert_eq!(request.operation_token.as_deref(), Some("tok"));
    }

    #[test]
    fn wire_format_matches_app() {
        let body = serde_json::to_value(cooling_status().to_update_request()).unwrap();
        assert_eq!(body["temperature"], json!("26.0"));
        assert_eq!(body["timer_value"], json!("30"));
        assert_eq!(body["wind_volume"], json!(5));
        assert_eq!(body["operation_mode"], json!("Cooling"));
        assert!(body.get("inside_temp").is_none());
    }

    #[test]
    fn unset_fields_are_null() {
        let body = serde_json::to_value(UpdateDeviceRequest::default()).unwrap();
        assert_eq!(body["operation_token"], json!(null));
        assert_eq!(body["temperature"], json!(null));
        assert_eq!(body.as_object().unwrap().len(), 11);
    }

    #[test]
    fn powerful_preset_resets_volume() {
        let request = cooling_status().to_update_request().with_air_flow(AirFlow::Powerful);
        assert!(request.air_flow.as_ref().unwrap().is(&AirFlow::Powerful));
        assert!(request.wind_volume.as_ref().unwrap().is(&WindVolume::Auto));
    }

    #[test]
    fn clearing_preset_keeps_volume() {
        let request = cooling_status().to_update_request().with_air_flow(AirFlow::NotSet);
        assert!(request.wind_volume.as_ref().unwrap().is(&WindVolume::High));
    }

    #[test]
    fn unknown_values_pass_through() {
        let mut status = cooling_status();
        status.wind_volume = Some(Lenient::Raw(json!(99)));
        let body = serde_json::to_value(status.to_update_request()).unwrap();
        assert_eq!(body["wind_volume"], json!(99));
    }
}
