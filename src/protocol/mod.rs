// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the Eolia cloud.
//!
//! [`EoliaClient`] talks to the identity service and the device API.
//! [`DeviceApi`] is the subset of it the
//! [`ApplianceCoordinator`](crate::coordinator::ApplianceCoordinator)
//! depends on, so the coordinator can run against any implementation.

mod config;
mod http;

pub use config::ClientConfig;
pub use http::EoliaClient;

use crate::command::UpdateDeviceRequest;
use crate::error::Result;
use crate::response::DeviceStatus;

/// Status read and write operations on appliances.
///
/// Both operations return `Ok(None)` when the API answered but produced no
/// usable status.
pub trait DeviceApi: Send + Sync {
    /// Fetches the current status of an appliance.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be performed.
    fn get_status(
        &self,
        appliance_id: &str,
    ) -> impl Future<Output = Result<Option<DeviceStatus>>> + Send;

    /// Writes a status update and returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceLocked`](crate::Error::DeviceLocked) when
    /// another controller holds the appliance, or error if the request
    /// cannot be performed.
    fn put_status(
        &self,
        appliance_id: &str,
        request: &UpdateDeviceRequest,
    ) -> impl Future<Output = Result<Option<DeviceStatus>>> + Send;
}
