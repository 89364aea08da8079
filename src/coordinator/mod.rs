// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-appliance update coordination.
//!
//! An [`ApplianceCoordinator`] caches the last status of one appliance and
//! turns user intents ("set 24 °C", "quiet fan") into complete status writes.
//! Every write:
//!
//! 1. starts from the cached status, fetching one if nothing is cached,
//! 2. overrides only the fields the intent changes,
//! 3. attaches the operation token from the previous write if it is younger
//!    than the token lifetime (120 s by default),
//! 4. caches the status and token the API sends back.
//!
//! When the API reports that another controller holds the appliance, the
//! cached token is discarded and [`Error::DeviceLocked`] is returned.
//!
//! All requests for one appliance, polls included, are serialized.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use eolia_lib::auth::Credentials;
//! use eolia_lib::coordinator::{ApplianceCoordinator, CoordinatorConfig};
//! use eolia_lib::protocol::{ClientConfig, EoliaClient};
//! use eolia_lib::types::AirFlow;
//!
//! # async fn example() -> eolia_lib::Result<()> {
//! let client = Arc::new(EoliaClient::login(ClientConfig::new(), Credentials::from_env()?).await?);
//! let appliance = client.list_devices().await?.unwrap_or_default().remove(0);
//!
//! let coordinator = Arc::new(ApplianceCoordinator::new(client, appliance, CoordinatorConfig::new()));
//! let poller = coordinator.spawn_poller();
//!
//! coordinator.set_temperature(24.0).await?;
//! coordinator.set_preset_mode(AirFlow::Quiet).await?;
//! poller.request_refresh();
//! # Ok(())
//! # }
//! ```

mod config;
mod poller;
mod token;

pub use config::CoordinatorConfig;
pub use poller::Poller;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, watch};

use crate::command::UpdateDeviceRequest;
use crate::error::{DeviceError, Result};
use crate::protocol::DeviceApi;
use crate::response::{Appliance, DeviceStatus};
use crate::types::{AirFlow, HorizontalDirection, OperationMode, WindDirection, WindVolume};
use token::OperationToken;

/// Keeps the status of one appliance and applies updates to it.
pub struct ApplianceCoordinator<A> {
    api: Arc<A>,
    appliance: Appliance,
    config: CoordinatorConfig,
    /// Held for the whole of every poll and read-modify-write.
    token: Mutex<Option<OperationToken>>,
    status: watch::Sender<Option<DeviceStatus>>,
    last_update_succeeded: AtomicBool,
}

impl<A: DeviceApi> ApplianceCoordinator<A> {
    /// Creates a coordinator with an empty cache.
    #[must_use]
    pub fn new(api: Arc<A>, appliance: Appliance, config: CoordinatorConfig) -> Self {
        let (status, _) = watch::channel(None);
        Self {
            api,
            appliance,
            config,
            token: Mutex::new(None),
            status,
            last_update_succeeded: AtomicBool::new(false),
        }
    }

    /// Returns the appliance this coordinator drives.
    #[must_use]
    pub fn appliance(&self) -> &Appliance {
        &self.appliance
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Returns the cached status.
    #[must_use]
    pub fn status(&self) -> Option<DeviceStatus> {
        self.status.borrow().clone()
    }

    /// Subscribes to status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<DeviceStatus>> {
        self.status.subscribe()
    }

    /// Returns true if the last poll or write produced a status.
    #[must_use]
    pub fn last_update_succeeded(&self) -> bool {
        self.last_update_succeeded.load(Ordering::Acquire)
    }

    /// Starts polling this appliance in the background.
    #[must_use = "dropping the poller stops it"]
    pub fn spawn_poller(self: &Arc<Self>) -> Poller
    where
        A: 'static,
    {
        Poller::spawn(Arc::clone(self))
    }

    /// Fetches the status and replaces the cache.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::StatusUnavailable`] if the API returned no
    /// status, or the transport error.
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.token.lock().await;
        self.fetch_status().await.map(|_| ())
    }

    /// Sets the target temperature.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn set_temperature(&self, temperature: f64) -> Result<DeviceStatus> {
        self.update(|request| request.with_temperature(temperature))
            .await
    }

    /// Sets the operating mode and power state.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn set_hvac_mode(&self, mode: OperationMode, on: bool) -> Result<DeviceStatus> {
        self.update(|request| request.with_mode(mode, on)).await
    }

    /// Switches the unit off, keeping every other setting.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn turn_off(&self) -> Result<DeviceStatus> {
        self.update(|request| request.with_power(false)).await
    }

    /// Sets the fan volume and/or air-flow preset.
    ///
    /// The preset is applied first, so an explicit volume wins over the
    /// automatic volume a quiet or powerful preset implies.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn set_fan_mode(
        &self,
        volume: Option<WindVolume>,
        air_flow: Option<AirFlow>,
    ) -> Result<DeviceStatus> {
        self.update(|mut request| {
            if let Some(air_flow) = air_flow {
                request = request.with_air_flow(air_flow);
            }
            if let Some(volume) = volume {
                request = request.with_wind_volume(volume);
            }
            request
        })
        .await
    }

    /// Sets the vertical louver position.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn set_swing_mode(&self, direction: WindDirection) -> Result<DeviceStatus> {
        self.update(|request| request.with_wind_direction(direction))
            .await
    }

    /// Sets the horizontal louver position.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn set_horizontal_swing_mode(
        &self,
        direction: HorizontalDirection,
    ) -> Result<DeviceStatus> {
        self.update(|request| request.with_horizontal_direction(direction))
            .await
    }

    /// Sets the air-flow preset.
    ///
    /// Quiet and powerful also set the fan volume to automatic.
    ///
    /// # Errors
    ///
    /// See [`ApplianceCoordinator`] for the failure modes of a write.
    pub async fn set_preset_mode(&self, air_flow: AirFlow) -> Result<DeviceStatus> {
        self.update(|request| request.with_air_flow(air_flow)).await
    }

    async fn update(
        &self,
        apply: impl FnOnce(UpdateDeviceRequest) -> UpdateDeviceRequest + Send,
    ) -> Result<DeviceStatus> {
        let mut token = self.token.lock().await;
        let status = self.ensure_status().await?;
        let request = apply(status.to_update_request());
        self.submit(&mut token, request).await
    }

    /// Returns the cached status, fetching it if nothing is cached.
    async fn ensure_status(&self) -> Result<DeviceStatus> {
        if let Some(status) = self.status() {
            return Ok(status);
        }
        tracing::debug!(appliance_id = %self.appliance.appliance_id, "No cached status, fetching");
        self.fetch_status().await
    }

    async fn fetch_status(&self) -> Result<DeviceStatus> {
        let id = &self.appliance.appliance_id;
        let fetched = self.api.get_status(id).await;
        self.last_update_succeeded
            .store(matches!(fetched, Ok(Some(_))), Ordering::Release);

        match fetched? {
            Some(status) => {
                self.status.send_replace(Some(status.clone()));
                Ok(status)
            }
            None => Err(DeviceError::StatusUnavailable {
                appliance_id: id.clone(),
            }
            .into()),
        }
    }

    async fn submit(
        &self,
        token: &mut Option<OperationToken>,
        request: UpdateDeviceRequest,
    ) -> Result<DeviceStatus> {
        let id = &self.appliance.appliance_id;
        let ttl = self.config.token_ttl();

        let attached = token
            .as_ref()
            .filter(|t| t.is_fresh(ttl))
            .map(|t| t.value().to_string());
        if attached.is_none() {
            tracing::debug!(appliance_id = %id, "No fresh operation token, sending without one");
        }
        let request = request.with_operation_token(attached);

        match self.api.put_status(id, &request).await {
            Ok(Some(status)) => {
                if let Some(value) = &status.operation_token {
                    *token = Some(OperationToken::new(value.clone()));
                }
                self.last_update_succeeded.store(true, Ordering::Release);
                self.status.send_replace(Some(status.clone()));
                Ok(status)
            }
            Ok(None) => Err(DeviceError::UpdateRejected {
                appliance_id: id.clone(),
            }
            .into()),
            Err(e) => {
                if e.is_device_locked() {
                    tracing::warn!(
                        appliance = self.appliance.display_name(),
                        "Appliance is controlled elsewhere, discarding operation token"
                    );
                    *token = None;
                }
                Err(e)
            }
        }
    }
}

impl<A> std::fmt::Debug for ApplianceCoordinator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplianceCoordinator")
            .field("appliance_id", &self.appliance.appliance_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
