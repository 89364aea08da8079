// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Eolia` Lib - A Rust library to control Panasonic Eolia air conditioners.
//!
//! This library talks to the same cloud service as the vendor's smartphone
//! app: it logs in to the Panasonic ID service, lists the appliances of the
//! account, reads their status and writes updates.
//!
//! # Supported Features
//!
//! - **Login**: PKCE authorization with CLUB Panasonic credentials, token
//!   refresh, and transparent re-login when the refresh token expires
//! - **Status queries**: Mode, target and room temperatures, fan, louvers
//! - **Control**: Power, mode, temperature, fan volume, air-flow presets,
//!   vertical and horizontal louvers
//! - **Coordination**: Per-appliance serialization of writes with operation
//!   token reuse and lock-conflict detection
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use eolia_lib::auth::Credentials;
//! use eolia_lib::coordinator::{ApplianceCoordinator, CoordinatorConfig};
//! use eolia_lib::protocol::{ClientConfig, EoliaClient};
//! use eolia_lib::types::OperationMode;
//!
//! #[tokio::main]
//! async fn main() -> eolia_lib::Result<()> {
//!     let credentials = Credentials::from_env()?;
//!     let client = Arc::new(EoliaClient::login(ClientConfig::new(), credentials).await?);
//!
//!     for appliance in client.list_devices().await?.unwrap_or_default() {
//!         let coordinator =
//!             ApplianceCoordinator::new(Arc::clone(&client), appliance, CoordinatorConfig::new());
//!
//!         coordinator.set_hvac_mode(OperationMode::Cooling, true).await?;
//!         coordinator.set_temperature(26.0).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Resuming a Session
//!
//! ```no_run
//! use eolia_lib::protocol::{ClientConfig, EoliaClient};
//!
//! # async fn example(access: String, refresh: String) -> eolia_lib::Result<()> {
//! let client = EoliaClient::from_tokens(ClientConfig::new(), access, refresh)?;
//! let devices = client.list_devices().await?;
//!
//! // Persist the possibly refreshed tokens for next time
//! let tokens = client.tokens();
//! # Ok(())
//! # }
//! ```
//!
//! ## Handling Lock Conflicts
//!
//! When someone uses the remote control or the vendor app, the appliance
//! refuses writes from other controllers for about two minutes:
//!
//! ```no_run
//! # use eolia_lib::coordinator::ApplianceCoordinator;
//! # use eolia_lib::protocol::EoliaClient;
//! # async fn example(coordinator: &ApplianceCoordinator<EoliaClient>) -> eolia_lib::Result<()> {
//! match coordinator.set_temperature(24.0).await {
//!     Ok(status) => println!("now {:?} °C", status.temperature),
//!     Err(e) if e.is_device_locked() => println!("busy, try again in 2 minutes"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod command;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod response;
pub mod types;

pub use auth::{Credentials, Tokens};
pub use command::UpdateDeviceRequest;
pub use coordinator::{ApplianceCoordinator, CoordinatorConfig, Poller};
pub use error::{AuthError, DeviceError, Error, ParseError, ProtocolError, Result};
pub use protocol::{ClientConfig, DeviceApi, EoliaClient};
pub use response::{Appliance, DeviceStatus, ProductFunctions};
pub use types::{AirFlow, HorizontalDirection, Lenient, OperationMode, WindDirection, WindVolume};
