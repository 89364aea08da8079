// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for Eolia API payloads.
//!
//! This module provides structures for deserializing JSON responses from the
//! Eolia device API. Each response type corresponds to one endpoint.

mod appliance;
mod functions;
mod status;

pub use appliance::{Appliance, DevicesResponse};
pub use functions::{ProductFunction, ProductFunctions};
pub use status::DeviceStatus;
