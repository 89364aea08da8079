// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Write requests sent to the Eolia device API.
//!
//! The API has a single write operation: a full status document sent with
//! `PUT`. [`UpdateDeviceRequest`] is that document, derived from the last
//! known [`DeviceStatus`](crate::response::DeviceStatus) with only the
//! intended fields changed.

mod update;

pub use update::UpdateDeviceRequest;
