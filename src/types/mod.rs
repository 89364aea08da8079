// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Eolia appliance state.
//!
//! Every enumerated field of the API is wrapped in [`Lenient`], so an
//! unrecognized value is carried through instead of failing the parse.
//!
//! # Types
//!
//! - [`Lenient`] - Known value or raw JSON passthrough
//! - [`OperationMode`] - Off/Cooling/Heating/Auto/Dry/Fan/Nanoe
//! - [`WindVolume`] - Fan volume, `0` is automatic
//! - [`AirFlow`] - Quiet/Powerful preset
//! - [`WindDirection`] - Vertical louver position
//! - [`HorizontalDirection`] - Horizontal louver position

mod direction;
mod fan;
mod lenient;
mod mode;
pub(crate) mod scalar;
mod timestamp;

pub use direction::{HorizontalDirection, WindDirection};
pub use fan::{AirFlow, WindVolume};
pub use lenient::Lenient;
pub use mode::OperationMode;
pub use timestamp::eolia_timestamp;
