// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance list parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /eolia/v6/devices`.
///
/// # Examples
///
/// ```
/// use eolia_lib::response::DevicesResponse;
///
/// let json = r#"{"ac_list": [{"appliance_id": "A1", "nickname": "Living"}]}"#;
/// let response: DevicesResponse = serde_json::from_str(json).unwrap();
/// assert_eq!(response.ac_list[0].display_name(), "Living");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DevicesResponse {
    /// Air conditioners registered to the account.
    #[serde(default)]
    pub ac_list: Vec<Appliance>,
}

/// One air conditioner registered to the account.
///
/// Metadata whose type the API does not pin down is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    /// Stable identifier, used in every device URL.
    pub appliance_id: String,

    /// User-assigned name.
    pub nickname: Option<String>,

    /// Purchase date as entered in the app.
    pub purchase_date: Option<String>,

    /// Shop category.
    pub shop_category_id: Option<Value>,

    /// Shop area.
    pub shop_area_id: Option<Value>,

    /// Shop name.
    pub shop_name: Option<String>,

    /// Installation place.
    pub inst_place_id: Option<Value>,

    /// Free-form memo.
    pub memo: Option<String>,

    /// Appliance type.
    pub appliance_type: Option<Value>,

    /// Product code, used to query the function list.
    pub product_code: Option<String>,

    /// Product name.
    pub product_name: Option<String>,

    /// Hashed adapter GUID.
    pub hashed_guid: Option<String>,

    /// Registration number.
    pub device_register_num: Option<Value>,

    /// Initialization flag.
    pub initialize_flg: Option<Value>,

    /// Repair status.
    pub repair_status: Option<Value>,

    /// Point code.
    pub point_code: Option<Value>,

    /// Voice assistant flag.
    pub vpa_enable: Option<Value>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Appliance {
    /// Returns the nickname, falling back to the appliance id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.appliance_id)
    }
}
