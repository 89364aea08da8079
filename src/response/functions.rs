// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Product function list parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `GET /eolia/v6/products/{product_code}/functions`.
///
/// Lists which optional features a product model supports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductFunctions {
    /// Supported functions.
    #[serde(default)]
    pub ac_function_list: Vec<ProductFunction>,

    /// Product code the list belongs to.
    pub product_code: Option<String>,

    /// Remote controller type.
    pub remote_controller_type: Option<Value>,

    /// Installation type.
    pub installation_type: Option<Value>,
}

impl ProductFunctions {
    /// Looks up the value of a function by id.
    #[must_use]
    pub fn function(&self, function_id: &str) -> Option<&Value> {
        self.ac_function_list
            .iter()
            .find(|f| f.function_id.as_deref() == Some(function_id))
            .and_then(|f| f.function_value.as_ref())
    }
}

/// One entry of the function list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductFunction {
    /// Function identifier.
    pub function_id: Option<String>,
    /// Function setting.
    pub function_value: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_function_value() {
        let json = r#"{
            "ac_function_list": [
                {"function_id": "nanoex", "function_value": "1"},
                {"function_id": "wind_direction_horizon", "function_value": "0"}
            ],
            "product_code": "CS-X400D2",
            "remote_controller_type": 2
        }"#;
        let functions: ProductFunctions = serde_json::from_str(json).unwrap();
        assert_eq!(functions.function("nanoex"), Some(&Value::from("1")));
        assert_eq!(functions.function("missing"), None);
        assert_eq!(functions.remote_controller_type, Some(Value::from(2)));
    }
}
