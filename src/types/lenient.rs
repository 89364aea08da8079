// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tolerant wrapper for vendor enumerations.
//!
//! The Eolia API adds enum values without notice. A [`Lenient`] field maps a
//! recognized value to its typed constant and keeps anything else as the raw
//! JSON value, so parsing a status never fails on an unknown value and
//! serializing it sends back exactly what was received.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A value that is either a recognized `T` or the raw JSON the API sent.
///
/// # Examples
///
/// ```
/// use eolia_lib::types::{Lenient, WindVolume};
///
/// let known: Lenient<WindVolume> = serde_json::from_str("5").unwrap();
/// assert_eq!(known.known(), Some(&WindVolume::High));
///
/// let unknown: Lenient<WindVolume> = serde_json::from_str("99").unwrap();
/// assert!(unknown.known().is_none());
/// assert_eq!(serde_json::to_string(&unknown).unwrap(), "99");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    /// A value this library knows about.
    Known(T),
    /// A value passed through unchanged.
    Raw(Value),
}

impl<T> Lenient<T> {
    /// Returns the typed value, if recognized.
    #[must_use]
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw JSON value, if the value was not recognized.
    #[must_use]
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::Known(_) => None,
            Self::Raw(value) => Some(value),
        }
    }

    /// Returns true if the value was recognized.
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl<T: PartialEq> Lenient<T> {
    /// Returns true if this holds exactly `other`.
    #[must_use]
    pub fn is(&self, other: &T) -> bool {
        self.known() == Some(other)
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Lenient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::Raw(Value::String(raw)) => f.write_str(raw),
            Self::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

impl<T: Serialize> Serialize for Lenient<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => value.serialize(serializer),
            Self::Raw(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        match T::deserialize(&raw) {
            Ok(value) => Ok(Self::Known(value)),
            Err(_) => Ok(Self::Raw(raw)),
        }
    }
}
