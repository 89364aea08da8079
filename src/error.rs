// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `eolia_lib` library.
//!
//! This module provides the error hierarchy for the library: the login
//! handshake, token refresh, transport failures, JSON parsing, and
//! appliance operations.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The login handshake failed. The whole flow must be restarted.
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),

    /// The refresh token was rejected or the token endpoint returned nothing usable.
    ///
    /// The host should treat this as a request to re-authenticate.
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// No access token is available yet.
    #[error("client is not authenticated")]
    NotAuthenticated,

    /// A login was requested on a client built without credentials.
    #[error("no credentials configured for this client")]
    MissingCredentials,

    /// The appliance is being driven by another controller (remote, vendor app).
    ///
    /// Retry after about two minutes, once the other controller's operation
    /// token has expired.
    #[error("appliance {appliance_id} is locked by another controller, wait about 2 minutes")]
    DeviceLocked {
        /// The appliance that refused the update.
        appliance_id: String,
    },

    /// Error occurred during HTTP communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing or encoding a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during an appliance operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// Returns true if this is the "locked by another controller" conflict.
    #[must_use]
    pub fn is_device_locked(&self) -> bool {
        matches!(self, Self::DeviceLocked { .. })
    }
}

/// Failures of the individual login steps.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authorize request did not redirect, or the redirect carried no state.
    #[error("authorization request failed: {0}")]
    Authorization(String),

    /// The username/password challenge was refused.
    #[error("challenge rejected with HTTP {status}")]
    Challenge {
        /// HTTP status returned by the challenge endpoint.
        status: u16,
    },

    /// The credential submission was refused.
    #[error("login rejected with HTTP {status}: {body}")]
    InvalidCredentials {
        /// HTTP status returned by the login endpoint.
        status: u16,
        /// Response body, kept for diagnosis.
        body: String,
    },

    /// The login response did not contain the WS-Federation form.
    #[error("login response is missing form field `{field}`")]
    LoginResponseParse {
        /// Name of the missing form field.
        field: &'static str,
    },

    /// The callback endpoint did not answer with a redirect.
    #[error("login callback failed with HTTP {status}")]
    CallbackFailed {
        /// HTTP status returned by the callback endpoint.
        status: u16,
    },

    /// The callback redirected somewhere other than the resume endpoint.
    #[error("unexpected redirect: {0}")]
    UnexpectedRedirect(String),

    /// The redirect chain ended without an authorization code.
    #[error("no authorization code in redirect chain: {0}")]
    AuthorizationCodeMissing(String),

    /// The redirect chain exceeded the hop limit.
    #[error("redirect chain exceeded {hops} hops")]
    TooManyRedirects {
        /// Number of hops followed before giving up.
        hops: usize,
    },

    /// The authorization code could not be exchanged for tokens.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// A configured or received URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors related to HTTP communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing API payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing or encoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to appliance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No status could be obtained for the appliance.
    #[error("no status available for appliance {appliance_id}")]
    StatusUnavailable {
        /// The appliance whose status is missing.
        appliance_id: String,
    },

    /// The update was not accepted and no status came back.
    #[error("update rejected for appliance {appliance_id}")]
    UpdateRejected {
        /// The appliance that was being updated.
        appliance_id: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_locked_is_distinct() {
        let err = Error::DeviceLocked {
            appliance_id: "ac-1".to_string(),
        };
        assert!(err.is_device_locked());

        let other: Error = DeviceError::UpdateRejected {
            appliance_id: "ac-1".to_string(),
        }
        .into();
        assert!(!other.is_device_locked());
    }

    #[test]
    fn auth_error_display() {
        let err = AuthError::LoginResponseParse { field: "wctx" };
        assert_eq!(err.to_string(), "login response is missing form field `wctx`");
    }

    #[test]
    fn error_from_auth_error() {
        let err: Error = AuthError::TooManyRedirects { hops: 4 }.into();
        assert!(matches!(
            err,
            Error::Authentication(AuthError::TooManyRedirects { hops: 4 })
        ));
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::StatusUnavailable {
            appliance_id: "ac-1".to_string(),
        };
        assert_eq!(err.to_string(), "no status available for appliance ac-1");
    }
}
