// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login and token handling for the Panasonic ID service.
//!
//! The vendor app signs in through an Auth0 tenant that federates to the
//! CLUB Panasonic identity provider. A login runs seven requests: PKCE
//! authorization, login page, username/password challenge, credential
//! submission, WS-Federation callback, a short redirect walk to the
//! authorization code, and the code-for-token exchange. The flow itself
//! lives on [`EoliaClient::authenticate`](crate::protocol::EoliaClient::authenticate);
//! this module holds the pieces it is built from.
//!
//! # Examples
//!
//! ```
//! use eolia_lib::auth::Credentials;
//!
//! let credentials = Credentials::new("user@example.com", "secret");
//! assert_eq!(credentials.username(), "user@example.com");
//! assert!(!format!("{credentials:?}").contains("secret"));
//! ```

mod flow;
mod pkce;
mod scrape;

pub(crate) use flow::AuthFlow;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Error;

/// OAuth client id of the Eolia app.
pub const CLIENT_ID: &str = "JpNCoLeXs4rPMhWmnOjbOxat7MWTZEgr";

/// Custom-scheme redirect URI registered for the app.
pub const REDIRECT_URI: &str =
    "com.panasonic.jp.SmartRAC://auth.digital.panasonic.com/ios/com.panasonic.jp.SmartRAC/callback";

/// API audience the access token is issued for.
pub const AUDIENCE: &str = "https://club.panasonic.jp/JpNCoLeXs4rPMhWmnOjbOxat7MWTZEgr/api/v1/";

/// Requested scopes.
pub const SCOPE: &str = "openid offline_access eolia.control";

/// Default base URL of the identity service.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://auth.digital.panasonic.com";

/// Environment variable holding the account username.
pub const USERNAME_ENV: &str = "EOLIA_USERNAME";

/// Environment variable holding the account password.
pub const PASSWORD_ENV: &str = "EOLIA_PASSWORD";

// SDK fingerprints the identity service expects, one per request family.
pub(crate) const AUTH0_CLIENT_AUTHORIZE: &str = "eyJ2ZXJzaW9uIjoiMS4zOS4xIiwibmFtZSI6IkF1dGgwLnN3aWZ0IiwiZW52Ijp7InZpZXciOiJhc3dhcyIsImlPUyI6IjE4LjYiLCJzd2lmdCI6IjUueCJ9fQ";
pub(crate) const AUTH0_CLIENT_SWIFT: &str = "eyJ2ZXJzaW9uIjoiMS4zOS4xIiwibmFtZSI6IkF1dGgwLnN3aWZ0IiwiZW52Ijp7InZpZXciOiJhc3dhcyIsIklPUyI6IjE4LjYiLCJzd2lmdCI6IjUueCJ9fQ";
pub(crate) const AUTH0_CLIENT_CHALLENGE: &str = "eyJuYW1lIjoiYXV0aDAuanMiLCJ2ZXJzaW9uIjoiOS4xOS4yIn0=";
pub(crate) const AUTH0_CLIENT_LOGIN: &str = "eyJuYW1lIjoiYXV0aDAuanMtdWxwIiwidmVyc2lvbiI6IjkuMTkuMiJ9";

pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 18_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.6 Mobile/15E148 Safari/604.1";

/// Account credentials for the Panasonic ID service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads credentials from `EOLIA_USERNAME` and `EOLIA_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self, Error> {
        let read = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());
        match (read(USERNAME_ENV), read(PASSWORD_ENV)) {
            (Some(username), Some(password)) => Ok(Self::new(username, password)),
            _ => Err(Error::MissingCredentials),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tokens issued by the identity service.
///
/// Serializable so a host can persist them and later resume with
/// [`EoliaClient::from_tokens`](crate::protocol::EoliaClient::from_tokens).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// Bearer token for the device API.
    pub access_token: String,
    /// Long-lived token used to obtain new access tokens.
    pub refresh_token: String,
    /// `OpenID` Connect identity token.
    #[serde(default)]
    pub id_token: Option<String>,
    /// Lifetime of the access token in seconds, as issued.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Raw body of the token endpoint; every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: Option<String>,
    pub(crate) refresh_token: Option<String>,
    pub(crate) id_token: Option<String>,
    pub(crate) expires_in: Option<u64>,
}

/// Exchanges a refresh token for a new access token.
///
/// The identity service may rotate the refresh token; when it does not
/// return one, the old token stays valid and is kept.
pub(crate) async fn refresh_tokens(
    http: &reqwest::Client,
    token_url: &str,
    refresh_token: &str,
) -> Result<Tokens, Error> {
    tracing::debug!("Refreshing access token");

    let body = json!({
        "grant_type": "refresh_token",
        "client_id": CLIENT_ID,
        "refresh_token": refresh_token,
    });

    let response = http
        .post(token_url)
        .header("Auth0-Client", AUTH0_CLIENT_SWIFT)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::TokenRefresh(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| Error::TokenRefresh(e.to_string()))?;

    if status != reqwest::StatusCode::OK {
        return Err(Error::TokenRefresh(format!("HTTP {}: {text}", status.as_u16())));
    }

    let parsed: TokenResponse = serde_json::from_str(&text)
        .map_err(|e| Error::TokenRefresh(format!("invalid token response: {e}")))?;

    let Some(access_token) = parsed.access_token else {
        return Err(Error::TokenRefresh("response has no access_token".to_string()));
    };

    Ok(Tokens {
        access_token,
        refresh_token: parsed
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        id_token: parsed.id_token,
        expires_in: parsed.expires_in,
    })
}
