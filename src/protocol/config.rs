// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use crate::auth::DEFAULT_AUTH_BASE_URL;

/// Configuration for an [`EoliaClient`](super::EoliaClient).
///
/// The defaults point at the production services. Tests and proxies can
/// override the base URLs.
///
/// # Examples
///
/// ```
/// use eolia_lib::protocol::ClientConfig;
/// use std::time::Duration;
///
/// // Production endpoints
/// let config = ClientConfig::new();
/// assert_eq!(config.api_base_url(), "https://app.rac.apws.panasonic.com");
///
/// // Custom endpoints and timeout
/// let config = ClientConfig::new()
///     .with_api_base_url("http://127.0.0.1:8080/")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.api_base_url(), "http://127.0.0.1:8080");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    auth_base_url: String,
    api_base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Default base URL of the device API.
    pub const DEFAULT_API_BASE_URL: &'static str = "https://app.rac.apws.panasonic.com";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration with the production endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the identity service base URL.
    #[must_use]
    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = trim_slash(url.into());
        self
    }

    /// Sets the device API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = trim_slash(url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the identity service base URL.
    #[must_use]
    pub fn auth_base_url(&self) -> &str {
        &self.auth_base_url
    }

    /// Returns the device API base URL.
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the OAuth token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.auth_base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.auth_base_url(), "https://auth.digital.panasonic.com");
        assert_eq!(config.api_base_url(), "https://app.rac.apws.panasonic.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn token_url() {
        let config = ClientConfig::new().with_auth_base_url("http://localhost:9000/");
        assert_eq!(config.token_url(), "http://localhost:9000/oauth/token");
    }

    #[test]
    fn with_timeout() {
        let config = ClientConfig::new().with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }
}
