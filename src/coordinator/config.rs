// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator configuration.

use std::time::Duration;

/// Timing settings of an [`ApplianceCoordinator`](super::ApplianceCoordinator).
///
/// # Examples
///
/// ```
/// use eolia_lib::coordinator::CoordinatorConfig;
/// use std::time::Duration;
///
/// let config = CoordinatorConfig::new().with_poll_interval(Duration::from_secs(30));
/// assert_eq!(config.poll_interval(), Duration::from_secs(30));
/// assert_eq!(config.token_ttl(), Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    poll_interval: Duration,
    token_ttl: Duration,
}

impl CoordinatorConfig {
    /// Default interval between status polls.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
    /// Shortest accepted poll interval.
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);
    /// Default lifetime of an operation token.
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(120);

    /// Creates a configuration with the default timings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            token_ttl: Self::DEFAULT_TOKEN_TTL,
        }
    }

    /// Sets the interval between status polls.
    ///
    /// Values below [`MIN_POLL_INTERVAL`](Self::MIN_POLL_INTERVAL) are raised
    /// to it.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Self::MIN_POLL_INTERVAL);
        self
    }

    /// Sets how long an operation token is reused after it was received.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the operation token lifetime.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
