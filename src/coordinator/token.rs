// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Duration;

use tokio::time::Instant;

/// The operation token from the last successful write, with its receipt time.
#[derive(Debug, Clone)]
pub(crate) struct OperationToken {
    value: String,
    received_at: Instant,
}

impl OperationToken {
    pub(crate) fn new(value: String) -> Self {
        Self {
            value,
            received_at: Instant::now(),
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Strictly younger than `ttl`.
    pub(crate) fn is_fresh(&self, ttl: Duration) -> bool {
        self.received_at.elapsed() < ttl
    }
}
