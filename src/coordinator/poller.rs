// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background status polling.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::ApplianceCoordinator;
use crate::protocol::DeviceApi;

/// Handle to a task that keeps a coordinator's status fresh.
///
/// The task refreshes on the configured interval and whenever
/// [`request_refresh`](Self::request_refresh) is called. Dropping the
/// handle stops it.
#[derive(Debug)]
pub struct Poller {
    task: JoinHandle<()>,
    trigger: Arc<Notify>,
}

impl Poller {
    pub(crate) fn spawn<A: DeviceApi + 'static>(coordinator: Arc<ApplianceCoordinator<A>>) -> Self {
        let trigger = Arc::new(Notify::new());
        let notified = Arc::clone(&trigger);
        let period = coordinator.config().poll_interval();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    () = notified.notified() => {
                        tracing::debug!(appliance_id = %coordinator.appliance().appliance_id, "Refresh requested");
                    }
                }

                if let Err(e) = coordinator.refresh().await {
                    tracing::warn!(
                        appliance = coordinator.appliance().display_name(),
                        error = %e,
                        "Status poll failed"
                    );
                }
            }
        });

        Self { task, trigger }
    }

    /// Asks for a refresh as soon as the coordinator is idle.
    pub fn request_refresh(&self) {
        self.trigger.notify_one();
    }

    /// Returns true while the polling task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
