// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Time budget handed to the driver for one network scan (default 5).
    pub network_scan_timeout_secs: u64,
    /// Capacity of the notification bus channel.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network_scan_timeout_secs: 5,
            event_capacity: 32,
        }
    }
}

impl EngineConfig {
    pub fn network_scan_timeout(&self) -> Duration {
        Duration::from_secs(self.network_scan_timeout_secs)
    }
}
