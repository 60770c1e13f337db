// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub driver for builds without the vendor SDK (desktop/CI).
//
// Channel operations fail with `SDK_UNAVAILABLE`; scans complete empty.
// The engine's control flow, bus events, and resource handling are fully
// exercisable against this implementation.

use std::time::Duration;

use tracing::warn;

use rollwerk_core::types::{
    ChannelDescriptor, DriverErrorCode, PrintSettings, PrinterModel,
};

use crate::traits::{BeaconScanCallback, NetworkScanCallback, PrinterChannel, PrinterDriver};

/// No-op driver returned when the vendor SDK is not linked in.
pub struct StubDriver;

impl PrinterDriver for StubDriver {
    fn open_channel(
        &self,
        descriptor: &ChannelDescriptor,
    ) -> Result<Box<dyn PrinterChannel>, DriverErrorCode> {
        warn!(?descriptor, "open_channel called on stub driver");
        Err(DriverErrorCode::SDK_UNAVAILABLE)
    }

    fn default_settings(&self, model: PrinterModel) -> PrintSettings {
        PrintSettings::defaults_for(model)
    }

    fn start_network_scan(
        &self,
        _filter: &str,
        _timeout: Duration,
        on_complete: NetworkScanCallback,
    ) {
        warn!("network scan on stub driver — completing empty");
        on_complete(Vec::new());
    }

    fn start_beacon_scan(&self, _on_device: BeaconScanCallback) {
        warn!("beacon scan on stub driver — no devices will arrive");
    }

    fn stop_beacon_scan(&self) {}
}
