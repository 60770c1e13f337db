// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for the vendor printer SDK.
//
// The real SDK performs channel I/O and raster rendering; Rollwerk only
// orchestrates.  Failures cross this seam as raw `DriverErrorCode` values
// that the engine forwards verbatim.

use std::time::Duration;

use image::DynamicImage;

use rollwerk_core::types::{
    BeaconDevice, ChannelDescriptor, DriverErrorCode, NetworkDevice, PrintSettings, PrinterModel,
};

/// One-shot completion callback for a network scan.  Must be invoked exactly
/// once per scan, with the discovered devices or an empty list.
pub type NetworkScanCallback = Box<dyn FnOnce(Vec<NetworkDevice>) + Send + 'static>;

/// Streaming per-device callback for a beacon scan.  Invoked once per
/// advertisement until `stop_beacon_scan` is called.
pub type BeaconScanCallback = Box<dyn Fn(BeaconDevice) + Send + 'static>;

/// Entry points into the vendor printer SDK.
pub trait PrinterDriver: Send {
    /// Open a connection to one printer.  On failure the raw vendor error
    /// code is returned and no channel is held.
    fn open_channel(
        &self,
        descriptor: &ChannelDescriptor,
    ) -> Result<Box<dyn PrinterChannel>, DriverErrorCode>;

    /// Vendor-default print settings for a model.
    fn default_settings(&self, model: PrinterModel) -> PrintSettings;

    /// Scan the local network for printers, filtered by model name
    /// (empty filter matches everything).  `on_complete` fires exactly once
    /// within `timeout` plus driver overhead.
    fn start_network_scan(
        &self,
        filter: &str,
        timeout: Duration,
        on_complete: NetworkScanCallback,
    );

    /// Start streaming beacon advertisements.  No timeout — runs until
    /// `stop_beacon_scan`.
    fn start_beacon_scan(&self, on_device: BeaconScanCallback);

    /// Stop a running beacon scan.  Idempotent.
    fn stop_beacon_scan(&self);
}

/// An open connection to one printer.  Exclusively owned by one print job;
/// `close` consumes the handle so it cannot be released twice.
pub trait PrinterChannel: Send {
    /// Render and transmit one bitmap with the given settings.
    fn submit_print(
        &mut self,
        image: &DynamicImage,
        settings: &PrintSettings,
    ) -> Result<(), DriverErrorCode>;

    /// Release the connection.
    fn close(self: Box<Self>);
}
