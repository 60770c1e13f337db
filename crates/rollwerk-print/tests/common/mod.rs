// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scriptable counting driver for integration tests.
//
// The driver half moves into the engine; the probe half stays with the
// test to script failures, count open/close calls, and fire the discovery
// callbacks the engine registered.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::DynamicImage;

use rollwerk_core::types::{
    BeaconDevice, ChannelDescriptor, DriverErrorCode, NetworkDevice, PrintSettings, PrinterModel,
};
use rollwerk_driver::traits::{
    BeaconScanCallback, NetworkScanCallback, PrinterChannel, PrinterDriver,
};

/// A 1x1 transparent PNG, base64-encoded.
pub const ONE_PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJ\
                                 AAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

#[derive(Default)]
struct Shared {
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
    open_error: Mutex<Option<DriverErrorCode>>,
    submit_error: Mutex<Option<DriverErrorCode>>,
    opened_descriptor: Mutex<Option<ChannelDescriptor>>,
    submitted_settings: Mutex<Option<PrintSettings>>,
    network_callback: Mutex<Option<NetworkScanCallback>>,
    beacon_callback: Mutex<Option<BeaconScanCallback>>,
    beacon_stops: AtomicUsize,
}

/// Build a fake driver and its probe.
pub fn fake_driver() -> (Box<dyn PrinterDriver>, DriverProbe) {
    let shared = Arc::new(Shared::default());
    (
        Box::new(FakeDriver {
            shared: Arc::clone(&shared),
        }),
        DriverProbe { shared },
    )
}

struct FakeDriver {
    shared: Arc<Shared>,
}

impl PrinterDriver for FakeDriver {
    fn open_channel(
        &self,
        descriptor: &ChannelDescriptor,
    ) -> Result<Box<dyn PrinterChannel>, DriverErrorCode> {
        self.shared.open_calls.fetch_add(1, Ordering::SeqCst);
        *self.shared.opened_descriptor.lock().unwrap() = Some(descriptor.clone());
        if let Some(code) = *self.shared.open_error.lock().unwrap() {
            return Err(code);
        }
        Ok(Box::new(FakeChannel {
            shared: Arc::clone(&self.shared),
        }))
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
        *self.shared.network_callback.lock().unwrap() = Some(on_complete);
    }

    fn start_beacon_scan(&self, on_device: BeaconScanCallback) {
        *self.shared.beacon_callback.lock().unwrap() = Some(on_device);
    }

    fn stop_beacon_scan(&self) {
        self.shared.beacon_stops.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeChannel {
    shared: Arc<Shared>,
}

impl PrinterChannel for FakeChannel {
    fn submit_print(
        &mut self,
        _image: &DynamicImage,
        settings: &PrintSettings,
    ) -> Result<(), DriverErrorCode> {
        *self.shared.submitted_settings.lock().unwrap() = Some(settings.clone());
        if let Some(code) = *self.shared.submit_error.lock().unwrap() {
            return Err(code);
        }
        Ok(())
    }

    fn close(self: Box<Self>) {
        self.shared.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test-side handle to the fake driver's state.
pub struct DriverProbe {
    shared: Arc<Shared>,
}

impl DriverProbe {
    pub fn open_calls(&self) -> usize {
        self.shared.open_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.shared.close_calls.load(Ordering::SeqCst)
    }

    pub fn beacon_stops(&self) -> usize {
        self.shared.beacon_stops.load(Ordering::SeqCst)
    }

    /// Script the next channel open to fail with this raw code.
    pub fn fail_open(&self, code: i32) {
        *self.shared.open_error.lock().unwrap() = Some(DriverErrorCode(code));
    }

    /// Script the next submission to fail with this raw code.
    pub fn fail_submit(&self, code: i32) {
        *self.shared.submit_error.lock().unwrap() = Some(DriverErrorCode(code));
    }

    pub fn opened_descriptor(&self) -> Option<ChannelDescriptor> {
        self.shared.opened_descriptor.lock().unwrap().clone()
    }

    pub fn submitted_settings(&self) -> Option<PrintSettings> {
        self.shared.submitted_settings.lock().unwrap().clone()
    }

    /// Wait for the engine to register a network scan, then take its
    /// completion callback so the test can fire (or drop) it.
    pub fn take_network_callback(&self) -> NetworkScanCallback {
        self.wait_until("network scan registered", || {
            self.shared.network_callback.lock().unwrap().is_some()
        });
        self.shared.network_callback.lock().unwrap().take().unwrap()
    }

    /// Fire the pending network scan completion with these devices.
    pub fn complete_network_scan(&self, devices: Vec<NetworkDevice>) {
        (self.take_network_callback())(devices);
    }

    /// Fire one beacon advertisement through the registered callback.
    pub fn beacon_arrival(&self, local_name: &str) {
        self.wait_until("beacon scan registered", || {
            self.shared.beacon_callback.lock().unwrap().is_some()
        });
        let guard = self.shared.beacon_callback.lock().unwrap();
        (guard.as_ref().unwrap())(BeaconDevice {
            local_name: local_name.to_owned(),
        });
    }

    /// Wait for the engine to process a stop command.
    pub fn wait_for_beacon_stops(&self, expected: usize) {
        self.wait_until("beacon stop processed", || {
            self.shared.beacon_stops.load(Ordering::SeqCst) == expected
        });
    }

    fn wait_until(&self, what: &str, condition: impl Fn() -> bool) {
        for _ in 0..400 {
            if condition() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("timed out waiting: {what}");
    }
}
