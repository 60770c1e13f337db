// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel resolution and the scoped channel guard.
//
// A hint resolves to at most one transport descriptor; absence of a usable
// transport is recoverable information (reported on the bus), not an error
// to the triggering call.  Once a channel is open it is released exactly
// once on every exit path — `close` consumes the guard, `Drop` is the
// safety net.

use tracing::{debug, warn};

use image::DynamicImage;

use rollwerk_core::types::{
    ChannelDescriptor, ConnectionHint, DriverErrorCode, PrintSettings,
};
use rollwerk_driver::traits::PrinterChannel;

/// Build a transport descriptor from a connection hint.
/// Returns `None` when no usable transport was supplied.
pub fn resolve_channel(hint: &ConnectionHint) -> Option<ChannelDescriptor> {
    match hint {
        ConnectionHint::BeaconLocalName(name) => {
            debug!(local_name = %name, "resolved BLE channel");
            Some(ChannelDescriptor::BleLocalName(name.clone()))
        }
        ConnectionHint::NetworkAddress(addr) => {
            debug!(ip = %addr, "resolved Wi-Fi channel");
            Some(ChannelDescriptor::WifiAddress(addr.clone()))
        }
        ConnectionHint::None => None,
    }
}

/// Scoped ownership of one open driver channel for one job.
pub struct Channel {
    inner: Option<Box<dyn PrinterChannel>>,
}

impl Channel {
    pub fn new(inner: Box<dyn PrinterChannel>) -> Self {
        Self { inner: Some(inner) }
    }

    /// Submit one print through the open channel.
    pub fn submit(
        &mut self,
        image: &DynamicImage,
        settings: &PrintSettings,
    ) -> Result<(), DriverErrorCode> {
        self.inner
            .as_mut()
            .expect("channel used after close")
            .submit_print(image, settings)
    }

    /// Release the channel.  Consuming `self` makes a double release
    /// unrepresentable.
    pub fn close(mut self) {
        if let Some(inner) = self.inner.take() {
            inner.close();
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            warn!("channel dropped without explicit close — releasing");
            inner.close();
        }
    }
}
