// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rollwerk — vendor printer-driver seam.
//
// The engine talks to physical printers exclusively through the traits in
// `traits`.  Two implementations ship here: a stub for builds without the
// vendor SDK, and an mDNS-backed driver whose network scan is real while
// channel operations still require the SDK.

pub mod mdns;
pub mod stub;
pub mod traits;

use tracing::warn;

/// Pick the best available driver for this process.
///
/// mDNS needs a multicast-capable interface; when the daemon cannot start
/// (CI, sandboxes) the stub keeps the engine functional with empty scans.
pub fn default_driver() -> Box<dyn traits::PrinterDriver> {
    match mdns::MdnsDriver::new() {
        Ok(driver) => Box::new(driver),
        Err(e) => {
            warn!(error = %e, "mDNS unavailable — using stub driver");
            Box::new(stub::StubDriver)
        }
    }
}
