// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rollwerk — device discovery and print-job orchestration.
//
// The `PrintService` facade is the public surface: one method per plugin
// call, with out-of-band outcomes delivered over the notification bus.  All
// mutable state lives on a dedicated engine thread; the vendor driver SDK
// sits behind the `rollwerk-driver` trait seam.

pub mod bus;
pub mod channel;
pub mod discovery;
pub mod engine;
pub mod orchestrator;
pub mod raster;
pub mod registry;
pub mod service;

pub use bus::NotificationBus;
pub use registry::{CapabilityRegistry, ModelResolution};
pub use service::PrintService;
