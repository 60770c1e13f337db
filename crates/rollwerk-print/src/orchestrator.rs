// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print-job orchestration: channel open → settings build → submit → close.
//
// Runs on the engine thread; caller-input validation happened before
// dispatch.  Every failure past this point is reported on the bus and the
// triggering call resolves to `FailureNotified`.  Once a channel is open it
// is released exactly once on every path out.

use tracing::{error, info, info_span, warn};

use rollwerk_core::types::{ErrorValue, JobId, PluginEvent, PrintOutcome, PrintRequest, PrinterModel};
use rollwerk_driver::traits::PrinterDriver;

use crate::bus::NotificationBus;
use crate::channel::{resolve_channel, Channel};
use crate::raster;

/// Drive one print job to a terminal outcome.
pub fn execute(
    driver: &dyn PrinterDriver,
    bus: &NotificationBus,
    model: PrinterModel,
    request: &PrintRequest,
) -> PrintOutcome {
    let job_id = JobId::new();
    let span = info_span!("print_job", job = %job_id, model = %model);
    let _guard = span.enter();

    // ChannelOpening: no usable hint is recoverable information for the
    // caller, not a hard failure of the call.
    let Some(descriptor) = resolve_channel(&request.connection_hint()) else {
        warn!("no usable connection hint supplied");
        bus.emit(PluginEvent::PrintFailedCommunication { value: true });
        return PrintOutcome::FailureNotified;
    };

    let mut channel = match driver.open_channel(&descriptor) {
        Ok(inner) => Channel::new(inner),
        Err(code) => {
            // Open never succeeded — nothing to release.
            error!(code = code.0, "channel open failed");
            bus.emit(PluginEvent::PrintError { value: code.into() });
            return PrintOutcome::FailureNotified;
        }
    };

    // SettingsBuilding: the one build failure that tears down an already
    // opened resource.
    let bitmap = match raster::decode_image(&request.encoded_image) {
        Ok(bitmap) => bitmap,
        Err(e) => {
            channel.close();
            error!(error = %e, "image decode failed");
            bus.emit(PluginEvent::PrintError {
                value: ErrorValue::Message(e.to_string()),
            });
            return PrintOutcome::FailureNotified;
        }
    };

    let mut settings = driver.default_settings(model);
    settings.apply_overrides(request.label_name_index, request.number_of_copies);

    // Submitting.
    match channel.submit(&bitmap, &settings) {
        Ok(()) => {
            channel.close();
            info!(copies = settings.copies, "print complete");
            PrintOutcome::Completed
        }
        Err(code) => {
            channel.close();
            error!(code = code.0, "print submission failed");
            bus.emit(PluginEvent::PrintError { value: code.into() });
            PrintOutcome::FailureNotified
        }
    }
}
