// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Public service facade — one method per plugin call.
//
// Caller-input errors are returned synchronously, before anything reaches
// the engine.  Everything detected after dispatch rides the notification
// bus, and `print_image` then resolves to `FailureNotified` rather than an
// error, matching the plugin contract.

use std::sync::mpsc;

use tokio::sync::{broadcast, oneshot};
use tracing::{instrument, warn};

use rollwerk_core::config::EngineConfig;
use rollwerk_core::error::{Result, RollwerkError};
use rollwerk_core::types::{PluginEvent, PrintOutcome, PrintRequest};
use rollwerk_driver::traits::PrinterDriver;

use crate::bus::NotificationBus;
use crate::engine::{self, Command};
use crate::registry::{CapabilityRegistry, ModelResolution};

/// Label-print service: discovery over two transports plus single-job
/// print orchestration.  Owns the engine thread; dropping the service
/// shuts it down.
pub struct PrintService {
    commands: mpsc::Sender<Command>,
    bus: NotificationBus,
    registry: CapabilityRegistry,
}

impl PrintService {
    pub fn new(driver: Box<dyn PrinterDriver>, config: EngineConfig) -> Self {
        let bus = NotificationBus::new(config.event_capacity);
        let commands = engine::spawn(driver, bus.clone(), config);
        Self {
            commands,
            bus,
            registry: CapabilityRegistry::wireless(),
        }
    }

    /// Attach a bus listener.  Subscribe before issuing the request whose
    /// events you want to observe.
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.bus.subscribe()
    }

    /// Submit one print job and await its terminal outcome.
    ///
    /// `Completed` maps to the plugin's `{value: true}` reply;
    /// `FailureNotified` means the failure already went out on the bus.
    #[instrument(skip(self, request), fields(printer = %request.printer_type))]
    pub async fn print_image(&self, request: PrintRequest) -> Result<PrintOutcome> {
        // Validating: caller-input errors never reach the engine.
        if request.encoded_image.is_empty() {
            return Err(RollwerkError::EmptyImageData);
        }
        if request.printer_type.is_empty() {
            return Err(RollwerkError::EmptyPrinterType);
        }
        let model = match self.registry.resolve(&request.printer_type) {
            ModelResolution::Supported(model) => model,
            ModelResolution::UnknownModel => {
                warn!("unknown printer type");
                return Err(RollwerkError::UnsupportedPrinter(request.printer_type));
            }
            ModelResolution::UnavailableOnPlatform(model) => {
                warn!(%model, "printer model is wired-only — unreachable here");
                return Err(RollwerkError::UnsupportedPrinter(request.printer_type));
            }
        };

        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command::Print {
                model,
                request,
                reply,
            })
            .map_err(|_| RollwerkError::EngineStopped)?;
        outcome.await.map_err(|_| RollwerkError::EngineStopped)
    }

    /// Start a network discovery session.  Results arrive as one
    /// `onIpAddressAvailable` batch.  The printer type is passed to the
    /// driver as an opaque scan filter, unvalidated.
    pub fn search_network_printers(&self, printer_type: &str) -> Result<()> {
        self.commands
            .send(Command::SearchNetwork {
                filter: printer_type.to_owned(),
            })
            .map_err(|_| RollwerkError::EngineStopped)
    }

    /// Start a beacon discovery session.  Emits one empty `onBLEAvailable`
    /// immediately, then one event per discovered device until stopped.
    pub fn search_beacon_printers(&self) -> Result<()> {
        self.commands
            .send(Command::SearchBeacon)
            .map_err(|_| RollwerkError::EngineStopped)
    }

    /// Stop the beacon session.  Idempotent.
    pub fn stop_beacon_search(&self) -> Result<()> {
        self.commands
            .send(Command::StopBeaconSearch)
            .map_err(|_| RollwerkError::EngineStopped)
    }
}

impl Drop for PrintService {
    fn drop(&mut self) {
        // Engine may already be gone; nothing to do then.
        let _ = self.commands.send(Command::Shutdown);
    }
}
