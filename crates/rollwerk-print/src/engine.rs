// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The engine thread: single serialized execution context for all
// orchestration work.
//
// The vendor SDK is not proven safe for concurrent invocation, so channel
// open, settings build, submit, and discovery start/stop all run here.
// Driver callbacks never touch state directly — they re-enter as queued
// commands carrying their session generation, and the sessions drop
// anything stale.  Confinement replaces locking.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use rollwerk_core::config::EngineConfig;
use rollwerk_core::types::{
    BeaconDevice, NetworkDevice, PluginEvent, PrintOutcome, PrintRequest, PrinterModel,
};
use rollwerk_driver::traits::PrinterDriver;

use crate::bus::NotificationBus;
use crate::discovery::{BeaconSession, NetworkSession};
use crate::orchestrator;

/// Grace added to the driver's scan budget before the watchdog declares the
/// scan dead and completes it empty.
pub const SCAN_GRACE: Duration = Duration::from_secs(2);

/// Work items consumed by the engine thread.
pub enum Command {
    Print {
        model: PrinterModel,
        request: PrintRequest,
        reply: oneshot::Sender<PrintOutcome>,
    },
    SearchNetwork {
        filter: String,
    },
    /// Driver completion for a network scan, tagged with its generation.
    NetworkScanDone {
        generation: u64,
        devices: Vec<NetworkDevice>,
    },
    SearchBeacon,
    /// One beacon advertisement, tagged with its generation.
    BeaconArrival {
        generation: u64,
        device: BeaconDevice,
    },
    StopBeaconSearch,
    Shutdown,
}

/// Spawn the engine thread and return its command queue.
pub fn spawn(
    driver: Box<dyn PrinterDriver>,
    bus: NotificationBus,
    config: EngineConfig,
) -> mpsc::Sender<Command> {
    let (sender, receiver) = mpsc::channel();
    let engine = Engine {
        driver,
        bus,
        config,
        network: NetworkSession::new(),
        beacon: BeaconSession::new(),
        commands: sender.clone(),
    };
    std::thread::Builder::new()
        .name("rollwerk-engine".into())
        .spawn(move || engine.run(receiver))
        .expect("failed to spawn engine thread");
    sender
}

struct Engine {
    driver: Box<dyn PrinterDriver>,
    bus: NotificationBus,
    config: EngineConfig,
    network: NetworkSession,
    beacon: BeaconSession,
    /// Cloned into driver callbacks so completions re-enter the queue.
    commands: mpsc::Sender<Command>,
}

impl Engine {
    fn run(mut self, receiver: mpsc::Receiver<Command>) {
        info!("engine started");
        loop {
            // Block on the queue, bounded by the network watchdog deadline
            // when a scan is live.
            let command = match self.network.deadline() {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        self.network_watchdog();
                        continue;
                    }
                    match receiver.recv_timeout(deadline - now) {
                        Ok(command) => command,
                        Err(RecvTimeoutError::Timeout) => {
                            self.network_watchdog();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match receiver.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                },
            };

            match command {
                Command::Print {
                    model,
                    request,
                    reply,
                } => {
                    let outcome =
                        orchestrator::execute(self.driver.as_ref(), &self.bus, model, &request);
                    // The caller may have gone away; that is their problem.
                    let _ = reply.send(outcome);
                }
                Command::SearchNetwork { filter } => self.start_network_search(filter),
                Command::NetworkScanDone {
                    generation,
                    devices,
                } => self.finish_network_search(generation, devices),
                Command::SearchBeacon => self.start_beacon_search(),
                Command::BeaconArrival { generation, device } => {
                    self.beacon_arrival(generation, device)
                }
                Command::StopBeaconSearch => self.stop_beacon_search(),
                Command::Shutdown => break,
            }
        }
        info!("engine stopped");
    }

    fn start_network_search(&mut self, filter: String) {
        let timeout = self.config.network_scan_timeout();
        let generation = self.network.start(timeout + SCAN_GRACE);
        info!(generation, %filter, timeout_secs = timeout.as_secs(), "network search started");

        let sender = self.commands.clone();
        self.driver.start_network_scan(
            &filter,
            timeout,
            Box::new(move |devices| {
                let _ = sender.send(Command::NetworkScanDone {
                    generation,
                    devices,
                });
            }),
        );
    }

    fn finish_network_search(&mut self, generation: u64, devices: Vec<NetworkDevice>) {
        if !self.network.complete(generation) {
            debug!(generation, "stale network scan completion dropped");
            return;
        }
        // One batch, driver order, unfiltered: duplicates are the
        // transport's responsibility.
        let ip_address_list: Vec<String> = devices.into_iter().map(|d| d.ip_address).collect();
        info!(count = ip_address_list.len(), "network search complete");
        self.bus
            .emit(PluginEvent::IpAddressAvailable { ip_address_list });
    }

    fn network_watchdog(&mut self) {
        if !self.network.expire() {
            return;
        }
        warn!("network scan watchdog fired — completing empty");
        self.bus.emit(PluginEvent::IpAddressAvailable {
            ip_address_list: Vec::new(),
        });
    }

    fn start_beacon_search(&mut self) {
        let generation = self.beacon.start();
        info!(generation, "beacon search started");

        // The "search active" acknowledgment precedes callback registration
        // so it can never trail the first device event.
        self.bus.emit(PluginEvent::BleAvailable {
            local_name_list: Vec::new(),
        });

        let sender = self.commands.clone();
        self.driver.start_beacon_scan(Box::new(move |device| {
            let _ = sender.send(Command::BeaconArrival { generation, device });
        }));
    }

    fn beacon_arrival(&mut self, generation: u64, device: BeaconDevice) {
        if !self.beacon.accepts(generation) {
            debug!(generation, "beacon arrival after stop/replace dropped");
            return;
        }
        debug!(local_name = %device.local_name, "beacon device discovered");
        self.bus.emit(PluginEvent::BleAvailable {
            local_name_list: vec![device.local_name],
        });
    }

    fn stop_beacon_search(&mut self) {
        if self.beacon.stop() {
            info!("beacon search stopped");
            self.driver.stop_beacon_scan();
        } else {
            debug!("beacon stop with no live search — no-op");
        }
    }
}
