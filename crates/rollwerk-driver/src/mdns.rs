// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mDNS-backed driver: real network discovery, vendor-SDK-only channels.
//
// Label printers advertise raw-port printing as `_pdl-datastream._tcp.local.`
// and LPR as `_printer._tcp.local.`.  We browse both with the `mdns-sd`
// crate for the scan's time budget, then deliver a single result batch.
// Channel open and print submission still need the vendor SDK, so those
// paths behave like the stub.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::DynamicImage;
use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};
use tracing::{debug, info, warn};

use rollwerk_core::error::RollwerkError;
use rollwerk_core::types::{
    ChannelDescriptor, DriverErrorCode, NetworkDevice, PrintSettings, PrinterModel,
};

use crate::traits::{BeaconScanCallback, NetworkScanCallback, PrinterChannel, PrinterDriver};

/// mDNS service type for raw port 9100 printing.
const PDL_SERVICE: &str = "_pdl-datastream._tcp.local.";

/// mDNS service type for LPR printing.
const LPR_SERVICE: &str = "_printer._tcp.local.";

/// Driver whose network scan browses mDNS on the local network.
pub struct MdnsDriver {
    daemon: ServiceDaemon,
}

impl MdnsDriver {
    /// Spawn the mDNS daemon thread.  Browsing starts per scan, not here.
    pub fn new() -> rollwerk_core::error::Result<Self> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| RollwerkError::Discovery(format!("failed to start mDNS daemon: {e}")))?;
        Ok(Self { daemon })
    }

    /// Spawn a thread that drains the receiver produced by
    /// `ServiceDaemon::browse` and appends resolved printers to the shared
    /// batch, preserving arrival order.
    fn spawn_listener(
        service_type: &'static str,
        receiver: mdns_sd::Receiver<ServiceEvent>,
        devices: Arc<Mutex<Vec<NetworkDevice>>>,
    ) {
        std::thread::Builder::new()
            .name(format!("mdns-{service_type}"))
            .spawn(move || {
                while let Ok(event) = receiver.recv() {
                    match event {
                        ServiceEvent::SearchStarted(stype) => {
                            debug!(service_type = %stype, "mDNS search started");
                        }
                        ServiceEvent::ServiceFound(stype, fullname) => {
                            debug!(service_type = %stype, name = %fullname, "service found");
                        }
                        ServiceEvent::ServiceResolved(info) => {
                            match service_info_to_device(&info) {
                                Some(device) => {
                                    info!(
                                        ip = %device.ip_address,
                                        name = %info.get_fullname(),
                                        "printer resolved"
                                    );
                                    devices
                                        .lock()
                                        .expect("device batch lock poisoned")
                                        .push(device);
                                }
                                None => {
                                    warn!(
                                        fullname = %info.get_fullname(),
                                        "resolved service carries no address"
                                    );
                                }
                            }
                        }
                        ServiceEvent::ServiceRemoved(stype, fullname) => {
                            debug!(service_type = %stype, name = %fullname, "service removed");
                        }
                        ServiceEvent::SearchStopped(stype) => {
                            debug!(service_type = %stype, "mDNS search stopped");
                            break;
                        }
                    }
                }
            })
            .expect("failed to spawn mDNS listener thread");
    }
}

impl PrinterDriver for MdnsDriver {
    fn open_channel(
        &self,
        descriptor: &ChannelDescriptor,
    ) -> Result<Box<dyn PrinterChannel>, DriverErrorCode> {
        // Rendering and channel I/O belong to the vendor SDK.
        warn!(?descriptor, "open_channel requires the vendor SDK");
        Err(DriverErrorCode::SDK_UNAVAILABLE)
    }

    fn default_settings(&self, model: PrinterModel) -> PrintSettings {
        PrintSettings::defaults_for(model)
    }

    fn start_network_scan(
        &self,
        filter: &str,
        timeout: Duration,
        on_complete: NetworkScanCallback,
    ) {
        let pdl_receiver = match self.daemon.browse(PDL_SERVICE) {
            Ok(rx) => rx,
            Err(e) => {
                warn!(error = %e, "browse {PDL_SERVICE} failed — scan completes empty");
                on_complete(Vec::new());
                return;
            }
        };
        let lpr_receiver = match self.daemon.browse(LPR_SERVICE) {
            Ok(rx) => rx,
            Err(e) => {
                warn!(error = %e, "browse {LPR_SERVICE} failed — scan completes empty");
                let _ = self.daemon.stop_browse(PDL_SERVICE);
                on_complete(Vec::new());
                return;
            }
        };

        let devices = Arc::new(Mutex::new(Vec::new()));
        Self::spawn_listener(PDL_SERVICE, pdl_receiver, Arc::clone(&devices));
        Self::spawn_listener(LPR_SERVICE, lpr_receiver, Arc::clone(&devices));

        // Timer thread: let the browse run for its budget, stop it, then
        // fire the one-shot completion with whatever arrived.
        let daemon = self.daemon.clone();
        let filter = filter.to_owned();
        std::thread::Builder::new()
            .name("mdns-scan-timer".into())
            .spawn(move || {
                std::thread::sleep(timeout);
                if let Err(e) = daemon.stop_browse(PDL_SERVICE) {
                    debug!(error = %e, "stop browse {PDL_SERVICE}");
                }
                if let Err(e) = daemon.stop_browse(LPR_SERVICE) {
                    debug!(error = %e, "stop browse {LPR_SERVICE}");
                }
                let batch: Vec<NetworkDevice> = devices
                    .lock()
                    .expect("device batch lock poisoned")
                    .drain(..)
                    .filter(|d| matches_filter(d, &filter))
                    .collect();
                info!(count = batch.len(), "network scan complete");
                on_complete(batch);
            })
            .expect("failed to spawn mDNS timer thread");
    }

    fn start_beacon_scan(&self, _on_device: BeaconScanCallback) {
        // BLE advertisement scanning lives in the vendor SDK; without it no
        // devices will arrive.  The session's initial empty emission still
        // signals "search active" to the caller.
        warn!("beacon scan requires the vendor SDK — no devices will arrive");
    }

    fn stop_beacon_scan(&self) {}
}

/// Convert a resolved `ServiceInfo` into a `NetworkDevice`.
///
/// Prefers IPv4 for wider printer compatibility.  The model name comes from
/// the `ty` TXT record when present (falling back to `product`).
fn service_info_to_device(info: &ServiceInfo) -> Option<NetworkDevice> {
    let ip = info
        .get_addresses()
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| info.get_addresses().iter().next())
        .copied()?;

    let model_name = info
        .get_property_val_str("ty")
        .or_else(|| info.get_property_val_str("product"))
        .map(String::from);

    Some(NetworkDevice {
        ip_address: ip.to_string(),
        model_name,
    })
}

/// Model-name filter applied to the finished batch.  Case-insensitive
/// substring match; an empty filter passes everything.  Devices that did not
/// report a model name are kept — dropping them would hide printers whose
/// TXT records are sparse.
fn matches_filter(device: &NetworkDevice, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    match &device.model_name {
        Some(name) => name.to_ascii_lowercase().contains(&filter.to_ascii_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(model: Option<&str>) -> NetworkDevice {
        NetworkDevice {
            ip_address: "10.0.0.5".into(),
            model_name: model.map(String::from),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches_filter(&device(Some("Brother QL-810W")), ""));
        assert!(matches_filter(&device(None), ""));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        assert!(matches_filter(&device(Some("Brother QL-810W")), "ql-810w"));
        assert!(!matches_filter(&device(Some("Brother QL-810W")), "QL-820"));
    }

    #[test]
    fn unnamed_devices_pass_the_filter() {
        assert!(matches_filter(&device(None), "QL-810W"));
    }
}
