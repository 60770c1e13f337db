// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rollwerk label-print engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a print job.  Used in tracing spans only — it never
/// appears in bus payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of label printer models this engine knows how to drive.
///
/// Unknown identifiers never map to a default — resolution is total over
/// `Option`, and the capability registry layers platform availability on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrinterModel {
    Ql700,
    Ql720Nw,
    Ql800,
    Ql810W,
    Ql820Nwb,
    Ql1110Nwb,
    Ql1115Nwb,
}

impl PrinterModel {
    /// Resolve a caller-supplied printer-type identifier.
    ///
    /// Identifiers are matched exactly as the vendor prints them on the
    /// device ("QL-810W", not "ql810w").
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "QL-700" => Some(Self::Ql700),
            "QL-720NW" => Some(Self::Ql720Nw),
            "QL-800" => Some(Self::Ql800),
            "QL-810W" => Some(Self::Ql810W),
            "QL-820NWB" => Some(Self::Ql820Nwb),
            "QL-1110NWB" => Some(Self::Ql1110Nwb),
            "QL-1115NWB" => Some(Self::Ql1115Nwb),
            _ => None,
        }
    }

    /// The vendor identifier for this model.
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::Ql700 => "QL-700",
            Self::Ql720Nw => "QL-720NW",
            Self::Ql800 => "QL-800",
            Self::Ql810W => "QL-810W",
            Self::Ql820Nwb => "QL-820NWB",
            Self::Ql1110Nwb => "QL-1110NWB",
            Self::Ql1115Nwb => "QL-1115NWB",
        }
    }

    /// Whether this model carries a wireless transport (Wi-Fi or BLE).
    ///
    /// The QL-700 and QL-800 are USB-only; on platforms that cannot address
    /// a wired transport they are known-but-unreachable.
    pub fn supports_wireless(&self) -> bool {
        !matches!(self, Self::Ql700 | Self::Ql800)
    }
}

impl std::fmt::Display for PrinterModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Caller-supplied addressing information selecting a transport.
///
/// Exactly one variant is active per request.  Precedence is fixed: a beacon
/// local name wins over a network address when both are supplied, because
/// beacon pairing is more specific than a possibly-stale address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionHint {
    BeaconLocalName(String),
    NetworkAddress(String),
    None,
}

impl ConnectionHint {
    /// Build a hint from the optional request fields, applying precedence.
    /// Empty strings count as absent.
    pub fn from_parts(local_name: Option<&str>, ip_address: Option<&str>) -> Self {
        match local_name {
            Some(name) if !name.is_empty() => return Self::BeaconLocalName(name.to_owned()),
            _ => {}
        }
        match ip_address {
            Some(addr) if !addr.is_empty() => Self::NetworkAddress(addr.to_owned()),
            _ => Self::None,
        }
    }
}

/// Transport-specific address of one printer, ready for the driver to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelDescriptor {
    /// BLE channel addressed by the advertised local name.
    BleLocalName(String),
    /// Wi-Fi channel addressed by IP.
    WifiAddress(String),
}

/// Label roll loaded in the printer.
///
/// Selection is binary by contract: caller index 16 selects the plain 62 mm
/// roll, any other index the 62 mm red/black receipt roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSize {
    RollW62,
    RollW62Rb,
}

impl LabelSize {
    /// Map a caller-supplied label-name index to a roll width.
    pub fn from_index(index: i32) -> Self {
        if index == 16 {
            Self::RollW62
        } else {
            Self::RollW62Rb
        }
    }
}

/// Default label-name index when the caller omits one.
pub const DEFAULT_LABEL_INDEX: i32 = 16;

/// Print settings for one job.  Constructed fresh per job, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSettings {
    pub model: PrinterModel,
    pub label_size: LabelSize,
    pub copies: u32,
    /// Always true — the engine does not expose cut control.
    pub auto_cut: bool,
}

impl PrintSettings {
    /// Vendor-default settings for a model: 62 mm roll, one copy, auto-cut.
    pub fn defaults_for(model: PrinterModel) -> Self {
        Self {
            model,
            label_size: LabelSize::from_index(DEFAULT_LABEL_INDEX),
            copies: 1,
            auto_cut: true,
        }
    }

    /// Apply the caller's overrides.  Auto-cut stays forced on.
    pub fn apply_overrides(&mut self, label_name_index: Option<i32>, copies: Option<u32>) {
        self.label_size = LabelSize::from_index(label_name_index.unwrap_or(DEFAULT_LABEL_INDEX));
        self.copies = copies.unwrap_or(1);
        self.auto_cut = true;
    }
}

/// A printer found by a network discovery session.  Ephemeral — lives only
/// for the result batch it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDevice {
    pub ip_address: String,
    /// Model name as reported by the transport scan, when available.
    pub model_name: Option<String>,
}

/// A printer found by a beacon discovery session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconDevice {
    pub local_name: String,
}

/// Raw vendor driver error code, surfaced verbatim — never translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverErrorCode(pub i32);

impl DriverErrorCode {
    /// Reported by builds where the vendor SDK is not linked in.
    pub const SDK_UNAVAILABLE: Self = Self(255);
}

impl std::fmt::Display for DriverErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound print-call arguments, wire-shaped for the plugin marshaling layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    pub encoded_image: String,
    pub printer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_name_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_copies: Option<u32>,
}

impl PrintRequest {
    /// Addressing hint for this request, with beacon-over-network precedence.
    pub fn connection_hint(&self) -> ConnectionHint {
        ConnectionHint::from_parts(self.local_name.as_deref(), self.ip_address.as_deref())
    }
}

/// Terminal outcome of a print call.
///
/// `FailureNotified` means the job terminated and its failure already went
/// out on the bus — the triggering call itself completes without an error,
/// matching the plugin contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    Completed,
    FailureNotified,
}

/// Error payload of an `onPrintError` event: a raw driver code, or a message
/// for failures the driver never saw (e.g. image decode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorValue {
    Code(i32),
    Message(String),
}

impl From<DriverErrorCode> for ErrorValue {
    fn from(code: DriverErrorCode) -> Self {
        Self::Code(code.0)
    }
}

/// Fire-and-forget notification posted from the engine to the host app.
///
/// Serializes adjacently tagged so a marshaling layer can forward it
/// verbatim: `{"event": "onPrintError", "data": {"value": 27}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PluginEvent {
    /// No usable connection hint was supplied for a print job.
    #[serde(rename = "onPrintFailedCommunication")]
    PrintFailedCommunication { value: bool },

    /// A print job failed after dispatch — channel open, decode, or submit.
    #[serde(rename = "onPrintError")]
    PrintError { value: ErrorValue },

    /// One batch of network discovery results, in driver order.
    #[serde(rename = "onIpAddressAvailable")]
    IpAddressAvailable {
        #[serde(rename = "ipAddressList")]
        ip_address_list: Vec<String>,
    },

    /// One beacon discovery emission: empty at search start, then one
    /// single-element list per device arrival.
    #[serde(rename = "onBLEAvailable")]
    BleAvailable {
        #[serde(rename = "localNameList")]
        local_name_list: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_resolution_is_exact() {
        assert_eq!(
            PrinterModel::from_identifier("QL-810W"),
            Some(PrinterModel::Ql810W)
        );
        assert_eq!(PrinterModel::from_identifier("ql-810w"), None);
        assert_eq!(PrinterModel::from_identifier("QL-9999"), None);
        assert_eq!(PrinterModel::from_identifier(""), None);
    }

    #[test]
    fn every_model_round_trips_through_identifier() {
        let all = [
            PrinterModel::Ql700,
            PrinterModel::Ql720Nw,
            PrinterModel::Ql800,
            PrinterModel::Ql810W,
            PrinterModel::Ql820Nwb,
            PrinterModel::Ql1110Nwb,
            PrinterModel::Ql1115Nwb,
        ];
        for model in all {
            assert_eq!(PrinterModel::from_identifier(model.identifier()), Some(model));
        }
    }

    #[test]
    fn wired_only_models_flagged() {
        assert!(!PrinterModel::Ql700.supports_wireless());
        assert!(!PrinterModel::Ql800.supports_wireless());
        assert!(PrinterModel::Ql820Nwb.supports_wireless());
    }

    #[test]
    fn beacon_name_wins_over_network_address() {
        let hint = ConnectionHint::from_parts(Some("QL-820NWB_0042"), Some("10.0.0.5"));
        assert_eq!(
            hint,
            ConnectionHint::BeaconLocalName("QL-820NWB_0042".into())
        );
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let hint = ConnectionHint::from_parts(Some(""), Some("10.0.0.5"));
        assert_eq!(hint, ConnectionHint::NetworkAddress("10.0.0.5".into()));
        assert_eq!(
            ConnectionHint::from_parts(Some(""), Some("")),
            ConnectionHint::None
        );
        assert_eq!(ConnectionHint::from_parts(None, None), ConnectionHint::None);
    }

    #[test]
    fn label_index_sixteen_selects_plain_roll() {
        assert_eq!(LabelSize::from_index(16), LabelSize::RollW62);
        assert_eq!(LabelSize::from_index(0), LabelSize::RollW62Rb);
        assert_eq!(LabelSize::from_index(17), LabelSize::RollW62Rb);
        assert_eq!(LabelSize::from_index(-1), LabelSize::RollW62Rb);
    }

    #[test]
    fn default_settings_then_overrides() {
        let mut settings = PrintSettings::defaults_for(PrinterModel::Ql810W);
        assert_eq!(settings.label_size, LabelSize::RollW62);
        assert_eq!(settings.copies, 1);
        assert!(settings.auto_cut);

        settings.apply_overrides(Some(3), Some(4));
        assert_eq!(settings.label_size, LabelSize::RollW62Rb);
        assert_eq!(settings.copies, 4);
        assert!(settings.auto_cut);

        // Omitted overrides fall back to the defaults.
        settings.apply_overrides(None, None);
        assert_eq!(settings.label_size, LabelSize::RollW62);
        assert_eq!(settings.copies, 1);
    }

    #[test]
    fn print_request_deserializes_camel_case() {
        let json = r#"{
            "encodedImage": "aGVsbG8=",
            "printerType": "QL-810W",
            "ipAddress": "10.0.0.5",
            "labelNameIndex": 16
        }"#;
        let req: PrintRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.printer_type, "QL-810W");
        assert_eq!(req.local_name, None);
        assert_eq!(req.ip_address.as_deref(), Some("10.0.0.5"));
        assert_eq!(req.label_name_index, Some(16));
        assert_eq!(req.number_of_copies, None);
        assert_eq!(
            req.connection_hint(),
            ConnectionHint::NetworkAddress("10.0.0.5".into())
        );
    }

    #[test]
    fn events_serialize_to_plugin_wire_shape() {
        let json = serde_json::to_value(PluginEvent::PrintFailedCommunication { value: true })
            .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "onPrintFailedCommunication", "data": {"value": true}})
        );

        let json = serde_json::to_value(PluginEvent::PrintError {
            value: ErrorValue::Code(27),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "onPrintError", "data": {"value": 27}})
        );

        let json = serde_json::to_value(PluginEvent::BleAvailable {
            local_name_list: vec!["QL-820NWB_0042".into()],
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "onBLEAvailable",
                "data": {"localNameList": ["QL-820NWB_0042"]}
            })
        );

        let json = serde_json::to_value(PluginEvent::IpAddressAvailable {
            ip_address_list: vec![],
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "onIpAddressAvailable", "data": {"ipAddressList": []}})
        );
    }
}
