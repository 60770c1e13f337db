// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability registry: printer-type identifier → model, gated by the
// transports this platform can actually address.

use tracing::debug;

use rollwerk_core::types::PrinterModel;

/// Outcome of resolving a caller-supplied printer-type identifier.
///
/// Both non-supported variants read as "unsupported" to callers; keeping
/// them distinct lets logs name the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelResolution {
    Supported(PrinterModel),
    /// Identifier is outside the closed model set.
    UnknownModel,
    /// Model exists but its only transport is unreachable on this platform.
    UnavailableOnPlatform(PrinterModel),
}

/// Maps identifiers to models and validates platform reachability.
/// No side effects; empty-string rejection is the caller's precondition.
pub struct CapabilityRegistry {
    wireless_only: bool,
}

impl CapabilityRegistry {
    /// Registry for platforms that can only address wireless transports —
    /// wired-only models resolve as unavailable.
    pub fn wireless() -> Self {
        Self { wireless_only: true }
    }

    /// Total resolution: every input maps to exactly one variant.
    pub fn resolve(&self, identifier: &str) -> ModelResolution {
        let Some(model) = PrinterModel::from_identifier(identifier) else {
            debug!(identifier, "unknown printer model");
            return ModelResolution::UnknownModel;
        };
        if self.wireless_only && !model.supports_wireless() {
            debug!(%model, "model is wired-only — unreachable on this platform");
            return ModelResolution::UnavailableOnPlatform(model);
        }
        ModelResolution::Supported(model)
    }
}
