// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rollwerk.

use thiserror::Error;

/// Top-level error type for all Rollwerk operations.
///
/// Caller-input variants are returned synchronously by the triggering call;
/// driver and transport failures detected after dispatch travel over the
/// notification bus instead and never appear here.
#[derive(Debug, Error)]
pub enum RollwerkError {
    // -- Caller-input errors --
    #[error("image data is not found")]
    EmptyImageData,

    #[error("printerType is not found")]
    EmptyPrinterType,

    #[error("unsupported printer type: {0}")]
    UnsupportedPrinter(String),

    // -- Discovery --
    #[error("printer discovery failed: {0}")]
    Discovery(String),

    // -- Infrastructure --
    #[error("print engine stopped")]
    EngineStopped,

    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RollwerkError>;
