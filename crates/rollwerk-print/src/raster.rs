// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image payload decoding: base64 → bytes → bitmap.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;

use rollwerk_core::error::{Result, RollwerkError};

/// Decode a base64 image payload into a renderable bitmap.
///
/// The format is sniffed from the decoded bytes (PNG, JPEG, ...).  Failures
/// surface as `ImageDecode` — the orchestrator reports them on the bus after
/// releasing the channel.
pub fn decode_image(encoded: &str) -> Result<DynamicImage> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| RollwerkError::ImageDecode(format!("base64: {e}")))?;
    image::load_from_memory(&bytes).map_err(|e| RollwerkError::ImageDecode(e.to_string()))
}
