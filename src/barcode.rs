//! Barcode-sized chunking of encoded text.
//!
//! A QR code at error-correction level L holds at most 4296 alphanumeric
//! characters (version 40); 2500 keeps each symbol at version 30 or below so
//! it still scans from a phone screen. Rendering is an optional SVG adapter;
//! image decoding is left to the caller.

use crate::base45;
use crate::error::{Error, Result};

/// Default maximum characters per barcode.
pub const DEFAULT_CHUNK_CHARS: usize = 2500;

/// Split Base45 `text` into consecutive chunks of at most `max_chars`.
///
/// Empty text yields a single empty chunk so that a round trip through
/// [`join_chunks`] is the identity.
pub fn split_for_barcode(text: &str, max_chars: usize) -> Result<Vec<&str>> {
    if max_chars == 0 || !base45::is_alphabet(text) {
        return Err(Error::InvalidEncoding);
    }
    if text.is_empty() {
        return Ok(vec![text]);
    }
    // Alphabet is pure ASCII, so every byte offset is a char boundary.
    let mut out = Vec::with_capacity(text.len().div_ceil(max_chars));
    let mut start = 0;
    while start < text.len() {
        let end = (start + max_chars).min(text.len());
        out.push(&text[start..end]);
        start = end;
    }
    Ok(out)
}

/// Reassemble chunks produced by [`split_for_barcode`], in order.
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> Result<String> {
    let mut out = String::with_capacity(chunks.iter().map(|c| c.as_ref().len()).sum());
    for c in chunks {
        let c = c.as_ref();
        if !base45::is_alphabet(c) {
            return Err(Error::InvalidEncoding);
        }
        out.push_str(c);
    }
    Ok(out)
}

/// Render one chunk as an SVG QR code (level L).
#[cfg(feature = "qr")]
pub fn render_svg(chunk: &str) -> Result<String> {
    use qrcode::render::svg;
    use qrcode::{EcLevel, QrCode};

    let code = QrCode::with_error_correction_level(chunk.as_bytes(), EcLevel::L)
        .map_err(|_| Error::LimitExceeded)?;
    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(200, 200)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#FFFFFF"))
        .build())
}
