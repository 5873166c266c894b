//! zstd compression stage.
//!
//! The empty byte string maps to itself in both directions, so no frame is
//! emitted for empty plaintext. Frames carry their content size, so the
//! decoder window never needs to exceed the plaintext.

use std::io::Read;

use crate::error::{Error, Result};

/// Default zstd level.
pub const DEFAULT_LEVEL: i32 = 3;

/// Accepted zstd levels.
pub const LEVELS: core::ops::RangeInclusive<i32> = 1..=22;

/// zstd decoder window bounds (log2 bytes).
const WINDOW_LOG_MIN: u32 = 10;
const WINDOW_LOG_MAX: u32 = 31;

/// Compress `data` at the given zstd `level`.
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    if !LEVELS.contains(&level) {
        return Err(Error::InvalidConfig(format!("zstd level {level} out of range")));
    }
    if data.is_empty() {
        return Ok(Vec::new());
    }
    zstd::bulk::compress(data, level).map_err(|_| Error::CorruptData)
}

/// Decompress a single zstd stream with no output limit.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    zstd::decode_all(data).map_err(|_| Error::CorruptData)
}

/// Decompress, failing with [`Error::LimitExceeded`] once the output would
/// grow past `limit` bytes.
///
/// The decoder window is capped at the smallest power of two covering
/// `limit`; a frame declaring a larger window is [`Error::CorruptData`].
pub fn decompress_bounded(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut decoder = zstd::stream::read::Decoder::new(data).map_err(|_| Error::CorruptData)?;
    decoder
        .window_log_max(window_log_for(limit))
        .map_err(|_| Error::CorruptData)?;

    let mut out = Vec::new();
    decoder
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|_| Error::CorruptData)?;

    if out.len() > limit {
        return Err(Error::LimitExceeded);
    }
    Ok(out)
}

fn window_log_for(limit: usize) -> u32 {
    let log = limit
        .checked_next_power_of_two()
        .map_or(usize::BITS, |p| p.trailing_zeros());
    log.clamp(WINDOW_LOG_MIN, WINDOW_LOG_MAX)
}
