//! SHA-256 digest helpers and the circular hex index stream.
//!
//! The permutation shuffle draws its pseudo-random values from the hex text of
//! a SHA-256 digest: an 8-digit window slides one character per draw and wraps
//! around the end of the digest.

use sha2::{Digest, Sha256};

/// Number of hex digits read per draw.
pub const INDEX_WINDOW: usize = 8;

/// Widest window that still fits in a `u64`.
const MAX_WINDOW: usize = 16;

/// SHA-256 of the UTF-8 bytes of `input`, as lowercase hex.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Parse `len` hex digits of `digest_hex` starting at `offset`, wrapping
/// around the end of the string.
///
/// `offset` is reduced modulo the digest length first, so any offset is
/// valid. Returns `None` for an empty digest, a window outside `1..=16`, or a
/// non-hex character inside the window.
pub fn circular_window(digest_hex: &str, offset: usize, len: usize) -> Option<u64> {
    let digits = digest_hex.as_bytes();
    if digits.is_empty() || len == 0 || len > MAX_WINDOW {
        return None;
    }
    let start = offset % digits.len();
    let mut value = 0u64;
    for i in 0..len {
        let digit = (digits[(start + i) % digits.len()] as char).to_digit(16)?;
        value = (value << 4) | u64::from(digit);
    }
    Some(value)
}

/// Deterministic index source backed by a hex digest.
///
/// Each call to [`DigestStream::next_value`] reads one window at the current
/// offset and then advances the offset by one, wrapping to zero at the end of
/// the digest. The stream never ends.
#[derive(Debug, Clone)]
pub struct DigestStream {
    nibbles: Vec<u8>,
    offset: usize,
    window: usize,
}

impl DigestStream {
    /// Stream over `SHA-256(key)`.
    pub fn from_key(key: &str) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let nibbles = digest.iter().flat_map(|b| [b >> 4, b & 0x0f]).collect();
        Self {
            nibbles,
            offset: 0,
            window: INDEX_WINDOW,
        }
    }

    /// Stream over an arbitrary hex string.
    ///
    /// Returns `None` if the string is empty or contains a non-hex character.
    pub fn from_hex(digest_hex: &str) -> Option<Self> {
        if digest_hex.is_empty() {
            return None;
        }
        let nibbles = digest_hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()?;
        Some(Self {
            nibbles,
            offset: 0,
            window: INDEX_WINDOW,
        })
    }

    /// Use a window of `len` hex digits per draw, clamped to `1..=16`.
    pub fn with_window(mut self, len: usize) -> Self {
        self.window = len.clamp(1, MAX_WINDOW);
        self
    }

    /// Offset the next draw will read from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of hex digits in the underlying digest.
    pub fn digest_len(&self) -> usize {
        self.nibbles.len()
    }

    /// Read the window at the current offset and advance.
    pub fn next_value(&mut self) -> u64 {
        let len = self.nibbles.len();
        let value = (0..self.window).fold(0u64, |acc, i| {
            (acc << 4) | u64::from(self.nibbles[(self.offset + i) % len])
        });
        self.offset += 1;
        if self.offset >= len {
            self.offset = 0;
        }
        value
    }
}

impl Iterator for DigestStream {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_value())
    }
}
