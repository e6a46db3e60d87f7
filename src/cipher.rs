//! Constant-shift substitution cipher applied line by line
//!
//! Letters rotate within their own case, digits rotate within `0-9`, and
//! everything else passes through untouched. The transform is pure, so the
//! sequential and parallel drivers produce byte-identical output.

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Shift used when none is configured
pub const DEFAULT_SHIFT: i64 = 3;

/// Apply the cipher to a single line.
///
/// Rotation uses Euclidean remainder, so negative and very large shifts stay
/// inside each character class.
pub fn transform(line: &str, shift: i64) -> String {
    let letter = shift.rem_euclid(26) as u8;
    let digit = shift.rem_euclid(10) as u8;

    line.chars()
        .map(|ch| match ch {
            'A'..='Z' => rotate(ch, b'A', letter, 26),
            'a'..='z' => rotate(ch, b'a', letter, 26),
            '0'..='9' => rotate(ch, b'0', digit, 10),
            other => other,
        })
        .collect()
}

#[inline]
fn rotate(ch: char, base: u8, by: u8, modulus: u8) -> char {
    let offset = ch as u8 - base;
    (base + (offset + by) % modulus) as char
}

/// A per-line transform that workers can share across threads
pub trait LineTransform: Send + Sync {
    /// Transform one line
    fn apply(&self, line: &str) -> String;
}

impl<F> LineTransform for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn apply(&self, line: &str) -> String {
        self(line)
    }
}

/// Caesar-style cipher with a fixed shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CaesarCipher {
    shift: i64,
}

impl Default for CaesarCipher {
    fn default() -> Self {
        Self::new(DEFAULT_SHIFT)
    }
}

impl CaesarCipher {
    /// Create a cipher with the given shift
    pub fn new(shift: i64) -> Self {
        Self { shift }
    }

    /// The configured shift
    pub fn shift(&self) -> i64 {
        self.shift
    }

    /// Cipher that undoes this one.
    ///
    /// The shift is reduced modulo 130 (a multiple of both the letter and
    /// digit cycles) before negating, so every `i64` shift has an inverse.
    pub fn inverse(&self) -> Self {
        Self {
            shift: -self.shift.rem_euclid(130),
        }
    }
}

impl LineTransform for CaesarCipher {
    fn apply(&self, line: &str) -> String {
        transform(line, self.shift)
    }
}
