//! Validated binary message.

use core::fmt;
use core::str::FromStr;

use platform::config::MESSAGE_BITS;

/// Errors produced while validating a message string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// The string does not hold exactly [`MESSAGE_BITS`] characters.
    #[error("message must be exactly {expected} binary digits (got {actual} characters)")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Length received
        actual: usize,
    },
    /// A character other than `'0'` or `'1'` was found.
    #[error("invalid character '{character}' at position {position}; only '0' and '1' are allowed")]
    InvalidCharacter {
        /// Zero-based character index
        position: usize,
        /// The offending character
        character: char,
    },
}

/// Exactly [`MESSAGE_BITS`] bits, first bit transmitted first.
///
/// Only constructed through [`FromStr`] / [`TryFrom`], so every instance
/// satisfies the `^[01]{5}$` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryMessage {
    bits: [bool; MESSAGE_BITS],
}

impl BinaryMessage {
    /// The bits, first transmitted first.
    #[must_use]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of bits (always [`MESSAGE_BITS`]).
    #[must_use]
    pub const fn len(&self) -> usize {
        MESSAGE_BITS
    }

    /// A message is never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Every message of [`MESSAGE_BITS`] bits, in counting order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0u32..1 << MESSAGE_BITS).map(|value| {
            let mut bits = [false; MESSAGE_BITS];
            for (i, bit) in bits.iter_mut().enumerate() {
                let shift = MESSAGE_BITS - 1 - i;
                *bit = (value >> shift) & 1 == 1;
            }
            Self { bits }
        })
    }
}

impl FromStr for BinaryMessage {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actual = s.chars().count();
        if actual != MESSAGE_BITS {
            return Err(MessageError::InvalidLength {
                expected: MESSAGE_BITS,
                actual,
            });
        }
        let mut bits = [false; MESSAGE_BITS];
        for (position, (slot, character)) in bits.iter_mut().zip(s.chars()).enumerate() {
            *slot = match character {
                '0' => false,
                '1' => true,
                _ => {
                    return Err(MessageError::InvalidCharacter {
                        position,
                        character,
                    })
                }
            };
        }
        Ok(Self { bits })
    }
}

impl TryFrom<&str> for BinaryMessage {
    type Error = MessageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for BinaryMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
