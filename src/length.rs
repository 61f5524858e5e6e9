//! Validated one-time password lengths.

use core::convert::TryFrom;

use crate::error::Error;

/// Number of decimal digits in a one-time password.
///
/// [RFC 4226][4226] asks for at least six digits, but deployed MFA providers also hand out
/// four-digit codes, so any length from 1 to 9 is accepted here. Nine is the upper bound because
/// truncation yields a 31-bit value; a tenth digit would carry no information.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Digits(u8);

impl Digits {
    /// Smallest accepted length.
    pub const MIN: u8 = 1;
    /// Largest accepted length.
    pub const MAX: u8 = 9;

    /// Six digits, what authenticator apps assume when nothing else is said.
    pub const SIX: Digits = Digits(6);

    /// Validates a digit count.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `digits` is outside `1..=9`.
    pub fn new(digits: u8) -> Result<Self, Error> {
        if !(Self::MIN..=Self::MAX).contains(&digits) {
            return Err(Error::InvalidArgument("digits must be between 1 and 9"));
        }
        Ok(Digits(digits))
    }

    /// The digit count.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `10^digits`, the modulus used to reduce the truncated HMAC.
    pub fn modulus(self) -> u32 {
        10_u32.pow(u32::from(self.0))
    }
}

impl Default for Digits {
    fn default() -> Self {
        Digits::SIX
    }
}

impl TryFrom<u8> for Digits {
    type Error = Error;

    fn try_from(digits: u8) -> Result<Self, Self::Error> {
        Digits::new(digits)
    }
}

impl From<Digits> for u8 {
    fn from(digits: Digits) -> Self {
        digits.0
    }
}
