//! Time-based one-time passwords ([RFC 6238][6238]).
//!
//! TOTP is HOTP keyed on the number of whole periods elapsed since the Unix epoch. Nothing in
//! this module reads the clock: callers pass the instant they care about, which keeps every
//! computation deterministic and lets a UI refresh its displayed code on its own schedule.
//!
//! [6238]: https://datatracker.ietf.org/doc/html/rfc6238

use core::convert::TryFrom;
use core::fmt;

use chrono::{DateTime, Utc};

use crate::digest::{hmac, HashAlgorithm};
use crate::error::{Error, Result};
use crate::length::Digits;

/// Conventional TOTP period in seconds.
pub const DEFAULT_PERIOD: u64 = 30;

/// A one-time password.
///
/// Displays as a fixed-width, zero-padded decimal number.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Otp {
    value: u32,
    digits: Digits,
}

impl Otp {
    /// The numeric value, in `0..10^digits`.
    pub const fn value(self) -> u32 {
        self.value
    }

    /// The number of digits the value is rendered with.
    pub const fn digits(self) -> Digits {
        self.digits
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:0width$}",
            self.value,
            width = usize::from(self.digits.get())
        )
    }
}

/// Computes codes for one algorithm, period and length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TotpGenerator {
    algorithm: HashAlgorithm,
    period: u64,
    digits: Digits,
}

impl Default for TotpGenerator {
    fn default() -> Self {
        TotpGenerator {
            algorithm: HashAlgorithm::default(),
            period: DEFAULT_PERIOD,
            digits: Digits::default(),
        }
    }
}

impl TotpGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `period` is zero or `digits` is outside `1..=9`.
    pub fn new(algorithm: HashAlgorithm, period: u64, digits: u8) -> Result<Self> {
        Ok(TotpGenerator {
            algorithm,
            period: check_period(period)?,
            digits: Digits::try_from(digits)?,
        })
    }

    /// Same generator with a different hash algorithm.
    pub const fn with_algorithm(self, algorithm: HashAlgorithm) -> Self {
        TotpGenerator { algorithm, ..self }
    }

    /// The hash algorithm.
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The period in seconds.
    pub const fn period(&self) -> u64 {
        self.period
    }

    /// The code length.
    pub const fn digits(&self) -> Digits {
        self.digits
    }

    /// Index of the period containing `instant`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] for instants before the Unix epoch.
    pub fn time_step(&self, instant: DateTime<Utc>) -> Result<u64> {
        Ok(unix_seconds(instant)? / self.period)
    }

    /// Computes the code valid at `instant`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `secret` is empty or `instant` precedes the Unix
    /// epoch.
    pub fn compute(&self, secret: &[u8], instant: DateTime<Utc>) -> Result<Otp> {
        let step = self.time_step(instant)?;
        self.compute_at_step(secret, step)
    }

    /// Computes the code for an explicit time step (the HOTP counter).
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `secret` is empty.
    pub fn compute_at_step(&self, secret: &[u8], step: u64) -> Result<Otp> {
        if secret.is_empty() {
            return Err(Error::InvalidArgument("secret must not be empty"));
        }
        let truncated = hmac(self.algorithm, secret, step).truncate();
        Ok(Otp {
            value: truncated % self.digits.modulus(),
            digits: self.digits,
        })
    }
}

/// One-shot form of [`TotpGenerator::compute`].
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] on an empty secret, zero period, digits outside `1..=9`
/// or a pre-epoch instant.
pub fn compute(
    secret: &[u8],
    instant: DateTime<Utc>,
    algorithm: HashAlgorithm,
    period: u64,
    digits: u8,
) -> Result<Otp> {
    TotpGenerator::new(algorithm, period, digits)?.compute(secret, instant)
}

/// Seconds until the code valid at `now` expires, in `1..=period`.
///
/// # Errors
///
/// Fails with [`Error::InvalidArgument`] when `period` is zero or `now` precedes the Unix epoch.
pub fn seconds_remaining(now: DateTime<Utc>, period: u64) -> Result<u64> {
    let period = check_period(period)?;
    Ok(period - unix_seconds(now)? % period)
}

fn check_period(period: u64) -> Result<u64> {
    if period == 0 {
        return Err(Error::InvalidArgument("period must be positive"));
    }
    Ok(period)
}

fn unix_seconds(instant: DateTime<Utc>) -> Result<u64> {
    u64::try_from(instant.timestamp())
        .map_err(|_| Error::InvalidArgument("instant precedes the Unix epoch"))
}
