//! Drift-tolerant PIN validation.
//!
//! Authenticator clocks drift. A submitted PIN is accepted when it matches the code of the
//! current time step or of up to `shadows` steps on either side of it. The current step is
//! checked first, then past steps nearest first, then future steps nearest first.

use chrono::{DateTime, Utc};
use ring::constant_time::verify_slices_are_equal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::TotpConfig;
use crate::digest::HashAlgorithm;
use crate::error::{Error, Result};
use crate::totp::TotpGenerator;

/// Which hash algorithms a submitted PIN may have been generated with.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmPolicy {
    /// Only the configured algorithm.
    #[default]
    Pinned,
    /// The configured algorithm, then each weaker one.
    ///
    /// This keeps secrets enrolled under an older, weaker configuration working after the
    /// configured algorithm is raised, at the price of accepting codes from those weaker
    /// algorithms for every user.
    AcceptWeaker,
}

/// Where in the window a PIN matched.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Match {
    /// Algorithm whose code matched.
    pub algorithm: HashAlgorithm,
    /// Matching step relative to the current one: negative in the past, positive in the future.
    pub offset: i64,
}

/// Stateless validator over a window of time steps.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShadowWindowValidator {
    generator: TotpGenerator,
    shadows: u32,
    policy: AlgorithmPolicy,
}

impl Default for ShadowWindowValidator {
    fn default() -> Self {
        ShadowWindowValidator {
            generator: TotpGenerator::default(),
            shadows: TotpConfig::DEFAULT_SHADOWS,
            policy: AlgorithmPolicy::default(),
        }
    }
}

impl ShadowWindowValidator {
    /// Creates a validator around `generator`, whose algorithm is the target algorithm.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `shadows` exceeds
    /// [`TotpConfig::MAX_SHADOWS`].
    pub fn new(generator: TotpGenerator, shadows: u32, policy: AlgorithmPolicy) -> Result<Self> {
        Ok(ShadowWindowValidator {
            generator,
            shadows: check_shadows(shadows)?,
            policy,
        })
    }

    /// Creates a validator from configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when the configured period, digits or shadows are
    /// invalid.
    pub fn from_config(config: &TotpConfig) -> Result<Self> {
        Self::new(config.generator()?, config.shadows, config.algorithm_policy)
    }

    /// The underlying generator.
    pub const fn generator(&self) -> &TotpGenerator {
        &self.generator
    }

    /// Number of steps tolerated on each side of the current one.
    pub const fn shadows(&self) -> u32 {
        self.shadows
    }

    /// Whether `pin` is valid for `secret` at `now`.
    ///
    /// `upn` only labels log events.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `secret` is empty or `now` precedes the Unix
    /// epoch. A malformed PIN is not an error; it simply does not match.
    pub fn validate(
        &self,
        secret: &[u8],
        upn: &str,
        pin: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.find_match(secret, upn, pin, now)?.is_some())
    }

    /// Same as [`validate`](Self::validate) for a PIN already parsed to an integer.
    ///
    /// # Errors
    ///
    /// As for [`validate`](Self::validate).
    pub fn validate_code(
        &self,
        secret: &[u8],
        upn: &str,
        code: u32,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        Ok(self.find_code(secret, upn, code, now)?.is_some())
    }

    /// Like [`validate`](Self::validate), but reports which algorithm and step matched.
    ///
    /// # Errors
    ///
    /// As for [`validate`](Self::validate).
    pub fn find_match(
        &self,
        secret: &[u8],
        upn: &str,
        pin: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Match>> {
        check_secret(secret)?;
        let current = self.generator.time_step(now)?;
        match self.parse_pin(pin) {
            Some(code) => self.search(secret, upn, code, current),
            None => {
                debug!(upn, "rejected malformed PIN");
                Ok(None)
            }
        }
    }

    fn find_code(
        &self,
        secret: &[u8],
        upn: &str,
        code: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<Match>> {
        check_secret(secret)?;
        let current = self.generator.time_step(now)?;
        self.search(secret, upn, code, current)
    }

    fn search(
        &self,
        secret: &[u8],
        upn: &str,
        code: u32,
        current: u64,
    ) -> Result<Option<Match>> {
        let target = self.generator.algorithm();

        for algorithm in self.candidate_algorithms() {
            let generator = self.generator.with_algorithm(algorithm);
            for offset in self.offsets() {
                let step = match shift(current, offset) {
                    Some(step) => step,
                    None => continue,
                };
                trace!(upn, %algorithm, offset, "probing step");
                let candidate = generator.compute_at_step(secret, step)?;
                if codes_equal(candidate.value(), code) {
                    if algorithm != target {
                        warn!(upn, %algorithm, %target, "PIN matched a weaker legacy algorithm");
                    }
                    debug!(upn, %algorithm, offset, "PIN accepted");
                    return Ok(Some(Match { algorithm, offset }));
                }
            }
        }

        debug!(upn, shadows = self.shadows, "PIN rejected");
        Ok(None)
    }

    fn candidate_algorithms(&self) -> Vec<HashAlgorithm> {
        let target = self.generator.algorithm();
        match self.policy {
            AlgorithmPolicy::Pinned => vec![target],
            AlgorithmPolicy::AcceptWeaker => target.and_weaker().collect(),
        }
    }

    /// Step offsets in probing order: 0, -1..=-n, 1..=n.
    fn offsets(&self) -> impl Iterator<Item = i64> {
        let n = i64::from(self.shadows);
        core::iter::once(0)
            .chain((1..=n).map(|i| -i))
            .chain(1..=n)
    }

    /// Parses a decimal PIN of at most `digits` digits.
    fn parse_pin(&self, pin: &str) -> Option<u32> {
        let pin = pin.trim();
        let digits = usize::from(self.generator.digits().get());
        if pin.is_empty() || pin.len() > digits || !pin.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        pin.parse().ok()
    }
}

fn check_secret(secret: &[u8]) -> Result<()> {
    if secret.is_empty() {
        return Err(Error::InvalidArgument("secret must not be empty"));
    }
    Ok(())
}

pub(crate) fn check_shadows(shadows: u32) -> Result<u32> {
    if shadows > TotpConfig::MAX_SHADOWS {
        return Err(Error::InvalidArgument("shadows must not exceed 10"));
    }
    Ok(shadows)
}

fn shift(step: u64, offset: i64) -> Option<u64> {
    if offset < 0 {
        step.checked_sub(offset.unsigned_abs())
    } else {
        step.checked_add(offset.unsigned_abs())
    }
}

fn codes_equal(expected: u32, submitted: u32) -> bool {
    verify_slices_are_equal(&expected.to_be_bytes(), &submitted.to_be_bytes()).is_ok()
}
