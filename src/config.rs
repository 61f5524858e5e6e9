//! Configuration consumed by the generator and validator.
//!
//! Deserializes from whatever format the host uses (the tests use JSON). Every field is optional
//! and falls back to the values authenticator apps assume: SHA1, 30 seconds, 6 digits.

use serde::{Deserialize, Serialize};

use crate::digest::HashAlgorithm;
use crate::error::Result;
use crate::totp::{TotpGenerator, DEFAULT_PERIOD};
use crate::window::{check_shadows, AlgorithmPolicy};

/// TOTP configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotpConfig {
    /// Hash algorithm used for new codes, and the strongest one accepted.
    pub algorithm: HashAlgorithm,
    /// Number of time steps tolerated on each side of the current one, at most
    /// [`MAX_SHADOWS`](Self::MAX_SHADOWS).
    #[serde(alias = "totp_shadows")]
    pub shadows: u32,
    /// Time step in seconds.
    pub period: u64,
    /// Number of digits in a code.
    pub digits: u8,
    /// Whether codes from weaker algorithms are accepted.
    pub algorithm_policy: AlgorithmPolicy,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha1,
            shadows: Self::DEFAULT_SHADOWS,
            period: DEFAULT_PERIOD,
            digits: 6,
            algorithm_policy: AlgorithmPolicy::Pinned,
        }
    }
}

impl TotpConfig {
    /// Default number of tolerated steps on each side.
    pub const DEFAULT_SHADOWS: u32 = 2;

    /// Largest accepted number of tolerated steps on each side.
    ///
    /// Every validation computes up to `2 * shadows + 1` codes per candidate algorithm.
    pub const MAX_SHADOWS: u32 = 10;

    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash algorithm.
    pub const fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the number of tolerated steps.
    pub const fn shadows(mut self, shadows: u32) -> Self {
        self.shadows = shadows;
        self
    }

    /// Sets the period in seconds.
    pub const fn period(mut self, period: u64) -> Self {
        self.period = period;
        self
    }

    /// Sets the number of digits.
    pub const fn digits(mut self, digits: u8) -> Self {
        self.digits = digits;
        self
    }

    /// Sets the algorithm policy.
    pub const fn algorithm_policy(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithm_policy = policy;
        self
    }

    /// Checks the period, digit count and shadows.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument) if any is invalid.
    pub fn validate(&self) -> Result<()> {
        self.generator()?;
        check_shadows(self.shadows).map(drop)
    }

    /// Generator for this configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument) if the period or digit
    /// count is invalid.
    pub fn generator(&self) -> Result<TotpGenerator> {
        TotpGenerator::new(self.algorithm, self.period, self.digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn defaults() {
        let config = TotpConfig::default();
        assert_eq!(config.algorithm, HashAlgorithm::Sha1);
        assert_eq!(config.shadows, 2);
        assert_eq!(config.period, 30);
        assert_eq!(config.digits, 6);
        assert_eq!(config.algorithm_policy, AlgorithmPolicy::Pinned);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder() {
        let config = TotpConfig::new()
            .algorithm(HashAlgorithm::Sha256)
            .shadows(0)
            .digits(4)
            .algorithm_policy(AlgorithmPolicy::AcceptWeaker);
        assert_eq!(config.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.shadows, 0);
        assert_eq!(config.digits, 4);
        assert_eq!(config.algorithm_policy, AlgorithmPolicy::AcceptWeaker);
    }

    #[test]
    fn from_json() {
        let config: TotpConfig = serde_json::from_str(
            r#"{ "algorithm": "SHA512", "totp_shadows": 3, "algorithm_policy": "accept_weaker" }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, HashAlgorithm::Sha512);
        assert_eq!(config.shadows, 3);
        assert_eq!(config.period, 30);
        assert_eq!(config.algorithm_policy, AlgorithmPolicy::AcceptWeaker);
    }

    #[test]
    fn empty_json_is_default() {
        let config: TotpConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TotpConfig::default());
    }

    #[test]
    fn unknown_algorithm_name() {
        assert!(serde_json::from_str::<TotpConfig>(r#"{ "algorithm": "MD5" }"#).is_err());
    }

    #[test]
    fn invalid_values() {
        let err = TotpConfig::new().digits(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(TotpConfig::new().period(0).validate().is_err());
    }

    #[test]
    fn shadows_are_bounded() {
        assert!(TotpConfig::new().shadows(TotpConfig::MAX_SHADOWS).validate().is_ok());
        let err = TotpConfig::new()
            .shadows(TotpConfig::MAX_SHADOWS + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let config: TotpConfig =
            serde_json::from_str(r#"{ "totp_shadows": 4000000000 }"#).unwrap();
        assert!(config.validate().is_err());
    }
}
