//! `otpauth://` provisioning URIs, the payload of enrollment QR codes.

use core::fmt;

use crate::config::TotpConfig;
use crate::digest::HashAlgorithm;
use crate::error::Result;
use crate::secret::SharedSecret;
use crate::totp::DEFAULT_PERIOD;

/// Provisioning URI for one user's secret.
///
/// Renders as `otpauth://totp/{issuer}:{upn}?secret={key}&issuer={issuer}`. The `algorithm`,
/// `digits` and `period` parameters are only added when they differ from what authenticator apps
/// assume, since several apps ignore them.
pub struct ProvisioningUri<'a> {
    issuer: &'a str,
    upn: &'a str,
    secret: &'a SharedSecret,
    algorithm: HashAlgorithm,
    digits: u8,
    period: u64,
}

impl<'a> ProvisioningUri<'a> {
    /// URI with the default SHA1, 6-digit, 30-second parameters.
    pub fn new(issuer: &'a str, upn: &'a str, secret: &'a SharedSecret) -> Self {
        ProvisioningUri {
            issuer,
            upn,
            secret,
            algorithm: HashAlgorithm::Sha1,
            digits: 6,
            period: DEFAULT_PERIOD,
        }
    }

    /// Takes algorithm, digits and period from `config`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument) when the configured
    /// period or digit count is invalid, so that no authenticator is enrolled with parameters
    /// the validator would refuse.
    pub fn with_config(mut self, config: &TotpConfig) -> Result<Self> {
        let generator = config.generator()?;
        self.algorithm = generator.algorithm();
        self.digits = generator.digits().get();
        self.period = generator.period();
        Ok(self)
    }
}

impl fmt::Display for ProvisioningUri<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let issuer = urlencoding::encode(self.issuer);
        write!(
            f,
            "otpauth://totp/{}:{}?secret={}&issuer={}",
            issuer,
            urlencoding::encode(self.upn),
            self.secret.display_key(),
            issuer
        )?;
        if self.algorithm != HashAlgorithm::Sha1 {
            write!(f, "&algorithm={}", self.algorithm)?;
        }
        if self.digits != 6 {
            write!(f, "&digits={}", self.digits)?;
        }
        if self.period != DEFAULT_PERIOD {
            write!(f, "&period={}", self.period)?;
        }
        Ok(())
    }
}
