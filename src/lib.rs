//! Time-based one-time passwords for multi-factor authentication providers.
//!
//! This crate computes [RFC 6238][6238] TOTP codes and validates user-submitted PINs against a
//! window of time steps around the server's clock. It is the algorithmic core only: storing
//! secrets, rendering QR codes and talking to an identity provider are left to the caller.
//!
//! ```rust
//! use chrono::DateTime;
//! use mfa_totp::{ShadowWindowValidator, SharedSecret, TotpConfig};
//!
//! let secret = SharedSecret::from_display_key("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")?;
//! let config = TotpConfig::new().digits(8);
//! let now = DateTime::from_timestamp(59, 0).unwrap();
//!
//! let code = config.generator()?.compute(secret.as_bytes(), now)?;
//! assert_eq!(code.to_string(), "94287082");
//!
//! let validator = ShadowWindowValidator::from_config(&config)?;
//! assert!(validator.validate(secret.as_bytes(), "alice@contoso.com", "94287082", now)?);
//! # Ok::<(), mfa_totp::Error>(())
//! ```
//!
//! [6238]: https://datatracker.ietf.org/doc/html/rfc6238

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod base32;
pub mod config;
pub mod digest;
pub mod error;
pub mod length;
pub mod secret;
pub mod totp;
pub mod uri;
pub mod window;

pub use config::TotpConfig;
pub use digest::HashAlgorithm;
pub use error::{Error, Result};
pub use length::Digits;
pub use secret::{KeySize, SharedSecret};
pub use totp::{compute, seconds_remaining, Otp, TotpGenerator, DEFAULT_PERIOD};
pub use uri::ProvisioningUri;
pub use window::{AlgorithmPolicy, Match, ShadowWindowValidator};
