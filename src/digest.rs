//! HMAC digest algorithms and dynamic truncation.

use core::fmt;
use core::str::FromStr;

use ring::hmac::{
    sign, Algorithm, Key as HmacKey, Tag, HMAC_SHA1_FOR_LEGACY_USE_ONLY as HMAC_SHA1,
    HMAC_SHA256, HMAC_SHA384, HMAC_SHA512,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Hash algorithm used for the HMAC step of HOTP.
///
/// [RFC 4226][4226] prescribes HMAC-SHA1; [RFC 6238][6238] extends TOTP to the SHA-2 family. The
/// variants are declared weakest first, so the derived `Ord` doubles as a strength ordering. The
/// validator relies on this when it is allowed to accept codes from older, weaker
/// configurations.
///
/// [4226]: https://datatracker.ietf.org/doc/html/rfc4226
/// [6238]: https://datatracker.ietf.org/doc/html/rfc6238
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum HashAlgorithm {
    /// HMAC-SHA1.
    #[default]
    #[serde(rename = "SHA1")]
    Sha1,
    /// HMAC-SHA256.
    #[serde(rename = "SHA256")]
    Sha256,
    /// HMAC-SHA384.
    #[serde(rename = "SHA384")]
    Sha384,
    /// HMAC-SHA512.
    #[serde(rename = "SHA512")]
    Sha512,
}

impl HashAlgorithm {
    /// Every algorithm, weakest first.
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
    ];

    /// The name used in configuration files and `otpauth://` URIs.
    pub const fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Length of the HMAC output in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// This algorithm followed by every weaker one, strongest first.
    pub fn and_weaker(self) -> impl Iterator<Item = HashAlgorithm> {
        Self::ALL.iter().rev().copied().filter(move |a| *a <= self)
    }

    fn ring_algorithm(self) -> Algorithm {
        match self {
            HashAlgorithm::Sha1 => HMAC_SHA1,
            HashAlgorithm::Sha256 => HMAC_SHA256,
            HashAlgorithm::Sha384 => HMAC_SHA384,
            HashAlgorithm::Sha512 => HMAC_SHA512,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "");
        HashAlgorithm::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_owned()))
    }
}

/// HMAC output of one of the supported algorithms.
///
/// Every supported algorithm yields at least 20 bytes, so the four bytes read by
/// [`Digest::truncate`] are always in bounds.
#[derive(Clone, Debug)]
pub struct Digest(Tag);

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl Digest {
    /// Dynamic truncation per [RFC 4226 section 5.3][5.3], without the final modulo reduction.
    ///
    /// [5.3]: https://datatracker.ietf.org/doc/html/rfc4226#section-5.3
    pub fn truncate(&self) -> u32 {
        let digest = self.as_ref();
        // Use the four lowest-order bits of the last byte as the offset
        let index = (digest[digest.len() - 1] & 0xf) as usize;
        let bytes = [
            // Strip leading bit to remove signed/unsigned ambiguity
            digest[index] & 0x7f,
            digest[index + 1],
            digest[index + 2],
            digest[index + 3],
        ];
        u32::from_be_bytes(bytes)
    }
}

/// Low-level HMAC function over a big-endian counter.
pub fn hmac(algorithm: HashAlgorithm, key: &[u8], counter: u64) -> Digest {
    let key = HmacKey::new(algorithm.ring_algorithm(), key);
    Digest(sign(&key, &counter.to_be_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_section_5_4() {
        // RFC 4226 appendix D, counter 0
        let digest = hmac(HashAlgorithm::Sha1, b"12345678901234567890", 0);
        assert_eq!(
            digest.as_ref(),
            &[
                0xcc, 0x93, 0xcf, 0x18, 0x50, 0x8d, 0x94, 0x93, 0x4c, 0x64, 0xb6, 0x5d, 0x8b, 0xa7,
                0x66, 0x7f, 0xb7, 0xcd, 0xe4, 0xb0,
            ][..]
        );
        assert_eq!(digest.truncate(), 0x4c93cf18);
    }

    #[test]
    fn test_raw_truncation() {
        let secret = b"12345678901234567890";
        let raw = |counter| hmac(HashAlgorithm::Sha1, secret, counter).truncate();
        assert_eq!(raw(1), 0x41397eea);
        assert_eq!(raw(2), 0x82fef30);
        assert_eq!(raw(3), 0x66ef7655);
        assert_eq!(raw(9), 0x2679dc69);
    }

    #[test]
    fn output_lengths() {
        for algorithm in HashAlgorithm::ALL.iter().copied() {
            let digest = hmac(algorithm, b"key", 7);
            assert_eq!(digest.as_ref().len(), algorithm.output_len());
        }
    }

    #[test]
    fn strength_ordering() {
        assert!(HashAlgorithm::Sha1 < HashAlgorithm::Sha256);
        assert!(HashAlgorithm::Sha384 < HashAlgorithm::Sha512);
        let weaker: Vec<_> = HashAlgorithm::Sha384.and_weaker().collect();
        assert_eq!(
            weaker,
            vec![HashAlgorithm::Sha384, HashAlgorithm::Sha256, HashAlgorithm::Sha1]
        );
        assert_eq!(HashAlgorithm::Sha1.and_weaker().count(), 1);
    }

    #[test]
    fn parse_names() {
        assert_eq!("SHA1".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha1));
        assert_eq!("sha-256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!(" Sha512 ".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
        assert_eq!(
            "MD5".parse::<HashAlgorithm>(),
            Err(Error::UnknownAlgorithm("MD5".into()))
        );
        assert_eq!(HashAlgorithm::Sha384.to_string(), "SHA384");
    }
}
