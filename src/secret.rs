//! Shared secrets and key generation.

use core::fmt;

use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base32;
use crate::error::{Error, Result};

/// How a new secret is produced.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeySize {
    /// 16 random bytes.
    Bits128,
    /// 32 random bytes.
    Bits256,
    /// 48 random bytes.
    Bits384,
    /// 64 random bytes.
    Bits512,
    /// The 32 ASCII bytes of a random v4 UUID in its hyphenless lowercase hex form.
    Guid,
}

impl KeySize {
    /// Length in bytes of secrets generated in this mode.
    pub const fn len(self) -> usize {
        match self {
            KeySize::Bits128 => 16,
            KeySize::Bits256 | KeySize::Guid => 32,
            KeySize::Bits384 => 48,
            KeySize::Bits512 => 64,
        }
    }

    /// Always `false`: every mode produces key material.
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Key material shared between the server and a user's authenticator.
///
/// The bytes are wiped when the value is dropped, and `Debug` only reveals the length. The type is
/// deliberately not `Clone`: borrow it for the duration of a computation instead.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(Vec<u8>);

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SharedSecret")
            .field("len", &self.0.len())
            .finish()
    }
}

impl SharedSecret {
    /// Wraps existing key bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidArgument`] when `bytes` is empty.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidArgument("secret must not be empty"));
        }
        Ok(SharedSecret(bytes))
    }

    /// Decodes a secret from its Base32 display key.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Format`] on malformed Base32, or [`Error::InvalidArgument`] when the key
    /// is empty.
    pub fn from_display_key(key: &str) -> Result<Self> {
        Self::from_bytes(base32::decode(key)?)
    }

    /// Generates a fresh secret.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Random`] if the system random number generator is unavailable.
    pub fn generate(size: KeySize) -> Result<Self> {
        let bytes = match size {
            KeySize::Guid => Uuid::new_v4().simple().to_string().into_bytes(),
            _ => {
                let mut bytes = vec![0; size.len()];
                SystemRandom::new().fill(&mut bytes)?;
                bytes
            }
        };
        Ok(SharedSecret(bytes))
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the key in bytes. Never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`, since empty secrets are rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The Base32 text given to users during enrollment.
    pub fn display_key(&self) -> String {
        base32::encode(&self.0)
    }
}

impl AsRef<[u8]> for SharedSecret {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
