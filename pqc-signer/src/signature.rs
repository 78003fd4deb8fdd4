//! Length-carrying key and signature containers

use crate::error::{PqcError, Result};
use crate::params::Scheme;
use std::fmt;

/// Detached signature whose byte count is its real length
///
/// The signing routine decides `siglen`; it is never assumed to equal the
/// scheme's maximum. A `Signature` holds exactly `siglen` bytes, so there is no
/// separate length field to fall out of sync with the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    scheme: Scheme,
    bytes: Vec<u8>,
}

impl Signature {
    /// Wrap signature bytes produced by (or read for) `scheme`
    ///
    /// # Errors
    /// - Returns `InvalidLength` if the bytes are empty or exceed the scheme's maximum
    pub fn new(scheme: Scheme, bytes: Vec<u8>) -> Result<Self> {
        let max = scheme.parameters().max_signature_bytes;
        if bytes.is_empty() || bytes.len() > max {
            return Err(PqcError::InvalidLength(format!(
                "{} signature must be 1..={} bytes, got {}",
                scheme,
                max,
                bytes.len()
            )));
        }
        Ok(Self { scheme, bytes })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Actual signature length (`siglen`)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("scheme", &self.scheme)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Keypair generated together for one scheme
///
/// The secret key stays in process memory; nothing in this workspace writes it out.
#[derive(Clone)]
pub struct KeyPair {
    scheme: Scheme,
    public_key: Vec<u8>,
    secret_key: Vec<u8>,
}

impl KeyPair {
    /// Restore keypair from bytes
    ///
    /// # Errors
    /// - Returns `KeyGenerationError` if either key length is incorrect
    pub fn from_bytes(scheme: Scheme, public_key: &[u8], secret_key: &[u8]) -> Result<Self> {
        let params = scheme.parameters();

        if public_key.len() != params.public_key_bytes {
            return Err(PqcError::KeyGenerationError(format!(
                "Invalid public key length: expected {} bytes, got {}",
                params.public_key_bytes,
                public_key.len()
            )));
        }

        if secret_key.len() != params.secret_key_bytes {
            return Err(PqcError::KeyGenerationError(format!(
                "Invalid secret key length: expected {} bytes, got {}",
                params.secret_key_bytes,
                secret_key.len()
            )));
        }

        Ok(Self {
            scheme,
            public_key: public_key.to_vec(),
            secret_key: secret_key.to_vec(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn secret_key(&self) -> &[u8] {
        &self.secret_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.scheme)
            .field("public_key", &hex::encode(&self.public_key[..self.public_key.len().min(16)]))
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
