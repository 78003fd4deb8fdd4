//! Dilithium5 reference backend
//!
//! # About Dilithium5
//!
//! CRYSTALS-Dilithium round 3.1 at NIST security level 5, as shipped by the
//! pq-crystals reference code and wrapped by `pqcrypto-dilithium` 0.4.
//! The 0.5 series of that crate switched `dilithium5` to the FIPS 204 draft
//! encoding (sk 4,896 / sig 4,627 bytes) and cannot read round 3 artifacts.
//!
//! ## Calling convention
//! - Detached signatures only (no `SignedMessage` framing on the wire)
//! - **No context parameter**: `sign`/`verify` must be called with `None`.
//!   Passing `Some(b"")` is refused with `ContextNotSupported`; the round 3
//!   routine has no context argument, so there is nothing it could mean.
//!
//! ## Sizes
//! | Public Key | Secret Key | Signature |
//! |-----------|------------|-----------|
//! | 2,592 bytes | 4,864 bytes | 4,595 bytes |

use crate::error::{PqcError, Result};
use crate::params::Scheme;
use crate::signature::{KeyPair, Signature};
use crate::traits::SignatureScheme;
use pqcrypto_dilithium::dilithium5;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

/// Dilithium5 backend
///
/// # Example
///
/// ```rust
/// use pqc_signer::dilithium::Dilithium5Backend;
/// use pqc_signer::traits::SignatureScheme;
///
/// let backend = Dilithium5Backend;
/// let keypair = backend.generate_keypair().unwrap();
///
/// let message = b"Cross-verification test message";
/// let signature = backend.sign(message, None, &keypair).unwrap();
///
/// let is_valid = backend
///     .verify(&signature, message, None, keypair.public_key())
///     .unwrap();
/// assert!(is_valid);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Dilithium5Backend;

impl SignatureScheme for Dilithium5Backend {
    fn scheme(&self) -> Scheme {
        Scheme::Dilithium5
    }

    fn generate_keypair(&self) -> Result<KeyPair> {
        let (pk, sk) = dilithium5::keypair();
        let keypair = KeyPair::from_bytes(Scheme::Dilithium5, pk.as_bytes(), sk.as_bytes())?;

        tracing::info!(
            "Generated Dilithium5 keypair: pk_len={} bytes, sk_len={} bytes",
            keypair.public_key().len(),
            keypair.secret_key().len()
        );

        Ok(keypair)
    }

    fn sign(&self, message: &[u8], context: Option<&[u8]>, keypair: &KeyPair) -> Result<Signature> {
        Scheme::Dilithium5.check_context(context)?;

        if keypair.scheme() != Scheme::Dilithium5 {
            return Err(PqcError::SigningError(format!(
                "Keypair belongs to {}, not Dilithium5",
                keypair.scheme()
            )));
        }

        let sk = dilithium5::SecretKey::from_bytes(keypair.secret_key())
            .map_err(|e| PqcError::SigningError(format!("Failed to parse secret key: {:?}", e)))?;

        let detached = dilithium5::detached_sign(message, &sk);

        tracing::debug!(
            "Signed message: msg_len={} bytes, sig_len={} bytes",
            message.len(),
            detached.as_bytes().len()
        );

        Signature::new(Scheme::Dilithium5, detached.as_bytes().to_vec())
    }

    fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        context: Option<&[u8]>,
        public_key: &[u8],
    ) -> Result<bool> {
        Scheme::Dilithium5.check_context(context)?;

        let pk = match dilithium5::PublicKey::from_bytes(public_key) {
            Ok(pk) => pk,
            Err(e) => {
                tracing::warn!("Rejecting Dilithium5 public key: {:?}", e);
                return Ok(false);
            }
        };

        let sig = match dilithium5::DetachedSignature::from_bytes(signature.as_bytes()) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::warn!("Rejecting Dilithium5 signature: {:?}", e);
                return Ok(false);
            }
        };

        let is_valid = dilithium5::verify_detached_signature(&sig, message, &pk).is_ok();

        tracing::debug!(
            "Signature verification: valid={}, sig_len={} bytes, msg_len={} bytes",
            is_valid,
            signature.len(),
            message.len()
        );

        Ok(is_valid)
    }
}
