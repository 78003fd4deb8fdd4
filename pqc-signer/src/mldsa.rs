//! ML-DSA-87 reference backend
//!
//! FIPS 204 ML-DSA at security level 5, wrapped by `pqcrypto-mldsa`.
//! Unlike Dilithium5 every sign/verify call binds a context string (0..=255
//! bytes). The empty context is legal and distinct from, say, `"ZOND"`: a
//! signature made under one never verifies under the other.

use crate::error::{PqcError, Result};
use crate::params::Scheme;
use crate::signature::{KeyPair, Signature};
use crate::traits::SignatureScheme;
use pqcrypto_mldsa::mldsa87;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

/// ML-DSA-87 backend
#[derive(Debug, Clone, Copy, Default)]
pub struct MlDsa87Backend;

impl SignatureScheme for MlDsa87Backend {
    fn scheme(&self) -> Scheme {
        Scheme::MlDsa87
    }

    fn generate_keypair(&self) -> Result<KeyPair> {
        let (pk, sk) = mldsa87::keypair();
        let keypair = KeyPair::from_bytes(Scheme::MlDsa87, pk.as_bytes(), sk.as_bytes())?;

        tracing::info!(
            "Generated ML-DSA-87 keypair: pk_len={} bytes, sk_len={} bytes",
            keypair.public_key().len(),
            keypair.secret_key().len()
        );

        Ok(keypair)
    }

    fn sign(&self, message: &[u8], context: Option<&[u8]>, keypair: &KeyPair) -> Result<Signature> {
        Scheme::MlDsa87.check_context(context)?;
        let ctx = context.unwrap_or_default();

        if keypair.scheme() != Scheme::MlDsa87 {
            return Err(PqcError::SigningError(format!(
                "Keypair belongs to {}, not ML-DSA-87",
                keypair.scheme()
            )));
        }

        let sk = mldsa87::SecretKey::from_bytes(keypair.secret_key())
            .map_err(|e| PqcError::SigningError(format!("Failed to parse secret key: {:?}", e)))?;

        let detached = mldsa87::detached_sign_ctx(message, ctx, &sk);

        tracing::debug!(
            "Signed message: msg_len={} bytes, ctx_len={} bytes, sig_len={} bytes",
            message.len(),
            ctx.len(),
            detached.as_bytes().len()
        );

        Signature::new(Scheme::MlDsa87, detached.as_bytes().to_vec())
    }

    fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        context: Option<&[u8]>,
        public_key: &[u8],
    ) -> Result<bool> {
        Scheme::MlDsa87.check_context(context)?;
        let ctx = context.unwrap_or_default();

        let pk = match mldsa87::PublicKey::from_bytes(public_key) {
            Ok(pk) => pk,
            Err(e) => {
                tracing::warn!("Rejecting ML-DSA-87 public key: {:?}", e);
                return Ok(false);
            }
        };

        let sig = match mldsa87::DetachedSignature::from_bytes(signature.as_bytes()) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::warn!("Rejecting ML-DSA-87 signature: {:?}", e);
                return Ok(false);
            }
        };

        let is_valid = mldsa87::verify_detached_signature_ctx(&sig, message, ctx, &pk).is_ok();

        tracing::debug!(
            "Signature verification: valid={}, sig_len={} bytes, msg_len={} bytes, ctx_len={} bytes",
            is_valid,
            signature.len(),
            message.len(),
            ctx.len()
        );

        Ok(is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = b"Cross-verification test message from pq-crystals ML-DSA-87";

    #[test]
    fn test_sign_and_verify_with_context() {
        let backend = MlDsa87Backend;
        let keypair = backend.generate_keypair().unwrap();

        let signature = backend.sign(MESSAGE, Some(b"ZOND"), &keypair).unwrap();
        assert!(backend
            .verify(&signature, MESSAGE, Some(b"ZOND"), keypair.public_key())
            .unwrap());
    }

    #[test]
    fn test_wrong_context_fails() {
        let backend = MlDsa87Backend;
        let keypair = backend.generate_keypair().unwrap();
        let signature = backend.sign(MESSAGE, Some(b"ZOND"), &keypair).unwrap();

        assert!(!backend
            .verify(&signature, MESSAGE, Some(b""), keypair.public_key())
            .unwrap());
        assert!(!backend
            .verify(&signature, MESSAGE, Some(b"ZONE"), keypair.public_key())
            .unwrap());
    }

    #[test]
    fn test_empty_context_round_trip() {
        let backend = MlDsa87Backend;
        let keypair = backend.generate_keypair().unwrap();
        let signature = backend.sign(MESSAGE, Some(b""), &keypair).unwrap();

        assert!(backend
            .verify(&signature, MESSAGE, Some(b""), keypair.public_key())
            .unwrap());
        assert!(!backend
            .verify(&signature, MESSAGE, Some(b"ZOND"), keypair.public_key())
            .unwrap());
    }

    #[test]
    fn test_missing_context_rejected() {
        let backend = MlDsa87Backend;
        let keypair = backend.generate_keypair().unwrap();

        let result = backend.sign(MESSAGE, None, &keypair);
        assert!(matches!(result, Err(PqcError::ContextRequired(_))));
    }

    #[test]
    fn test_signature_size() {
        let backend = MlDsa87Backend;
        let keypair = backend.generate_keypair().unwrap();
        let signature = backend.sign(MESSAGE, Some(b"ZOND"), &keypair).unwrap();

        assert!(signature.len() <= mldsa87::signature_bytes());
    }
}
