//! Post-quantum signature backends for cross-verification
//!
//! Wraps the reference implementations of Dilithium5 and ML-DSA-87 behind one
//! trait, and owns the per-scheme size registry both directions share.
//!
//! # Quick Start
//!
//! ```rust
//! use pqc_signer::{backend_for, Scheme};
//!
//! let backend = backend_for(Scheme::MlDsa87);
//! let keypair = backend.generate_keypair().unwrap();
//!
//! let message = b"Cross-verification test message";
//! let signature = backend.sign(message, Some(b"ZOND"), &keypair).unwrap();
//!
//! let is_valid = backend
//!     .verify(&signature, message, Some(b"ZOND"), keypair.public_key())
//!     .unwrap();
//! assert!(is_valid);
//! ```

pub mod dilithium;
pub mod error;
pub mod mldsa;
pub mod params;
pub mod signature;
pub mod traits;

// Re-export commonly used types
pub use dilithium::Dilithium5Backend;
pub use error::{PqcError, Result};
pub use mldsa::MlDsa87Backend;
pub use params::{Scheme, SchemeParameters};
pub use signature::{KeyPair, Signature};
pub use traits::SignatureScheme;

/// Reference backend for a scheme
pub fn backend_for(scheme: Scheme) -> Box<dyn SignatureScheme> {
    match scheme {
        Scheme::Dilithium5 => Box::new(Dilithium5Backend),
        Scheme::MlDsa87 => Box::new(MlDsa87Backend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_every_scheme() {
        for scheme in Scheme::ALL {
            let backend = backend_for(scheme);
            assert_eq!(backend.scheme(), scheme);
            assert_eq!(backend.algorithm_name(), scheme.name());
        }
    }
}
