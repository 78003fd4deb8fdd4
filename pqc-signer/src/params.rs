//! Scheme parameter registry
//!
//! Single source of truth for the fixed byte sizes of every supported scheme.
//! Both the signing side and the verifying side look sizes up here, so the two
//! directions cannot drift apart.
//!
//! | Scheme | Public Key | Secret Key | Max Signature | Context |
//! |--------|-----------:|-----------:|--------------:|:-------:|
//! | Dilithium5 | 2,592 bytes | 4,864 bytes | 4,595 bytes | no |
//! | ML-DSA-87 | 2,592 bytes | 4,896 bytes | 4,627 bytes | yes |

use crate::error::{PqcError, Result};
use std::fmt;
use std::str::FromStr;

/// Longest context string ML-DSA accepts (the length is encoded in one byte).
pub const MAX_CONTEXT_BYTES: usize = 255;

/// Supported signature scheme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// CRYSTALS-Dilithium round 3, security level 5 (no context)
    Dilithium5,
    /// FIPS 204 ML-DSA-87 (context-bearing)
    MlDsa87,
}

/// Fixed sizes and context flag for one scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeParameters {
    /// Human-readable algorithm name
    pub name: &'static str,
    /// Public key size (bytes)
    pub public_key_bytes: usize,
    /// Secret key size (bytes)
    pub secret_key_bytes: usize,
    /// Upper bound on signature size (bytes)
    pub max_signature_bytes: usize,
    /// Whether sign/verify take a context string
    pub uses_context: bool,
}

const DILITHIUM5: SchemeParameters = SchemeParameters {
    name: "Dilithium5",
    public_key_bytes: 2592,
    secret_key_bytes: 4864,
    max_signature_bytes: 4595,
    uses_context: false,
};

const MLDSA87: SchemeParameters = SchemeParameters {
    name: "ML-DSA-87",
    public_key_bytes: 2592,
    secret_key_bytes: 4896,
    max_signature_bytes: 4627,
    uses_context: true,
};

impl Scheme {
    /// Every supported scheme
    pub const ALL: [Scheme; 2] = [Scheme::Dilithium5, Scheme::MlDsa87];

    /// Look up the parameter record for this scheme
    pub const fn parameters(self) -> SchemeParameters {
        match self {
            Scheme::Dilithium5 => DILITHIUM5,
            Scheme::MlDsa87 => MLDSA87,
        }
    }

    /// Algorithm name
    pub const fn name(self) -> &'static str {
        self.parameters().name
    }

    pub const fn uses_context(self) -> bool {
        self.parameters().uses_context
    }

    /// Check that a context argument matches this scheme's calling convention
    ///
    /// Context-free schemes accept only `None`; `Some(b"")` is refused too, so the
    /// underlying routine is never asked to interpret an empty context.
    /// Context-bearing schemes need `Some`, at most [`MAX_CONTEXT_BYTES`] long.
    pub fn check_context(self, context: Option<&[u8]>) -> Result<()> {
        match (self.uses_context(), context) {
            (false, None) => Ok(()),
            (false, Some(_)) => Err(PqcError::ContextNotSupported(self.name())),
            (true, None) => Err(PqcError::ContextRequired(self.name())),
            (true, Some(ctx)) if ctx.len() > MAX_CONTEXT_BYTES => {
                Err(PqcError::InvalidLength(format!(
                    "{} context must be at most {} bytes, got {}",
                    self.name(),
                    MAX_CONTEXT_BYTES,
                    ctx.len()
                )))
            }
            (true, Some(_)) => Ok(()),
        }
    }

    /// Token used in artifact file names (`<side>_<tag>_<role>.bin`)
    pub const fn artifact_tag(self) -> &'static str {
        match self {
            Scheme::Dilithium5 => "dilithium5",
            Scheme::MlDsa87 => "mldsa87",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = PqcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dilithium5" => Ok(Scheme::Dilithium5),
            "mldsa87" | "ml-dsa-87" => Ok(Scheme::MlDsa87),
            _ => Err(PqcError::UnknownScheme(s.to_string())),
        }
    }
}
