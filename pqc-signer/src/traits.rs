/// Unified interface over the reference signature implementations
use crate::error::Result;
use crate::params::Scheme;
use crate::signature::{KeyPair, Signature};

/// Scheme backend trait
///
/// `context` is `Some` exactly when the scheme uses one. Backends reject the
/// other combination instead of guessing what an empty context means.
pub trait SignatureScheme {
    /// Scheme served by this backend
    fn scheme(&self) -> Scheme;

    /// Generate a fresh random keypair
    fn generate_keypair(&self) -> Result<KeyPair>;

    /// Produce a detached signature
    fn sign(&self, message: &[u8], context: Option<&[u8]>, keypair: &KeyPair) -> Result<Signature>;

    /// Verify a detached signature
    ///
    /// `Ok(false)` covers every cryptographic rejection, including an
    /// undecodable public key. `Err` is reserved for misuse of the API.
    fn verify(
        &self,
        signature: &Signature,
        message: &[u8],
        context: Option<&[u8]>,
        public_key: &[u8],
    ) -> Result<bool>;

    /// Algorithm name
    fn algorithm_name(&self) -> &'static str {
        self.scheme().name()
    }
}
