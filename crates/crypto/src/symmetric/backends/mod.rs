//! Back-end adapters.
//!
//! Each adapter exposes the same small operation set over its own opaque
//! context type; the session owns the contexts and applies descriptor flags
//! uniformly before dispatching here.
//!
//! - [`openssl`]: EVP-style generic back-end (persistent per-direction
//!   contexts, the default)
//! - [`mbedtls`]: mbedTLS generic back-end; compiled only when the `openssl`
//!   feature is off, so at most one generic back-end is active
//! - [`sodium`]: libsodium-style stream and detached-AEAD primitives

use super::error::CipherError;

/// An adapter-level failure: the facade error kind paired with the back-end's
/// native error code, which the session records in `last_errno`.
pub struct BackendFailure {
    pub errno: i64,
    pub error: CipherError,
}

impl BackendFailure {
    pub fn new(errno: i64, error: CipherError) -> Self {
        Self { errno, error }
    }
}

/// Which direction a generic back-end context was created for.
#[cfg(any(feature = "openssl", feature = "mbedtls"))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

#[cfg(feature = "openssl")]
pub mod openssl;
#[cfg(feature = "openssl")]
pub use self::openssl as generic;

#[cfg(all(feature = "mbedtls", not(feature = "openssl")))]
pub mod mbedtls;
#[cfg(all(feature = "mbedtls", not(feature = "openssl")))]
pub use self::mbedtls as generic;

#[cfg(feature = "sodium")]
pub mod sodium;
