//! The unified symmetric-cipher facade.
//!
//! One session type, [`CipherSession`], drives every supported algorithm
//! through the same call surface, whichever back-end actually serves it:
//!
//! - the generic EVP back-end (OpenSSL, or mbedTLS via the `mbedtls`
//!   feature) for the AES/DES/Blowfish/Camellia/ChaCha20 families,
//! - the sodium-style back-end for the ChaCha20/Salsa20 stream ciphers and
//!   the Poly1305 AEAD constructions,
//! - the built-in [`xxtea`] fallback, which needs no back-end at all.
//!
//! Algorithms are addressed by canonical, case-insensitive names
//! (`aes-256-gcm`, `chacha20-poly1305-ietf`, ...). [`lookup`] resolves a name
//! to its registry entry, [`list_available`] enumerates what the current
//! build actually serves, and [`split_cipher_names`] iterates the name lists
//! found in server configuration strings.
//!
//! # AEAD
//!
//! AEAD algorithms use detached tags: the tag travels in a caller-supplied
//! buffer, never appended to the ciphertext. The AEAD and non-AEAD entry
//! points are mutually exclusive per algorithm and cross-calls are rejected.
//!
//! # IV layout for sodium-style stream ciphers
//!
//! The IV of a sodium-style stream cipher is `counter ‖ nonce`: an 8-byte
//! little-endian initial block counter followed by the algorithm's nonce.
//! Sodium-style AEAD IVs are the bare nonce.
//!
//! # Example
//!
//! ```
//! use gamekit_crypto::symmetric::{CipherSession, Mode};
//!
//! # #[cfg(feature = "openssl")] {
//! let mut session = CipherSession::new();
//! session.init("aes-256-gcm", Mode::ENCRYPT | Mode::DECRYPT).unwrap();
//! session.set_key(&[0x11; 32]).unwrap();
//! session.set_iv(&[0x22; 12]).unwrap();
//!
//! let mut ciphertext = vec![0u8; 5 + session.block_size()];
//! let mut tag = [0u8; 16];
//! let clen = session
//!     .encrypt_aead(b"hello", &mut ciphertext, b"header", &mut tag)
//!     .unwrap();
//!
//! let mut plaintext = vec![0u8; clen + session.block_size()];
//! let plen = session
//!     .decrypt_aead(&ciphertext[..clen], &mut plaintext, b"header", &tag)
//!     .unwrap();
//! assert_eq!(&plaintext[..plen], b"hello");
//! # }
//! ```

mod backends;
mod error;
mod registry;
mod session;

pub mod xxtea;

#[cfg(test)]
mod cipher_tests;

pub use error::CipherError;
pub use registry::{
    ciphertok, list_available, lookup, split_cipher_names, CipherDescriptor, CipherFlags,
    CipherMethod,
};
pub use session::{CipherSession, Mode};

/// Performs the process-wide registration some back-ends need before their
/// first session.
///
/// Idempotent; safe to call from every server start path. The sodium build
/// initializes libsodium here (sessions also do it lazily), the OpenSSL build
/// registers the cipher table, and back-ends without such a step do nothing.
pub fn init_global_algorithm() {
    #[cfg(feature = "openssl")]
    openssl::init();
    #[cfg(feature = "sodium")]
    backends::sodium::init_libsodium();
}

/// The symmetric teardown of [`init_global_algorithm`], to be called at most
/// once after the last session is dropped.
///
/// Every supported back-end releases its global state automatically these
/// days, so this is a no-op kept for lifecycle symmetry.
pub fn cleanup_global_algorithm() {}
