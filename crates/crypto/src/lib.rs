//! Cryptographic primitives for GameKit.
//!
//! This crate provides the symmetric encryption layer used by GameKit
//! servers to protect session traffic. Its centerpiece is a unified cipher
//! facade: one session type that speaks the same way to every supported
//! algorithm, regardless of which cryptographic back-end actually serves it.
//!
//! # Modules
//!
//! - [`symmetric`]: The cipher facade (algorithm registry, sessions, back-ends)
//! - [`symmetric::xxtea`]: The built-in XXTEA block cipher
//!
//! # Backend Selection
//!
//! Algorithms are served by one of three back-ends, selected per algorithm at
//! session initialization:
//!
//! - **OpenSSL**: the generic EVP back-end for the AES/DES/ChaCha20 families
//! - **libsodium-style**: stream ciphers and detached AEAD in the libsodium
//!   tradition (ChaCha20/Salsa20 variants and their Poly1305 constructions)
//! - **Built-in XXTEA**: always available, no external library required
//!
//! Back-ends are cargo features; the registry only ever offers algorithms
//! whose back-end is compiled in. An `mbedtls` feature swaps the generic
//! back-end from OpenSSL to mbedTLS for targets where OpenSSL is not an
//! option.
//!
//! # Security Considerations
//!
//! - This layer dispatches to vetted implementations; it contains no
//!   cryptographic math of its own apart from XXTEA
//! - Key material held by a session is zeroed on close and on drop
//! - AEAD tags are always detached and verified before plaintext is released
//! - This crate uses `#![forbid(unsafe_code)]` to prevent memory safety issues
//!
//! # Example
//!
//! ```
//! use gamekit_crypto::symmetric::{CipherSession, Mode};
//!
//! let mut session = CipherSession::new();
//! session.init("xxtea", Mode::ENCRYPT | Mode::DECRYPT).expect("always compiled in");
//! session.set_key(b"0123456789abcdef").expect("key accepted");
//!
//! let plaintext = b"level up";
//! let mut ciphertext = vec![0u8; plaintext.len() + session.block_size()];
//! let clen = session.encrypt(plaintext, &mut ciphertext).expect("encrypts");
//!
//! let mut decrypted = vec![0u8; clen + session.block_size()];
//! let plen = session.decrypt(&ciphertext[..clen], &mut decrypted).expect("decrypts");
//! assert_eq!(&decrypted[..plen], plaintext);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod symmetric;
