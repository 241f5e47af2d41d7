//! The libsodium-style back-end: stream ciphers with an explicit block
//! counter, and detached AEAD.
//!
//! Contexts here are value-typed; they only hold the key. Stream operations
//! are single-call XOR combiners whose IV is `counter[0..8] ‖ nonce`, where
//! the counter is an 8-byte little-endian initial block index. Detached AEAD
//! goes through libsodium proper (`sodiumoxide`); libsodium does not export
//! its `xor_ic` stream entry points through `sodiumoxide`, so the stream side
//! uses the RustCrypto stream-cipher crates and reproduces the initial
//! counter by seeking the keystream, which is bit-identical.

use std::sync::Once;

use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use chacha20::{ChaCha20, ChaCha20Legacy, XChaCha20};
use log::warn;
use salsa20::{Salsa20, XSalsa20};
use sodiumoxide::crypto::aead::{chacha20poly1305, chacha20poly1305_ietf, xchacha20poly1305_ietf};
use static_assertions::const_assert;
use zeroize::Zeroize;

use super::super::error::CipherError;
use super::super::registry::CipherMethod;
use super::BackendFailure;

/// Capacity of the per-session key buffer; large enough for the largest
/// sodium-style key.
pub const KEY_CAPACITY: usize = 32;

/// Length of the little-endian block-counter prefix in stream-cipher IVs.
pub const COUNTER_SIZE: usize = 8;

const STREAM_BLOCK_SIZE: u64 = 64;

const_assert!(chacha20poly1305::KEYBYTES <= KEY_CAPACITY);
const_assert!(chacha20poly1305_ietf::KEYBYTES <= KEY_CAPACITY);
const_assert!(xchacha20poly1305_ietf::KEYBYTES <= KEY_CAPACITY);

static INIT_LIBSODIUM: Once = Once::new();

/// Initializes libsodium once per process. Safe to call any number of times.
pub fn init_libsodium() {
    INIT_LIBSODIUM.call_once(|| {
        if sodiumoxide::init().is_err() {
            warn!("libsodium initialization failed; sodium ciphers lose their thread-safety guarantees");
        }
    });
}

fn failure(error: CipherError) -> BackendFailure {
    BackendFailure::new(-1, error)
}

/// IV size for a sodium-style method: counter prefix plus nonce for stream
/// ciphers, the bare public-nonce size for AEAD.
pub fn iv_size(method: CipherMethod) -> usize {
    match method {
        CipherMethod::SodiumChaCha20 => COUNTER_SIZE + 8,
        CipherMethod::SodiumChaCha20Ietf => COUNTER_SIZE + 12,
        CipherMethod::SodiumXChaCha20 => COUNTER_SIZE + 24,
        CipherMethod::SodiumSalsa20 => COUNTER_SIZE + 8,
        CipherMethod::SodiumXSalsa20 => COUNTER_SIZE + 24,
        CipherMethod::SodiumChaCha20Poly1305 => chacha20poly1305::NONCEBYTES,
        CipherMethod::SodiumChaCha20Poly1305Ietf => chacha20poly1305_ietf::NONCEBYTES,
        CipherMethod::SodiumXChaCha20Poly1305Ietf => xchacha20poly1305_ietf::NONCEBYTES,
        CipherMethod::Xxtea | CipherMethod::Cipher => 0,
    }
}

/// Key size in bits; 256 for the whole sodium-style family.
pub fn key_bits(method: CipherMethod) -> usize {
    match method {
        CipherMethod::Xxtea | CipherMethod::Cipher => 0,
        _ => KEY_CAPACITY * 8,
    }
}

/// A value-typed sodium context: just the key buffer, zeroed on drop.
pub struct Context {
    key: [u8; KEY_CAPACITY],
}

impl Context {
    /// Creates a context with an all-zero key.
    pub fn new() -> Context {
        init_libsodium();
        Context {
            key: [0; KEY_CAPACITY],
        }
    }

    /// Stores up to [`KEY_CAPACITY`] bytes of key material; excess bytes are
    /// ignored. Always succeeds.
    pub fn set_key(&mut self, key: &[u8]) {
        self.key.zeroize();
        let used = key.len().min(KEY_CAPACITY);
        self.key[..used].copy_from_slice(&key[..used]);
    }

    /// Single-call stream XOR. `iv` carries the counter/nonce layout described
    /// at module level; encrypt and decrypt are the same operation.
    pub fn stream_xor(
        &self,
        method: CipherMethod,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        let mut counter_bytes = [0u8; COUNTER_SIZE];
        counter_bytes.copy_from_slice(&iv[..COUNTER_SIZE]);
        let counter = u64::from_le_bytes(counter_bytes);
        let nonce = &iv[COUNTER_SIZE..];
        let output = &mut output[..input.len()];
        match method {
            CipherMethod::SodiumChaCha20 => {
                self.xor_ic::<ChaCha20Legacy>(nonce, counter, input, output)
            }
            // the IETF and XChaCha constructions carry a 32-bit block counter
            CipherMethod::SodiumChaCha20Ietf => {
                self.xor_ic::<ChaCha20>(nonce, counter & 0xffff_ffff, input, output)
            }
            CipherMethod::SodiumXChaCha20 => {
                self.xor_ic::<XChaCha20>(nonce, counter & 0xffff_ffff, input, output)
            }
            CipherMethod::SodiumSalsa20 => self.xor_ic::<Salsa20>(nonce, counter, input, output),
            CipherMethod::SodiumXSalsa20 => self.xor_ic::<XSalsa20>(nonce, counter, input, output),
            _ => Err(failure(CipherError::NotInited)),
        }
    }

    fn xor_ic<C>(
        &self,
        nonce: &[u8],
        counter: u64,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, BackendFailure>
    where
        C: KeyIvInit + StreamCipher + StreamCipherSeek,
    {
        let mut cipher = C::new_from_slices(&self.key, nonce)
            .map_err(|_| failure(CipherError::SodiumOperation))?;
        let start = counter
            .checked_mul(STREAM_BLOCK_SIZE)
            .ok_or_else(|| failure(CipherError::SodiumOperation))?;
        cipher
            .try_seek(start)
            .map_err(|_| failure(CipherError::SodiumOperation))?;
        output.copy_from_slice(input);
        cipher
            .try_apply_keystream(output)
            .map_err(|_| failure(CipherError::SodiumOperation))?;
        Ok(input.len())
    }

    /// Detached AEAD encryption; the tag lands in the caller's buffer, which
    /// must hold at least the algorithm's tag size.
    pub fn aead_encrypt(
        &self,
        method: CipherMethod,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &mut [u8],
    ) -> Result<usize, BackendFailure> {
        let ad = (!ad.is_empty()).then_some(ad);
        let output = &mut output[..input.len()];
        output.copy_from_slice(input);
        match method {
            CipherMethod::SodiumChaCha20Poly1305 => {
                if tag.len() < chacha20poly1305::TAGBYTES {
                    return Err(failure(CipherError::SodiumOperationTagLen));
                }
                let key = chacha20poly1305::Key::from_slice(&self.key)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let nonce = chacha20poly1305::Nonce::from_slice(iv)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let mac = chacha20poly1305::seal_detached(output, ad, &nonce, &key);
                tag[..chacha20poly1305::TAGBYTES].copy_from_slice(mac.as_ref());
                Ok(input.len())
            }
            CipherMethod::SodiumChaCha20Poly1305Ietf => {
                if tag.len() < chacha20poly1305_ietf::TAGBYTES {
                    return Err(failure(CipherError::SodiumOperationTagLen));
                }
                let key = chacha20poly1305_ietf::Key::from_slice(&self.key)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let nonce = chacha20poly1305_ietf::Nonce::from_slice(iv)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let mac = chacha20poly1305_ietf::seal_detached(output, ad, &nonce, &key);
                tag[..chacha20poly1305_ietf::TAGBYTES].copy_from_slice(mac.as_ref());
                Ok(input.len())
            }
            CipherMethod::SodiumXChaCha20Poly1305Ietf => {
                if tag.len() < xchacha20poly1305_ietf::TAGBYTES {
                    return Err(failure(CipherError::SodiumOperationTagLen));
                }
                let key = xchacha20poly1305_ietf::Key::from_slice(&self.key)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let nonce = xchacha20poly1305_ietf::Nonce::from_slice(iv)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let mac = xchacha20poly1305_ietf::seal_detached(output, ad, &nonce, &key);
                tag[..xchacha20poly1305_ietf::TAGBYTES].copy_from_slice(mac.as_ref());
                Ok(input.len())
            }
            _ => Err(failure(CipherError::NotInited)),
        }
    }

    /// Detached AEAD decryption; fails with `SodiumOperation` when the tag
    /// does not verify, without updating the output length.
    pub fn aead_decrypt(
        &self,
        method: CipherMethod,
        iv: &[u8],
        input: &[u8],
        output: &mut [u8],
        ad: &[u8],
        tag: &[u8],
    ) -> Result<usize, BackendFailure> {
        let ad = (!ad.is_empty()).then_some(ad);
        let output = &mut output[..input.len()];
        output.copy_from_slice(input);
        match method {
            CipherMethod::SodiumChaCha20Poly1305 => {
                if tag.len() < chacha20poly1305::TAGBYTES {
                    return Err(failure(CipherError::SodiumOperationTagLen));
                }
                let key = chacha20poly1305::Key::from_slice(&self.key)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let nonce = chacha20poly1305::Nonce::from_slice(iv)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let mac = chacha20poly1305::Tag::from_slice(&tag[..chacha20poly1305::TAGBYTES])
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                chacha20poly1305::open_detached(output, ad, &mac, &nonce, &key)
                    .map_err(|()| failure(CipherError::SodiumOperation))?;
                Ok(input.len())
            }
            CipherMethod::SodiumChaCha20Poly1305Ietf => {
                if tag.len() < chacha20poly1305_ietf::TAGBYTES {
                    return Err(failure(CipherError::SodiumOperationTagLen));
                }
                let key = chacha20poly1305_ietf::Key::from_slice(&self.key)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let nonce = chacha20poly1305_ietf::Nonce::from_slice(iv)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let mac =
                    chacha20poly1305_ietf::Tag::from_slice(&tag[..chacha20poly1305_ietf::TAGBYTES])
                        .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                chacha20poly1305_ietf::open_detached(output, ad, &mac, &nonce, &key)
                    .map_err(|()| failure(CipherError::SodiumOperation))?;
                Ok(input.len())
            }
            CipherMethod::SodiumXChaCha20Poly1305Ietf => {
                if tag.len() < xchacha20poly1305_ietf::TAGBYTES {
                    return Err(failure(CipherError::SodiumOperationTagLen));
                }
                let key = xchacha20poly1305_ietf::Key::from_slice(&self.key)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let nonce = xchacha20poly1305_ietf::Nonce::from_slice(iv)
                    .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                let mac = xchacha20poly1305_ietf::Tag::from_slice(
                    &tag[..xchacha20poly1305_ietf::TAGBYTES],
                )
                .ok_or_else(|| failure(CipherError::SodiumOperation))?;
                xchacha20poly1305_ietf::open_detached(output, ad, &mac, &nonce, &key)
                    .map_err(|()| failure(CipherError::SodiumOperation))?;
                Ok(input.len())
            }
            _ => Err(failure(CipherError::NotInited)),
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
